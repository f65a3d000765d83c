//! Tabulated curves over wind speed
//!
//! Power curves, power coefficient (cp) curves and wind farm efficiency
//! curves share one shape: strictly increasing, non-negative wind speeds with
//! one non-negative value each. The shape is validated once at construction so
//! that every interpolation downstream can assume sorted abscissae.

use crate::error::{Result, WindPowerError};
use crate::physics::tools::{interp_clamped, interp_index};
use serde::{Deserialize, Serialize};

/// Validate that `wind_speed` / `values` form a well-shaped curve.
fn validate_curve(kind: &str, wind_speed: &[f64], values: &[f64]) -> Result<()> {
    if wind_speed.len() != values.len() {
        return Err(WindPowerError::InvalidInput(format!(
            "{kind}: {} wind speeds but {} values",
            wind_speed.len(),
            values.len()
        )));
    }
    if wind_speed.is_empty() {
        return Err(WindPowerError::InvalidInput(format!("{kind} is empty")));
    }
    for (i, (&v, &y)) in wind_speed.iter().zip(values).enumerate() {
        if !v.is_finite() || v < 0.0 {
            return Err(WindPowerError::InvalidInput(format!(
                "{kind}: wind speed at row {i} must be finite and >= 0, got {v}"
            )));
        }
        if !y.is_finite() || y < 0.0 {
            return Err(WindPowerError::InvalidInput(format!(
                "{kind}: value at row {i} must be finite and >= 0, got {y}"
            )));
        }
    }
    if let Some(i) = wind_speed.windows(2).position(|w| w[1] <= w[0]) {
        return Err(WindPowerError::InvalidInput(format!(
            "{kind}: wind speeds must be strictly increasing (rows {i} and {})",
            i + 1
        )));
    }
    Ok(())
}

/// Power curve: electrical power (W) as a function of wind speed (m/s)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PowerCurveRaw")]
pub struct PowerCurve {
    wind_speed: Vec<f64>,
    power: Vec<f64>,
}

impl PowerCurve {
    /// Create a power curve from wind speeds (m/s) and power values (W).
    pub fn new(wind_speed: Vec<f64>, power: Vec<f64>) -> Result<Self> {
        validate_curve("power curve", &wind_speed, &power)?;
        Ok(Self { wind_speed, power })
    }

    /// Create a power curve from `(wind_speed, power)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        let (wind_speed, power) = pairs.iter().copied().unzip();
        Self::new(wind_speed, power)
    }

    /// Wind speeds in m/s
    pub fn wind_speed(&self) -> &[f64] {
        &self.wind_speed
    }

    /// Power values in W
    pub fn power(&self) -> &[f64] {
        &self.power
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.wind_speed.len()
    }

    /// Always false for a validated curve; present for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.wind_speed.is_empty()
    }

    /// Highest power value on the curve
    pub fn max_power(&self) -> f64 {
        self.power.iter().copied().fold(0.0, f64::max)
    }

    /// Power at `wind_speed`, linearly interpolated and clamped at both ends.
    pub fn power_at(&self, wind_speed: f64) -> f64 {
        interp_clamped(wind_speed, &self.wind_speed, &self.power)
    }

    /// Iterate over `(wind_speed, power)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wind_speed.iter().copied().zip(self.power.iter().copied())
    }

    /// Copy of this curve with every power value multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            wind_speed: self.wind_speed.clone(),
            power: self.power.iter().map(|p| p * factor).collect(),
        }
    }

    /// Trapezoidal integral of power over wind speed (W·m/s).
    ///
    /// Used to compare curves before and after smoothing.
    pub fn area(&self) -> f64 {
        self.wind_speed
            .windows(2)
            .zip(self.power.windows(2))
            .map(|(v, p)| (v[1] - v[0]) * (p[0] + p[1]) / 2.0)
            .sum()
    }

    /// Build without validation; callers in this crate guarantee the shape.
    pub(crate) fn from_sorted_unchecked(wind_speed: Vec<f64>, power: Vec<f64>) -> Self {
        debug_assert_eq!(wind_speed.len(), power.len());
        debug_assert!(wind_speed.windows(2).all(|w| w[0] < w[1]));
        Self { wind_speed, power }
    }
}

#[derive(Deserialize)]
struct PowerCurveRaw {
    wind_speed: Vec<f64>,
    power: Vec<f64>,
}

impl TryFrom<PowerCurveRaw> for PowerCurve {
    type Error = WindPowerError;

    fn try_from(raw: PowerCurveRaw) -> Result<Self> {
        Self::new(raw.wind_speed, raw.power)
    }
}

/// Power coefficient curve: dimensionless cp as a function of wind speed (m/s)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PowerCoefficientCurveRaw")]
pub struct PowerCoefficientCurve {
    wind_speed: Vec<f64>,
    power_coefficient: Vec<f64>,
}

impl PowerCoefficientCurve {
    /// Create a cp curve from wind speeds (m/s) and coefficients.
    pub fn new(wind_speed: Vec<f64>, power_coefficient: Vec<f64>) -> Result<Self> {
        validate_curve("power coefficient curve", &wind_speed, &power_coefficient)?;
        if let Some(cp) = power_coefficient.iter().find(|&&cp| cp > 1.0) {
            tracing::warn!("power coefficient {cp} exceeds 1.0");
        }
        Ok(Self {
            wind_speed,
            power_coefficient,
        })
    }

    /// Create a cp curve from `(wind_speed, cp)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        let (wind_speed, cp) = pairs.iter().copied().unzip();
        Self::new(wind_speed, cp)
    }

    /// Wind speeds in m/s
    pub fn wind_speed(&self) -> &[f64] {
        &self.wind_speed
    }

    /// Power coefficients
    pub fn power_coefficient(&self) -> &[f64] {
        &self.power_coefficient
    }

    /// cp at `wind_speed`; constant beyond the tabulated range
    pub fn cp_at(&self, wind_speed: f64) -> f64 {
        interp_clamped(wind_speed, &self.wind_speed, &self.power_coefficient)
    }
}

#[derive(Deserialize)]
struct PowerCoefficientCurveRaw {
    wind_speed: Vec<f64>,
    power_coefficient: Vec<f64>,
}

impl TryFrom<PowerCoefficientCurveRaw> for PowerCoefficientCurve {
    type Error = WindPowerError;

    fn try_from(raw: PowerCoefficientCurveRaw) -> Result<Self> {
        Self::new(raw.wind_speed, raw.power_coefficient)
    }
}

/// Wind farm efficiency (0-1) as a function of wind speed (m/s)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EfficiencyCurveRaw")]
pub struct EfficiencyCurve {
    wind_speed: Vec<f64>,
    efficiency: Vec<f64>,
}

impl EfficiencyCurve {
    /// Create an efficiency curve from wind speeds (m/s) and efficiencies.
    pub fn new(wind_speed: Vec<f64>, efficiency: Vec<f64>) -> Result<Self> {
        validate_curve("efficiency curve", &wind_speed, &efficiency)?;
        if efficiency.iter().any(|&e| e > 1.0) {
            tracing::warn!("efficiency curve contains values above 1.0");
        }
        Ok(Self {
            wind_speed,
            efficiency,
        })
    }

    /// Create an efficiency curve from `(wind_speed, efficiency)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        let (wind_speed, efficiency) = pairs.iter().copied().unzip();
        Self::new(wind_speed, efficiency)
    }

    /// Wind speeds in m/s
    pub fn wind_speed(&self) -> &[f64] {
        &self.wind_speed
    }

    /// Efficiencies (dimensionless)
    pub fn efficiency(&self) -> &[f64] {
        &self.efficiency
    }

    /// Efficiency at `wind_speed`, clamped at both ends
    pub fn efficiency_at(&self, wind_speed: f64) -> f64 {
        interp_clamped(wind_speed, &self.wind_speed, &self.efficiency)
    }

    /// Efficiency at `wind_speed` with index-interpolation semantics:
    /// `None` below the first tabulated wind speed, last value above the end.
    pub fn efficiency_at_index(&self, wind_speed: f64) -> Option<f64> {
        interp_index(wind_speed, &self.wind_speed, &self.efficiency)
    }
}

#[derive(Deserialize)]
struct EfficiencyCurveRaw {
    wind_speed: Vec<f64>,
    efficiency: Vec<f64>,
}

impl TryFrom<EfficiencyCurveRaw> for EfficiencyCurve {
    type Error = WindPowerError;

    fn try_from(raw: EfficiencyCurveRaw) -> Result<Self> {
        Self::new(raw.wind_speed, raw.efficiency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_curve() -> PowerCurve {
        PowerCurve::from_pairs(&[(0.0, 0.0), (5.0, 500.0), (10.0, 2000.0), (15.0, 3000.0)]).unwrap()
    }

    #[test]
    fn test_power_at_interpolates_and_clamps() {
        let curve = sample_curve();
        assert_eq!(curve.power_at(7.5), 1250.0);
        assert_eq!(curve.power_at(30.0), 3000.0);
        assert_eq!(curve.power_at(-1.0), 0.0);
        assert_eq!(curve.max_power(), 3000.0);
    }

    #[test]
    fn test_rejects_unsorted_and_negative() {
        assert!(PowerCurve::from_pairs(&[(0.0, 0.0), (0.0, 1.0)]).is_err());
        assert!(PowerCurve::from_pairs(&[(1.0, 0.0), (0.5, 1.0)]).is_err());
        assert!(PowerCurve::from_pairs(&[(0.0, -1.0)]).is_err());
        assert!(PowerCurve::new(vec![0.0, 1.0], vec![0.0]).is_err());
        assert!(PowerCurve::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_scaled_keeps_wind_speeds() {
        let curve = sample_curve();
        let scaled = curve.scaled(0.9);
        assert_eq!(scaled.wind_speed(), curve.wind_speed());
        assert_eq!(scaled.power()[2], 1800.0);
    }

    #[test]
    fn test_area_trapezoid() {
        let curve = PowerCurve::from_pairs(&[(0.0, 0.0), (2.0, 2.0), (4.0, 2.0)]).unwrap();
        assert_eq!(curve.area(), 6.0);
    }

    #[test]
    fn test_deserialize_validates_shape() {
        let curve: PowerCurve = serde_json::from_str(r#"{"wind_speed":[0.0,5.0],"power":[0.0,500.0]}"#).unwrap();
        assert_eq!(curve.power_at(2.5), 250.0);
        assert!(serde_json::from_str::<PowerCurve>(r#"{"wind_speed":[],"power":[]}"#).is_err());
        assert!(serde_json::from_str::<PowerCurve>(r#"{"wind_speed":[5.0,1.0],"power":[0.0,1.0]}"#).is_err());
        assert!(
            serde_json::from_str::<PowerCoefficientCurve>(r#"{"wind_speed":[1.0],"power_coefficient":[-0.1]}"#)
                .is_err()
        );
        assert!(serde_json::from_str::<EfficiencyCurve>(r#"{"wind_speed":[1.0,2.0],"efficiency":[0.9]}"#).is_err());
    }

    #[test]
    fn test_efficiency_index_lookup() {
        let curve = EfficiencyCurve::from_pairs(&[(2.0, 0.8), (4.0, 1.0)]).unwrap();
        assert_eq!(curve.efficiency_at_index(1.0), None);
        assert_eq!(curve.efficiency_at_index(3.0), Some(0.9));
        assert_eq!(curve.efficiency_at_index(10.0), Some(1.0));
        assert_eq!(curve.efficiency_at(1.0), 0.8);
    }
}
