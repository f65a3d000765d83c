//! Power curve transforms
//!
//! Wake loss scaling, Gaussian smoothing, density correction and summation of
//! power curves. Every function takes curves by reference and returns a new
//! curve; nothing here keeps state.
//!
//! # Scientific References
//! - Knorr, K. (2016). "Modellierung von raum-zeitlichen Eigenschaften der
//!   Windenergieeinspeisung für wetterdatenbasierte Windleistungssimulationen",
//!   Universität Kassel, p. 106
//! - Staffell, I., Pfenninger, S. (2016). "Using bias-corrected reanalysis to
//!   simulate current and future wind power output", Energy 114, p. 1224
//! - Svenningsen, L. (2010). "Power Curve Air Density Correction And Other
//!   Power Curve Options in WindPRO", EMD International A/S, p. 4

use crate::config::{StandardDeviationMethod, WakeLossesModel};
use crate::core_types::curve::PowerCurve;
use crate::entities::FarmEfficiency;
use crate::error::{Result, WindPowerError};
use crate::physics::density::STANDARD_DENSITY;
use crate::physics::tools::{gauss_distribution, interp_clamped, interp_index, interp_zero_outside};

/// Upper bound on the points of one smoothing block (`2 × range / width`)
pub const MAX_SMOOTHING_BLOCK_POINTS: f64 = 10_000.0;

/// Parameters of [`smooth_power_curve`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    /// Step of the moving block (m/s)
    pub block_width: f64,
    /// Half width of the moving block, also the extension past the curve end (m/s)
    pub wind_speed_range: f64,
    /// Standard deviation of the Gaussian kernel
    pub standard_deviation_method: StandardDeviationMethod,
    /// Required for [`StandardDeviationMethod::TurbulenceIntensity`]
    pub turbulence_intensity: Option<f64>,
    /// Mean of the Gaussian kernel (m/s)
    pub mean_gauss: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            block_width: 0.5,
            wind_speed_range: 15.0,
            standard_deviation_method: StandardDeviationMethod::TurbulenceIntensity,
            turbulence_intensity: None,
            mean_gauss: 0.0,
        }
    }
}

impl SmoothingParams {
    /// Normalized standard deviation: σ = v × factor (+ 0.6 for Staffell-Pfenninger)
    fn normalized_standard_deviation(&self) -> Result<f64> {
        match self.standard_deviation_method {
            StandardDeviationMethod::TurbulenceIntensity => self.turbulence_intensity.ok_or_else(|| {
                WindPowerError::configuration(
                    "turbulence_intensity",
                    "none",
                    &["a turbulence intensity when standard_deviation_method is 'turbulence_intensity'"],
                )
            }),
            StandardDeviationMethod::StaffellPfenninger => Ok(0.2),
        }
    }

    fn standard_deviation(&self, normalized: f64, wind_speed: f64) -> f64 {
        match self.standard_deviation_method {
            StandardDeviationMethod::TurbulenceIntensity => wind_speed * normalized,
            StandardDeviationMethod::StaffellPfenninger => wind_speed * normalized + 0.6,
        }
    }
}

/// Smooth a power curve with a Gaussian kernel.
///
/// The curve is first extended by `wind_speed_range` past its last point in
/// steps of `block_width`, with zero power there. Each point of the extended
/// curve is then replaced by
///
/// ```text
/// P_smooth(v) = Σ_w  block_width × P(w) × N(v - w; μ, σ(v))
/// ```
///
/// over the block `w ∈ [v - range, v + range]`, with P zero outside the
/// extended curve. Points where σ is zero or the sum is not finite get zero.
///
/// # Errors
/// - [`WindPowerError::Configuration`] if `block_width` is not positive, if
///   `2 × wind_speed_range / block_width` exceeds [`MAX_SMOOTHING_BLOCK_POINTS`],
///   or if the turbulence intensity method is chosen without a turbulence
///   intensity.
/// - [`WindPowerError::InvalidInput`] for an empty curve.
pub fn smooth_power_curve(curve: &PowerCurve, params: &SmoothingParams) -> Result<PowerCurve> {
    if !(params.block_width > 0.0 && params.block_width.is_finite()) {
        return Err(WindPowerError::configuration(
            "block_width",
            params.block_width.to_string(),
            &["a width > 0"],
        ));
    }
    if !(params.wind_speed_range >= 0.0 && params.wind_speed_range.is_finite()) {
        return Err(WindPowerError::configuration(
            "wind_speed_range",
            params.wind_speed_range.to_string(),
            &["a range >= 0"],
        ));
    }
    if 2.0 * params.wind_speed_range / params.block_width > MAX_SMOOTHING_BLOCK_POINTS {
        return Err(WindPowerError::configuration(
            "block_width",
            params.block_width.to_string(),
            &["a width of at least 2 × wind_speed_range / 10000"],
        ));
    }
    let last = *curve
        .wind_speed()
        .last()
        .ok_or_else(|| WindPowerError::InvalidInput("cannot smooth an empty power curve".into()))?;
    let normalized = params.normalized_standard_deviation()?;

    let bw = params.block_width;
    let extension_steps = (params.wind_speed_range / bw).round() as usize;

    let mut wind_speed = curve.wind_speed().to_vec();
    let mut power = curve.power().to_vec();
    wind_speed.extend((1..=extension_steps).map(|k| last + k as f64 * bw));
    power.resize(wind_speed.len(), 0.0);

    let block_points = (2.0 * params.wind_speed_range / bw).round() as usize + 1;
    let offsets: Vec<f64> = (0..block_points)
        .map(|i| -params.wind_speed_range + i as f64 * bw)
        .collect();

    let smoothed = wind_speed
        .iter()
        .map(|&v| {
            let sigma = params.standard_deviation(normalized, v);
            if sigma <= 0.0 {
                return 0.0;
            }
            let value: f64 = offsets
                .iter()
                .map(|&offset| {
                    let w = v + offset;
                    bw * interp_zero_outside(w, &wind_speed, &power)
                        * gauss_distribution(v - w, sigma, params.mean_gauss)
                })
                .sum();
            if value.is_finite() {
                value
            } else {
                0.0
            }
        })
        .collect();

    tracing::trace!(
        points = wind_speed.len(),
        method = %params.standard_deviation_method,
        "Smoothed power curve"
    );
    Ok(PowerCurve::from_sorted_unchecked(wind_speed, smoothed))
}

/// Apply farm efficiency to a power curve.
///
/// * [`WakeLossesModel::ConstantEfficiency`] needs [`FarmEfficiency::Constant`]
///   and scales every power value.
/// * [`WakeLossesModel::PowerEfficiencyCurve`] needs [`FarmEfficiency::Curve`];
///   power is multiplied by the efficiency interpolated along the wind speed
///   index and rows below the efficiency curve's first wind speed are dropped.
///
/// # Errors
/// - [`WindPowerError::TypeMismatch`] if the efficiency has the wrong shape for the method
/// - [`WindPowerError::Configuration`] for any other wake losses model
/// - [`WindPowerError::InvalidInput`] if no row has an efficiency
pub fn wake_losses_to_power_curve(
    curve: &PowerCurve,
    model: WakeLossesModel,
    efficiency: &FarmEfficiency,
) -> Result<PowerCurve> {
    match (model, efficiency) {
        (WakeLossesModel::ConstantEfficiency, FarmEfficiency::Constant(e)) => Ok(curve.scaled(*e)),
        (WakeLossesModel::ConstantEfficiency, FarmEfficiency::Curve(_)) => Err(WindPowerError::TypeMismatch(
            "wind farm efficiency must be a constant if `wake_losses_model` is 'constant_efficiency'".into(),
        )),
        (WakeLossesModel::PowerEfficiencyCurve, FarmEfficiency::Curve(eff)) => {
            let (wind_speed, power): (Vec<f64>, Vec<f64>) = curve
                .iter()
                .filter_map(|(v, p)| eff.efficiency_at_index(v).map(|e| (v, p * e)))
                .unzip();
            if wind_speed.is_empty() {
                return Err(WindPowerError::InvalidInput(
                    "efficiency curve starts above the last power curve wind speed".into(),
                ));
            }
            Ok(PowerCurve::from_sorted_unchecked(wind_speed, power))
        }
        (WakeLossesModel::PowerEfficiencyCurve, FarmEfficiency::Constant(_)) => Err(WindPowerError::TypeMismatch(
            "wind farm efficiency must be a curve if `wake_losses_model` is 'power_efficiency_curve'".into(),
        )),
        (other, _) => Err(WindPowerError::configuration(
            "wake_losses_model",
            other.to_string(),
            &["constant_efficiency", "power_efficiency_curve"],
        )),
    }
}

/// Exponent of the density correction, rising from 1/3 at 7.5 m/s to 2/3 at 12.5 m/s
pub fn density_correction_exponent(wind_speed: f64) -> f64 {
    interp_clamped(wind_speed, &[7.5, 12.5], &[1.0 / 3.0, 2.0 / 3.0])
}

/// Density-correct a power curve for a site density.
///
/// ```text
/// v_site = v_std × (ρ₀ / ρ_site)^p(v_std)
/// ```
///
/// with ρ₀ = 1.225 kg/m³ and p from [`density_correction_exponent`]. Power
/// values are kept; only the wind speeds move.
///
/// # Errors
/// [`WindPowerError::InvalidInput`] for a non-positive or non-finite density.
pub fn density_correct_power_curve(curve: &PowerCurve, density: f64) -> Result<PowerCurve> {
    if !(density > 0.0 && density.is_finite()) {
        return Err(WindPowerError::InvalidInput(format!(
            "density for the power curve correction must be positive, got {density}"
        )));
    }
    let ratio = STANDARD_DENSITY / density;
    let wind_speed = curve
        .wind_speed()
        .iter()
        .map(|&v| v * ratio.powf(density_correction_exponent(v)))
        .collect();
    PowerCurve::new(wind_speed, curve.power().to_vec())
}

/// Sum power curves on the union of their wind speeds.
///
/// Each curve is aligned to the union by index interpolation: zero below its
/// first wind speed, linear inside, its last value above its end.
///
/// # Errors
/// [`WindPowerError::InvalidInput`] if no curve is given.
pub fn sum_power_curves<'a, I>(curves: I) -> Result<PowerCurve>
where
    I: IntoIterator<Item = &'a PowerCurve>,
{
    let curves: Vec<&PowerCurve> = curves.into_iter().collect();
    if curves.is_empty() {
        return Err(WindPowerError::InvalidInput("no power curves to sum".into()));
    }

    let mut wind_speed: Vec<f64> = curves.iter().flat_map(|c| c.wind_speed().iter().copied()).collect();
    wind_speed.sort_by(f64::total_cmp);
    wind_speed.dedup();

    let power = wind_speed
        .iter()
        .map(|&v| {
            curves
                .iter()
                .map(|c| interp_index(v, c.wind_speed(), c.power()).unwrap_or(0.0))
                .sum()
        })
        .collect();
    Ok(PowerCurve::from_sorted_unchecked(wind_speed, power))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::curve::EfficiencyCurve;
    use approx::assert_relative_eq;

    fn test_curve() -> PowerCurve {
        PowerCurve::from_pairs(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (5.0, 500.0),
            (8.0, 1800.0),
            (12.0, 3000.0),
            (25.0, 3000.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_constant_efficiency() {
        let curve = test_curve();
        let reduced =
            wake_losses_to_power_curve(&curve, WakeLossesModel::ConstantEfficiency, &FarmEfficiency::Constant(0.9))
                .unwrap();
        assert_eq!(reduced.wind_speed(), curve.wind_speed());
        for (p_reduced, p) in reduced.power().iter().zip(curve.power()) {
            assert_eq!(*p_reduced, p * 0.9);
        }
    }

    #[test]
    fn test_efficiency_curve_drops_rows_without_efficiency() {
        let curve = test_curve();
        let eff = EfficiencyCurve::from_pairs(&[(3.0, 0.8), (8.0, 0.9), (12.0, 1.0)]).unwrap();
        let reduced =
            wake_losses_to_power_curve(&curve, WakeLossesModel::PowerEfficiencyCurve, &FarmEfficiency::Curve(eff))
                .unwrap();
        assert_eq!(reduced.wind_speed(), &[3.0, 5.0, 8.0, 12.0, 25.0]);
        assert_relative_eq!(reduced.power()[1], 500.0 * 0.84);
        assert_relative_eq!(reduced.power()[2], 1800.0 * 0.9);
        assert_relative_eq!(reduced.power()[4], 3000.0);
    }

    #[test]
    fn test_wake_losses_shape_mismatch() {
        let curve = test_curve();
        let eff = EfficiencyCurve::from_pairs(&[(0.0, 0.9)]).unwrap();
        assert!(matches!(
            wake_losses_to_power_curve(&curve, WakeLossesModel::ConstantEfficiency, &FarmEfficiency::Curve(eff)),
            Err(WindPowerError::TypeMismatch(_))
        ));
        assert!(matches!(
            wake_losses_to_power_curve(&curve, WakeLossesModel::PowerEfficiencyCurve, &FarmEfficiency::Constant(0.9)),
            Err(WindPowerError::TypeMismatch(_))
        ));
        assert!(
            wake_losses_to_power_curve(&curve, WakeLossesModel::None, &FarmEfficiency::Constant(0.9))
                .unwrap_err()
                .is_configuration()
        );
    }

    #[test]
    fn test_smoothing_requires_turbulence_intensity() {
        let err = smooth_power_curve(&test_curve(), &SmoothingParams::default()).unwrap_err();
        assert!(err.is_configuration());

        let params = SmoothingParams {
            block_width: 0.0,
            turbulence_intensity: Some(0.1),
            ..SmoothingParams::default()
        };
        assert!(smooth_power_curve(&test_curve(), &params).unwrap_err().is_configuration());
    }

    #[test]
    fn test_smoothing_block_size_is_bounded() {
        let tiny = SmoothingParams {
            block_width: 1e-9,
            turbulence_intensity: Some(0.1),
            ..SmoothingParams::default()
        };
        let err = smooth_power_curve(&test_curve(), &tiny).unwrap_err();
        assert!(matches!(err, WindPowerError::Configuration { parameter: "block_width", .. }));

        let fine = SmoothingParams {
            block_width: 0.01,
            ..tiny
        };
        assert!(smooth_power_curve(&test_curve(), &fine).is_ok());
    }

    #[test]
    fn test_smoothing_empty_curve() {
        let empty = PowerCurve::from_sorted_unchecked(Vec::new(), Vec::new());
        let params = SmoothingParams {
            turbulence_intensity: Some(0.1),
            ..SmoothingParams::default()
        };
        assert!(matches!(
            smooth_power_curve(&empty, &params),
            Err(WindPowerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_smoothing_extends_domain_and_stays_non_negative() {
        let params = SmoothingParams {
            turbulence_intensity: Some(0.15),
            ..SmoothingParams::default()
        };
        let smoothed = smooth_power_curve(&test_curve(), &params).unwrap();
        // 6 original points plus 15 m/s of 0.5 m/s steps
        assert_eq!(smoothed.len(), 6 + 30);
        assert_eq!(smoothed.wind_speed()[smoothed.len() - 1], 40.0);
        // σ = 0 at 0 m/s
        assert_eq!(smoothed.power()[0], 0.0);
        assert!(smoothed.power().iter().all(|&p| p >= 0.0 && p.is_finite()));

        let staffell = SmoothingParams {
            standard_deviation_method: StandardDeviationMethod::StaffellPfenninger,
            ..SmoothingParams::default()
        };
        let smoothed = smooth_power_curve(&test_curve(), &staffell).unwrap();
        assert!(smoothed.power().iter().all(|&p| p >= 0.0 && p.is_finite()));
        assert!(smoothed.power()[0] > 0.0);
    }

    #[test]
    fn test_density_correction() {
        let curve = test_curve();
        // Standard density leaves the curve untouched
        let same = density_correct_power_curve(&curve, STANDARD_DENSITY).unwrap();
        for (a, b) in same.wind_speed().iter().zip(curve.wind_speed()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
        // Thinner air needs more wind for the same power
        let thin = density_correct_power_curve(&curve, 1.1).unwrap();
        assert_relative_eq!(thin.wind_speed()[1], 3.0 * (1.225_f64 / 1.1).powf(1.0 / 3.0), epsilon = 1e-12);
        assert_relative_eq!(thin.wind_speed()[4], 12.0 * (1.225_f64 / 1.1).powf(19.0 / 30.0), epsilon = 1e-12);
        assert_eq!(thin.power(), curve.power());

        assert!(density_correct_power_curve(&curve, 0.0).is_err());
        assert_relative_eq!(density_correction_exponent(10.0), 10.0 / 15.0 - 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sum_power_curves_aligns_on_union() {
        let a = PowerCurve::from_pairs(&[(0.0, 0.0), (10.0, 100.0)]).unwrap();
        let b = PowerCurve::from_pairs(&[(5.0, 10.0), (15.0, 20.0)]).unwrap();
        let total = sum_power_curves([&a, &b]).unwrap();
        assert_eq!(total.wind_speed(), &[0.0, 5.0, 10.0, 15.0]);
        // b contributes nothing below 5 m/s, a is held at 100 above 10 m/s
        assert_relative_eq!(total.power()[0], 0.0);
        assert_relative_eq!(total.power()[1], 50.0 + 10.0);
        assert_relative_eq!(total.power()[2], 100.0 + 15.0);
        assert_relative_eq!(total.power()[3], 100.0 + 20.0);

        assert!(sum_power_curves(std::iter::empty::<&PowerCurve>()).is_err());
    }
}
