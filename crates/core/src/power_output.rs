//! Turbine power output from hub height wind speed
//!
//! # Scientific References
//! - Gasch, R., Twele, J. (2010). "Windkraftanlagen", 6th ed.,
//!   Vieweg + Teubner, pp. 35ff, 208
//! - Hau, E. (2008). "Windkraftanlagen", 4th ed., Springer, p. 542
//! - Svenningsen, L. (2010). "Power Curve Air Density Correction And Other
//!   Power Curve Options in WindPRO", EMD International A/S, p. 4

use crate::core_types::curve::{PowerCoefficientCurve, PowerCurve};
use crate::core_types::units::Meters;
use crate::error::{Result, WindPowerError};
use crate::physics::density::STANDARD_DENSITY;
use crate::physics::tools::interp_clamped;
use crate::power_curves::density_correction_exponent;
use std::f64::consts::PI;

fn check_aligned(wind_speed: &[f64], density: &[f64]) -> Result<()> {
    if wind_speed.len() == density.len() {
        Ok(())
    } else {
        Err(WindPowerError::InvalidInput(format!(
            "{} wind speeds but {} densities",
            wind_speed.len(),
            density.len()
        )))
    }
}

/// Power from the physical power formula
///
/// ```text
/// P = 1/8 × ρ × d² × π × v³ × cp(v)
/// ```
///
/// cp is interpolated linearly and held constant beyond the tabulated range.
///
/// # Arguments
/// * `wind_speed` - Hub height wind speed (m/s)
/// * `density` - Air density at hub height (kg/m³), aligned with `wind_speed`
/// * `rotor_diameter` - Rotor diameter
/// * `cp_curve` - Power coefficient curve
///
/// # Returns
/// Power output per time step (W)
pub fn power_coefficient_curve(
    wind_speed: &[f64],
    density: &[f64],
    rotor_diameter: Meters,
    cp_curve: &PowerCoefficientCurve,
) -> Result<Vec<f64>> {
    check_aligned(wind_speed, density)?;
    let d = *rotor_diameter;
    Ok(wind_speed
        .iter()
        .zip(density)
        .map(|(&v, &rho)| rho * d * d * PI * v.powi(3) * cp_curve.cp_at(v) / 8.0)
        .collect())
}

/// Power curve equivalent of a cp curve at standard density (1.225 kg/m³)
pub fn cp_curve_to_power_curve(cp_curve: &PowerCoefficientCurve, rotor_diameter: Meters) -> PowerCurve {
    let d = *rotor_diameter;
    let power = cp_curve
        .wind_speed()
        .iter()
        .zip(cp_curve.power_coefficient())
        .map(|(&v, &cp)| STANDARD_DENSITY * d * d * PI * v.powi(3) * cp / 8.0)
        .collect();
    PowerCurve::from_sorted_unchecked(cp_curve.wind_speed().to_vec(), power)
}

/// Power from a cp curve with density correction.
///
/// The cp curve is converted to a power curve at standard density, which is
/// then evaluated with [`power_curve_density_corrected`].
pub fn power_coefficient_curve_density_corrected(
    wind_speed: &[f64],
    density: &[f64],
    rotor_diameter: Meters,
    cp_curve: &PowerCoefficientCurve,
) -> Result<Vec<f64>> {
    let curve = cp_curve_to_power_curve(cp_curve, rotor_diameter);
    power_curve_density_corrected(wind_speed, density, &curve)
}

/// Power by interpolating a power curve.
///
/// Wind speeds beyond the curve are clamped to its first and last value.
pub fn power_curve(wind_speed: &[f64], curve: &PowerCurve) -> Vec<f64> {
    wind_speed.iter().map(|&v| curve.power_at(v)).collect()
}

/// Power by interpolating a density-corrected power curve.
///
/// For every time step the curve's wind speeds are moved to
/// `v_std × (ρ₀ / ρ)^p(v_std)` with that step's density before the lookup.
///
/// # Errors
/// [`WindPowerError::InvalidInput`] if the series are misaligned or a density
/// is not positive.
pub fn power_curve_density_corrected(wind_speed: &[f64], density: &[f64], curve: &PowerCurve) -> Result<Vec<f64>> {
    check_aligned(wind_speed, density)?;
    let exponents: Vec<f64> = curve
        .wind_speed()
        .iter()
        .map(|&v| density_correction_exponent(v))
        .collect();

    let mut shifted = vec![0.0; curve.len()];
    wind_speed
        .iter()
        .zip(density)
        .map(|(&v, &rho)| {
            if !(rho > 0.0 && rho.is_finite()) {
                return Err(WindPowerError::InvalidInput(format!(
                    "density must be positive for the power curve correction, got {rho}"
                )));
            }
            let ratio = STANDARD_DENSITY / rho;
            for ((s, &v_std), &p) in shifted.iter_mut().zip(curve.wind_speed()).zip(&exponents) {
                *s = v_std * ratio.powf(p);
            }
            Ok(interp_clamped(v, &shifted, curve.power()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cp_curve() -> PowerCoefficientCurve {
        PowerCoefficientCurve::from_pairs(&[(4.0, 0.2), (8.0, 0.45), (12.0, 0.3)]).unwrap()
    }

    #[test]
    fn test_power_coefficient_curve() {
        let d = Meters::new(80.0);
        let p = power_coefficient_curve(&[8.0, 10.0], &[1.2, 1.3], d, &cp_curve()).unwrap();
        assert_relative_eq!(p[0], 1.2 * 6400.0 * PI * 512.0 * 0.45 / 8.0, max_relative = 1e-12);
        assert_relative_eq!(p[1], 1.3 * 6400.0 * PI * 1000.0 * 0.375 / 8.0, max_relative = 1e-12);

        // cp held at the boundary value
        let p = power_coefficient_curve(&[2.0, 20.0], &[1.225, 1.225], d, &cp_curve()).unwrap();
        assert_relative_eq!(p[0], 1.225 * 6400.0 * PI * 8.0 * 0.2 / 8.0, max_relative = 1e-12);
        assert_relative_eq!(p[1], 1.225 * 6400.0 * PI * 8000.0 * 0.3 / 8.0, max_relative = 1e-12);

        assert!(power_coefficient_curve(&[1.0], &[], d, &cp_curve()).is_err());
    }

    #[test]
    fn test_power_curve_clamps() {
        let curve = PowerCurve::from_pairs(&[(3.0, 0.0), (12.0, 3000.0), (25.0, 3000.0)]).unwrap();
        let p = power_curve(&[0.0, 7.5, 30.0, 12.0], &curve);
        assert_eq!(p, vec![0.0, 1500.0, 3000.0, 3000.0]);
    }

    #[test]
    fn test_density_correction_at_standard_density_is_identity() {
        let curve = PowerCurve::from_pairs(&[(3.0, 0.0), (12.0, 3000.0), (25.0, 3000.0)]).unwrap();
        let v = [5.0, 9.0, 14.0];
        let corrected = power_curve_density_corrected(&v, &[STANDARD_DENSITY; 3], &curve).unwrap();
        for (a, b) in corrected.iter().zip(power_curve(&v, &curve)) {
            assert_relative_eq!(*a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_thin_air_lowers_power() {
        let curve = PowerCurve::from_pairs(&[(3.0, 0.0), (12.0, 3000.0), (25.0, 3000.0)]).unwrap();
        let standard = power_curve(&[8.0], &curve)[0];
        let thin = power_curve_density_corrected(&[8.0], &[1.0], &curve).unwrap()[0];
        let dense = power_curve_density_corrected(&[8.0], &[1.3], &curve).unwrap()[0];
        assert!(thin < standard && standard < dense);
        assert!(power_curve_density_corrected(&[8.0], &[0.0], &curve).is_err());
    }

    #[test]
    fn test_cp_density_corrected_matches_plain_cp_at_standard_density() {
        let d = Meters::new(80.0);
        // Inside the tabulated range both paths interpolate the same physics
        let at_points = power_coefficient_curve_density_corrected(&[8.0], &[STANDARD_DENSITY], d, &cp_curve()).unwrap();
        let plain = power_coefficient_curve(&[8.0], &[STANDARD_DENSITY], d, &cp_curve()).unwrap();
        assert_relative_eq!(at_points[0], plain[0], max_relative = 1e-12);
    }
}
