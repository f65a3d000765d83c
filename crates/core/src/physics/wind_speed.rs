//! Wind speed at hub height
//!
//! Two vertical profile models that extrapolate a measured wind speed from
//! its measurement height to hub height.
//!
//! # Scientific References
//! - Gasch, R., Twele, J. (2011). "Windkraftanlagen", 7th ed.,
//!   Vieweg + Teubner, p. 129 (logarithmic profile) and p. 279 (Hellman)
//! - Hau, E. (2008). "Windkraftanlagen", 4th ed., Springer, p. 515, p. 517
//! - Sharp, E. (2015). "Spatiotemporal disaggregation of GB scenarios
//!   depicting increased wind capacity", UCL Energy Institute, p. 83

use crate::core_types::units::Meters;
use crate::error::{Result, WindPowerError};

/// Displacement height as a fraction of the surrounding obstacle height
pub const DISPLACEMENT_FACTOR: f64 = 0.7;

/// Hellman exponent used when neither an exponent nor a roughness length is known
pub const DEFAULT_HELLMAN_EXPONENT: f64 = 1.0 / 7.0;

fn check_displacement(wind_speed_height: Meters, obstacle_height: Meters) -> Result<f64> {
    let displacement = DISPLACEMENT_FACTOR * *obstacle_height;
    if displacement > *wind_speed_height {
        return Err(WindPowerError::InvalidInput(format!(
            "an obstacle height of {obstacle_height} needs wind speed data measured above \
             {displacement:.2} m, got data at {wind_speed_height}"
        )));
    }
    Ok(displacement)
}

/// Wind speed at hub height from the logarithmic wind profile
///
/// ```text
/// v_hub = v × ln((h_hub - d) / z₀) / ln((h_data - d) / z₀),   d = 0.7 × h_obstacle
/// ```
///
/// # Arguments
/// * `wind_speed` - Wind speed at `wind_speed_height` (m/s)
/// * `wind_speed_height` - Height of the wind speed measurement
/// * `hub_height` - Target height
/// * `roughness_length` - Roughness length z₀ (m)
/// * `obstacle_height` - Height of obstacles around the turbine; zero for
///   widely spread obstacles
///
/// # Errors
/// [`WindPowerError::InvalidInput`] if the displacement height lies above the
/// measurement height.
pub fn logarithmic_profile(
    wind_speed: f64,
    wind_speed_height: Meters,
    hub_height: Meters,
    roughness_length: f64,
    obstacle_height: Meters,
) -> Result<f64> {
    let d = check_displacement(wind_speed_height, obstacle_height)?;
    Ok(log_ratio(wind_speed, *wind_speed_height, *hub_height, roughness_length, d))
}

#[inline]
fn log_ratio(wind_speed: f64, data_height: f64, hub_height: f64, z0: f64, d: f64) -> f64 {
    wind_speed * ((hub_height - d) / z0).ln() / ((data_height - d) / z0).ln()
}

/// [`logarithmic_profile`] over a series, with one roughness length per time step
pub fn logarithmic_profile_series(
    wind_speed: &[f64],
    wind_speed_height: Meters,
    hub_height: Meters,
    roughness_length: &[f64],
    obstacle_height: Meters,
) -> Result<Vec<f64>> {
    let d = check_displacement(wind_speed_height, obstacle_height)?;
    Ok(wind_speed
        .iter()
        .zip(roughness_length)
        .map(|(&v, &z0)| log_ratio(v, *wind_speed_height, *hub_height, z0, d))
        .collect())
}

/// Hellman exponent actually used by [`hellman`]
///
/// The given exponent if any, else `1 / ln(h_hub / z₀)` when a roughness
/// length is known, else 1/7.
pub fn hellman_exponent(hub_height: Meters, exponent: Option<f64>, roughness_length: Option<f64>) -> f64 {
    match (exponent, roughness_length) {
        (Some(alpha), _) => alpha,
        (None, Some(z0)) => 1.0 / (*hub_height / z0).ln(),
        (None, None) => DEFAULT_HELLMAN_EXPONENT,
    }
}

/// Wind speed at hub height from the Hellman power law
///
/// ```text
/// v_hub = v × (h_hub / h_data)^α
/// ```
///
/// See [`hellman_exponent`] for how α is chosen.
pub fn hellman(
    wind_speed: f64,
    wind_speed_height: Meters,
    hub_height: Meters,
    exponent: Option<f64>,
    roughness_length: Option<f64>,
) -> f64 {
    let alpha = hellman_exponent(hub_height, exponent, roughness_length);
    wind_speed * (*hub_height / *wind_speed_height).powf(alpha)
}

/// [`hellman`] over a series, with an optional roughness length per time step
pub fn hellman_series(
    wind_speed: &[f64],
    wind_speed_height: Meters,
    hub_height: Meters,
    exponent: Option<f64>,
    roughness_length: Option<&[f64]>,
) -> Vec<f64> {
    match roughness_length {
        Some(z0) => wind_speed
            .iter()
            .zip(z0)
            .map(|(&v, &z)| hellman(v, wind_speed_height, hub_height, exponent, Some(z)))
            .collect(),
        None => wind_speed
            .iter()
            .map(|&v| hellman(v, wind_speed_height, hub_height, exponent, None))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_logarithmic_profile() {
        let v = logarithmic_profile_series(&[5.0, 6.5], Meters::new(10.0), Meters::new(100.0), &[0.15, 0.15], Meters::ZERO)
            .unwrap();
        assert_relative_eq!(v[0], 7.741_365_23, epsilon = 1e-7);
        assert_relative_eq!(v[1], 10.063_774_8, epsilon = 1e-6);

        // Obstacles around the turbine
        let v = logarithmic_profile_series(&[5.0, 6.5], Meters::new(10.0), Meters::new(100.0), &[0.15, 0.15], Meters::new(12.0))
            .unwrap();
        assert_relative_eq!(v[0], 13.549_252_81, epsilon = 1e-7);
        assert_relative_eq!(v[1], 17.614_028_65, epsilon = 1e-7);
    }

    #[test]
    fn test_logarithmic_profile_obstacle_above_sensor() {
        let err = logarithmic_profile(5.5, Meters::new(10.0), Meters::new(100.0), 0.15, Meters::new(20.0)).unwrap_err();
        assert!(matches!(err, WindPowerError::InvalidInput(_)));
    }

    #[test]
    fn test_hellman_default_exponent() {
        let v = hellman_series(&[5.0, 6.5], Meters::new(10.0), Meters::new(100.0), None, None);
        assert_relative_eq!(v[0], 6.947_477_4, epsilon = 1e-6);
        assert_relative_eq!(v[1], 9.031_72, epsilon = 1e-5);
    }

    #[test]
    fn test_hellman_with_roughness_and_exponent() {
        let z0 = [0.15, 0.15];
        let v = hellman_series(&[5.0, 6.5], Meters::new(10.0), Meters::new(100.0), None, Some(&z0));
        assert_relative_eq!(v[0], 7.124_624_37, epsilon = 1e-7);
        assert_relative_eq!(v[1], 9.262_011_68, epsilon = 1e-7);

        // An explicit exponent wins over the roughness length
        let v = hellman_series(&[5.0, 6.5], Meters::new(10.0), Meters::new(100.0), Some(0.2), Some(&z0));
        assert_relative_eq!(v[0], 7.924_465_96, epsilon = 1e-7);
        assert_relative_eq!(v[1], 10.301_805_75, epsilon = 1e-7);
    }
}
