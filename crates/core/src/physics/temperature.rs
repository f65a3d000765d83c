//! Air temperature at hub height
//!
//! # Scientific References
//! - ICAO (1993). "Manual of the ICAO Standard Atmosphere", Doc 7488/3
//! - Gasch, R., Twele, J. (2013). "Windkraftanlagen", 8th ed., p. 38

use crate::core_types::units::Meters;

/// Temperature lapse rate of the standard atmosphere (K/m)
pub const TEMPERATURE_GRADIENT: f64 = -0.0065;

/// Temperature at hub height from a linear gradient of -6.5 K/km
///
/// ```text
/// T_hub = T_ref - 0.0065 × (h_hub - h_ref)
/// ```
///
/// # Arguments
/// * `temperature` - Air temperature at `temperature_height` (K)
/// * `temperature_height` - Height of the temperature measurement
/// * `hub_height` - Target height
///
/// # Returns
/// Air temperature at hub height (K)
pub fn temperature_gradient(temperature: f64, temperature_height: Meters, hub_height: Meters) -> f64 {
    temperature + TEMPERATURE_GRADIENT * (hub_height - temperature_height)
}

/// [`temperature_gradient`] applied to every time step of a series
pub fn temperature_gradient_series(
    temperature: &[f64],
    temperature_height: Meters,
    hub_height: Meters,
) -> Vec<f64> {
    temperature
        .iter()
        .map(|&t| temperature_gradient(t, temperature_height, hub_height))
        .collect()
}
