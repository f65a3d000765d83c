//! Air density at hub height
//!
//! Both equations move the measured pressure to hub height with a constant
//! pressure gradient of -1/8 hPa/m before evaluating density.
//!
//! # Scientific References
//! - Hau, E. (2008). "Windkraftanlagen - Grundlagen, Technik, Einsatz,
//!   Wirtschaftlichkeit", 4th ed., Springer, p. 560
//! - Ahrendts, J., Kabelac, S. (2014). "Das Ingenieurwissen - Technische
//!   Thermodynamik", 34th ed., Springer, p. 23
//! - ICAO (1993). "Manual of the ICAO Standard Atmosphere", Doc 7488/3

use crate::core_types::units::Meters;

/// Air density of the standard atmosphere at sea level (kg/m³)
pub const STANDARD_DENSITY: f64 = 1.225;

/// Temperature of the standard atmosphere at sea level (K)
pub const STANDARD_TEMPERATURE: f64 = 288.15;

/// Pressure of the standard atmosphere at sea level (Pa)
pub const STANDARD_PRESSURE: f64 = 101_325.0;

/// Specific gas constant of dry air (J/(kg·K))
pub const GAS_CONSTANT_DRY_AIR: f64 = 287.058;

/// Pressure at hub height in hPa, using a gradient of -1/8 hPa/m
#[inline]
fn pressure_at_hub_hpa(pressure: f64, pressure_height: Meters, hub_height: Meters) -> f64 {
    pressure / 100.0 - (hub_height - pressure_height) / 8.0
}

/// Air density at hub height from the barometric height equation
///
/// ```text
/// ρ_hub = (p/100 - (h_hub - h_p)/8) × ρ₀·T₀·100 / (p₀·T_hub)
/// ```
///
/// # Arguments
/// * `pressure` - Air pressure at `pressure_height` (Pa)
/// * `pressure_height` - Height of the pressure measurement
/// * `hub_height` - Target height
/// * `temperature_hub` - Air temperature at hub height (K)
///
/// # Returns
/// Air density at hub height (kg/m³)
pub fn rho_barometric(pressure: f64, pressure_height: Meters, hub_height: Meters, temperature_hub: f64) -> f64 {
    pressure_at_hub_hpa(pressure, pressure_height, hub_height) * STANDARD_DENSITY * STANDARD_TEMPERATURE * 100.0
        / (STANDARD_PRESSURE * temperature_hub)
}

/// Air density at hub height from the ideal gas equation
///
/// ```text
/// p_hub = (p/100 - (h_hub - h_p)/8) × 100
/// ρ_hub = p_hub / (R_s × T_hub)
/// ```
///
/// # Arguments
/// Same as [`rho_barometric`].
pub fn rho_ideal_gas(pressure: f64, pressure_height: Meters, hub_height: Meters, temperature_hub: f64) -> f64 {
    pressure_at_hub_hpa(pressure, pressure_height, hub_height) * 100.0 / (GAS_CONSTANT_DRY_AIR * temperature_hub)
}

/// Apply a scalar density equation to aligned pressure and temperature series.
pub fn density_series(
    equation: fn(f64, Meters, Meters, f64) -> f64,
    pressure: &[f64],
    pressure_height: Meters,
    hub_height: Meters,
    temperature_hub: &[f64],
) -> Vec<f64> {
    pressure
        .iter()
        .zip(temperature_hub)
        .map(|(&p, &t)| equation(p, pressure_height, hub_height, t))
        .collect()
}
