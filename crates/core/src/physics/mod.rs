//! Physical formula library
//!
//! Stateless functions that move weather measurements to hub height, plus the
//! numeric helpers shared by the power curve transforms.

pub mod density;
pub mod temperature;
pub mod tools;
pub mod wind_speed;

pub use density::{rho_barometric, rho_ideal_gas};
pub use temperature::temperature_gradient;
pub use tools::{
    estimate_turbulence_intensity, gauss_distribution, linear_extra_interpolation, select_closest,
};
pub use wind_speed::{hellman, logarithmic_profile};
