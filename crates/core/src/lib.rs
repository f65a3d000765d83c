//! Wind Power Model Chain Core Library
//!
//! Computes the electrical power output of wind turbines, wind farms and
//! clusters of wind farms from weather time series.
//!
//! ## Model chain
//!
//! - Wind speed, temperature and air density moved to hub height
//!   (logarithmic profile, Hellman power law, temperature gradient,
//!   barometric and ideal gas equations, linear inter-/extrapolation)
//! - Power output from power curves or power coefficient curves, optionally
//!   density corrected
//! - Aggregated power curves for farms and clusters with wake losses and
//!   Gaussian smoothing
//!
//! ```no_run
//! use windpower_core::{ModelChain, ModelChainConfig, PowerCurve, WindTurbine, Meters};
//! # fn main() -> windpower_core::Result<()> {
//! let curve = PowerCurve::from_pairs(&[(3.0, 0.0), (12.0, 3.0e6), (25.0, 3.0e6)])?;
//! let turbine = WindTurbine::from_power_curve("E-82", Meters::new(135.0), curve);
//! let weather = windpower_core::io::read_weather_csv("weather.csv")?;
//! let output = ModelChain::new(&turbine, ModelChainConfig::default()).run_model(&weather)?;
//! println!("{:?}", output.power_output);
//! # Ok(())
//! # }
//! ```

// Core types and utilities
pub mod config;
pub mod core_types;
pub mod error;
pub mod io;

// Physical models
pub mod physics;
pub mod power_curves;
pub mod power_output;
pub mod wake_losses;

// Entities and model chains
pub mod entities;
pub mod modelchain;

// Re-export core types
pub use core_types::{EfficiencyCurve, HeightSeries, Meters, PowerCoefficientCurve, PowerCurve, Watts};
pub use core_types::{WeatherData, WeatherVariable};
pub use error::{Result, WindPowerError};
pub use wake_losses::WindEfficiencyCurves;

// Re-export configuration
pub use config::{
    DensityModel, ModelChainConfig, PowerOutputModel, SmoothingOrder, StandardDeviationMethod, TemperatureModel,
    TurbineClusterConfig, WakeLossesModel, WindEfficiencyCurveName, WindSpeedModel,
};

// Re-export entities and model chains
pub use entities::{FarmEfficiency, FleetEntry, WindFarm, WindTurbine, WindTurbineCluster};
pub use modelchain::{
    AggregatedPowerCurve, ChainStage, ModelChain, ModelChainOutput, PowerPlant, TurbineClusterModelChain,
    TurbineClusterOutput,
};
