//! Core types and utilities

pub mod curve;
pub mod units;
pub mod weather;

pub use curve::{EfficiencyCurve, PowerCoefficientCurve, PowerCurve};
pub use units::*;
pub use weather::{HeightSeries, WeatherData, WeatherVariable};
