//! Shared fixtures for the integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use windpower_core::{Meters, PowerCurve, WeatherData, WeatherVariable, WindTurbine};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2010, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Rated 7.5 MW above 12 m/s
pub fn large_turbine_curve() -> PowerCurve {
    PowerCurve::from_pairs(&[
        (0.0, 0.0),
        (3.0, 0.0),
        (5.0, 560_000.0),
        (8.0, 2_600_000.0),
        (10.0, 4_900_000.0),
        (12.0, 7_500_000.0),
        (25.0, 7_500_000.0),
    ])
    .unwrap()
}

/// Hub height 135 m, rotor diameter 127 m
pub fn large_turbine() -> WindTurbine {
    WindTurbine::from_power_curve("E-126/7500", Meters::new(135.0), large_turbine_curve())
        .with_rotor_diameter(Meters::new(127.0))
}

/// Rated 3 MW above 14 m/s
pub fn small_turbine() -> WindTurbine {
    let curve = PowerCurve::from_pairs(&[
        (0.0, 0.0),
        (3.0, 0.0),
        (6.0, 400_000.0),
        (10.0, 1_800_000.0),
        (14.0, 3_000_000.0),
        (25.0, 3_000_000.0),
    ])
    .unwrap();
    WindTurbine::from_power_curve("V90/3000", Meters::new(105.0), curve).with_rotor_diameter(Meters::new(90.0))
}

/// Three hours of weather with wind speed at 10 m and 80 m
pub fn weather() -> WeatherData {
    WeatherData::hourly(start(), 3)
        .with(WeatherVariable::WindSpeed, Meters::new(10.0), vec![5.32697, 5.46199, 5.68384])
        .unwrap()
        .with(WeatherVariable::WindSpeed, Meters::new(80.0), vec![7.80697, 7.86199, 8.59384])
        .unwrap()
        .with(WeatherVariable::Temperature, Meters::new(2.0), vec![267.60, 267.60, 267.61])
        .unwrap()
        .with(WeatherVariable::Temperature, Meters::new(10.0), vec![267.57, 267.55, 267.51])
        .unwrap()
        .with(WeatherVariable::Pressure, Meters::ZERO, vec![98405.7, 98382.7, 98362.9])
        .unwrap()
        .with(WeatherVariable::RoughnessLength, Meters::ZERO, vec![0.15, 0.15, 0.15])
        .unwrap()
}
