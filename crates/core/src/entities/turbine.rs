//! Wind turbine specification

use crate::core_types::curve::{PowerCoefficientCurve, PowerCurve};
use crate::core_types::units::{Meters, Watts};
use crate::error::{Result, WindPowerError};
use serde::{Deserialize, Serialize};

/// A wind turbine type
///
/// A turbine needs a power curve for the power curve output model and a power
/// coefficient curve plus rotor diameter for the cp output model. Which one is
/// required is only known once a model chain is configured, so both are
/// optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindTurbine {
    /// Turbine type name
    pub name: String,
    /// Hub height above ground
    pub hub_height: Meters,
    /// Rotor diameter
    pub rotor_diameter: Option<Meters>,
    /// Nominal (rated) power
    pub nominal_power: Watts,
    /// Power curve
    pub power_curve: Option<PowerCurve>,
    /// Power coefficient curve
    pub power_coefficient_curve: Option<PowerCoefficientCurve>,
}

impl WindTurbine {
    /// Create a turbine without curves.
    pub fn new(name: impl Into<String>, hub_height: Meters, nominal_power: Watts) -> Self {
        Self {
            name: name.into(),
            hub_height,
            rotor_diameter: None,
            nominal_power,
            power_curve: None,
            power_coefficient_curve: None,
        }
    }

    /// Create a turbine from its power curve; nominal power is the curve maximum.
    pub fn from_power_curve(name: impl Into<String>, hub_height: Meters, power_curve: PowerCurve) -> Self {
        let nominal_power = Watts::new(power_curve.max_power());
        Self::new(name, hub_height, nominal_power).with_power_curve(power_curve)
    }

    /// Set the rotor diameter
    pub fn with_rotor_diameter(mut self, rotor_diameter: Meters) -> Self {
        self.rotor_diameter = Some(rotor_diameter);
        self
    }

    /// Set the power curve
    pub fn with_power_curve(mut self, power_curve: PowerCurve) -> Self {
        self.power_curve = Some(power_curve);
        self
    }

    /// Set the power coefficient curve
    pub fn with_power_coefficient_curve(mut self, curve: PowerCoefficientCurve) -> Self {
        self.power_coefficient_curve = Some(curve);
        self
    }

    /// The power curve, or [`WindPowerError::MissingData`]
    pub fn require_power_curve(&self) -> Result<&PowerCurve> {
        self.power_curve
            .as_ref()
            .ok_or_else(|| WindPowerError::MissingData(format!("power curve of {} is missing", self.name)))
    }

    /// The power coefficient curve, or [`WindPowerError::MissingData`]
    pub fn require_power_coefficient_curve(&self) -> Result<&PowerCoefficientCurve> {
        self.power_coefficient_curve
            .as_ref()
            .ok_or_else(|| WindPowerError::MissingData(format!("power coefficient curve of {} is missing", self.name)))
    }

    /// The rotor diameter, or [`WindPowerError::MissingData`]
    pub fn require_rotor_diameter(&self) -> Result<Meters> {
        self.rotor_diameter
            .ok_or_else(|| WindPowerError::MissingData(format!("rotor diameter of {} is missing", self.name)))
    }
}
