//! Wind farm: a fleet of turbine types with counts

use super::weighted_log_mean;
use crate::core_types::curve::EfficiencyCurve;
use crate::core_types::units::{Meters, Watts};
use crate::entities::turbine::WindTurbine;
use crate::error::{Result, WindPowerError};
use serde::{Deserialize, Serialize};

/// Wind farm efficiency used for power-based wake losses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "FarmEfficiencyRaw")]
pub enum FarmEfficiency {
    /// Same efficiency at every wind speed
    Constant(f64),
    /// Efficiency as a function of wind speed
    Curve(EfficiencyCurve),
}

impl FarmEfficiency {
    /// Constant efficiency; warns if outside [0, 1].
    pub fn constant(efficiency: f64) -> Result<Self> {
        if !efficiency.is_finite() || efficiency < 0.0 {
            return Err(WindPowerError::InvalidInput(format!(
                "wind farm efficiency must be finite and >= 0, got {efficiency}"
            )));
        }
        if efficiency > 1.0 {
            tracing::warn!("wind farm efficiency {efficiency} exceeds 1.0");
        }
        Ok(Self::Constant(efficiency))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum FarmEfficiencyRaw {
    Constant(f64),
    Curve(EfficiencyCurve),
}

impl TryFrom<FarmEfficiencyRaw> for FarmEfficiency {
    type Error = WindPowerError;

    fn try_from(raw: FarmEfficiencyRaw) -> Result<Self> {
        match raw {
            FarmEfficiencyRaw::Constant(efficiency) => Self::constant(efficiency),
            FarmEfficiencyRaw::Curve(curve) => Ok(Self::Curve(curve)),
        }
    }
}

/// One turbine type of a fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FleetEntryRaw")]
pub struct FleetEntry {
    /// Turbine type
    pub turbine: WindTurbine,
    /// Number of turbines of this type (>= 1)
    pub number_of_turbines: u32,
}

impl FleetEntry {
    /// Create a fleet entry; zero turbines fail with [`WindPowerError::InvalidInput`].
    pub fn new(turbine: WindTurbine, number_of_turbines: u32) -> Result<Self> {
        if number_of_turbines == 0 {
            return Err(WindPowerError::InvalidInput(format!(
                "number of turbines of type {} must be at least 1",
                turbine.name
            )));
        }
        Ok(Self {
            turbine,
            number_of_turbines,
        })
    }

    /// Nominal power of the turbine type times its count
    pub fn installed_power(&self) -> Watts {
        self.turbine.nominal_power * f64::from(self.number_of_turbines)
    }
}

#[derive(Deserialize)]
struct FleetEntryRaw {
    turbine: WindTurbine,
    number_of_turbines: u32,
}

impl TryFrom<FleetEntryRaw> for FleetEntry {
    type Error = WindPowerError;

    fn try_from(raw: FleetEntryRaw) -> Result<Self> {
        Self::new(raw.turbine, raw.number_of_turbines)
    }
}

/// A wind farm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WindFarmRaw")]
pub struct WindFarm {
    /// Farm name, used in logs and error messages
    pub name: String,
    fleet: Vec<FleetEntry>,
    /// Efficiency for power-based wake losses
    pub efficiency: Option<FarmEfficiency>,
}

impl WindFarm {
    /// Create a farm from `(turbine, count)` pairs.
    ///
    /// # Errors
    /// [`WindPowerError::InvalidInput`] for an empty fleet or a zero count.
    pub fn new<I>(name: impl Into<String>, fleet: I) -> Result<Self>
    where
        I: IntoIterator<Item = (WindTurbine, u32)>,
    {
        let name = name.into();
        let fleet = fleet
            .into_iter()
            .map(|(turbine, n)| FleetEntry::new(turbine, n))
            .collect::<Result<Vec<_>>>()?;
        if fleet.is_empty() {
            return Err(WindPowerError::InvalidInput(format!("wind farm {name} has no turbines")));
        }
        Ok(Self {
            name,
            fleet,
            efficiency: None,
        })
    }

    /// Set the farm efficiency
    pub fn with_efficiency(mut self, efficiency: FarmEfficiency) -> Self {
        self.efficiency = Some(efficiency);
        self
    }

    /// Turbine types and counts, in insertion order
    pub fn fleet(&self) -> &[FleetEntry] {
        &self.fleet
    }

    /// Add turbines of a type to the fleet.
    ///
    /// Aggregates are recomputed on the next call, so nothing is invalidated here.
    pub fn add_turbines(&mut self, turbine: WindTurbine, number_of_turbines: u32) -> Result<()> {
        self.fleet.push(FleetEntry::new(turbine, number_of_turbines)?);
        Ok(())
    }

    /// Sum of nominal power times count over the fleet
    pub fn installed_power(&self) -> Watts {
        self.fleet.iter().map(FleetEntry::installed_power).sum()
    }

    /// Power-weighted logarithmic mean hub height of the fleet
    ///
    /// # Errors
    /// [`WindPowerError::InvalidInput`] if the installed power is zero.
    pub fn mean_hub_height(&self) -> Result<Meters> {
        weighted_log_mean(
            &self.name,
            self.fleet
                .iter()
                .map(|entry| (entry.turbine.hub_height, entry.installed_power())),
        )
    }

    /// The efficiency, or [`WindPowerError::MissingData`]
    pub fn require_efficiency(&self) -> Result<&FarmEfficiency> {
        self.efficiency
            .as_ref()
            .ok_or_else(|| WindPowerError::MissingData(format!("wind farm efficiency of {} is missing", self.name)))
    }
}

#[derive(Deserialize)]
struct WindFarmRaw {
    name: String,
    fleet: Vec<FleetEntry>,
    #[serde(default)]
    efficiency: Option<FarmEfficiency>,
}

impl TryFrom<WindFarmRaw> for WindFarm {
    type Error = WindPowerError;

    fn try_from(raw: WindFarmRaw) -> Result<Self> {
        let farm = Self::new(
            raw.name,
            raw.fleet.into_iter().map(|entry| (entry.turbine, entry.number_of_turbines)),
        )?;
        Ok(match raw.efficiency {
            Some(efficiency) => farm.with_efficiency(efficiency),
            None => farm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn turbine(name: &str, hub_height: f64, nominal_power: f64) -> WindTurbine {
        WindTurbine::new(name, Meters::new(hub_height), Watts::new(nominal_power))
    }

    #[test]
    fn test_installed_power() {
        let farm = WindFarm::new("farm", [(turbine("A", 100.0, 3000.0), 3), (turbine("B", 135.0, 7500.0), 1)]).unwrap();
        assert_eq!(farm.installed_power(), Watts::new(16_500.0));
    }

    #[test]
    fn test_single_type_mean_hub_height_is_exact() {
        for count in [1, 2, 7, 50] {
            let farm = WindFarm::new("farm", [(turbine("A", 98.0, 3.0e6), count)]).unwrap();
            assert_eq!(farm.mean_hub_height().unwrap(), Meters::new(98.0));
        }
    }

    #[test]
    fn test_mean_hub_height_recomputed_after_adding_turbines() {
        let mut farm = WindFarm::new("farm", [(turbine("A", 100.0, 2.0e6), 1)]).unwrap();
        let before = farm.mean_hub_height().unwrap();
        farm.add_turbines(turbine("B", 150.0, 2.0e6), 1).unwrap();
        let after = farm.mean_hub_height().unwrap();
        assert_eq!(before, Meters::new(100.0));
        assert_relative_eq!(*after, (100.0_f64 * 150.0).sqrt(), epsilon = 1e-9);
        assert_eq!(farm.installed_power(), Watts::new(4.0e6));
    }

    #[test]
    fn test_invalid_fleets() {
        assert!(WindFarm::new("empty", Vec::new()).is_err());
        assert!(WindFarm::new("zero", [(turbine("A", 100.0, 2.0e6), 0)]).is_err());
        let farm = WindFarm::new("no power", [(turbine("A", 100.0, 0.0), 2)]).unwrap();
        assert!(matches!(farm.mean_hub_height(), Err(WindPowerError::InvalidInput(_))));
        assert!(matches!(farm.require_efficiency(), Err(WindPowerError::MissingData(_))));
    }

    #[test]
    fn test_deserialize_validates_fleet() {
        let farm = WindFarm::new("farm", [(turbine("A", 100.0, 3000.0), 2)])
            .unwrap()
            .with_efficiency(FarmEfficiency::Constant(0.9));
        let json = serde_json::to_string(&farm).unwrap();
        assert_eq!(serde_json::from_str::<WindFarm>(&json).unwrap(), farm);

        let zero_count = json.replace("\"number_of_turbines\":2", "\"number_of_turbines\":0");
        assert!(serde_json::from_str::<WindFarm>(&zero_count).is_err());
        let no_turbines = r#"{"name":"farm","fleet":[],"efficiency":null}"#;
        assert!(serde_json::from_str::<WindFarm>(no_turbines).is_err());
        let negative_efficiency = json.replace("\"constant\":0.9", "\"constant\":-0.5");
        assert!(serde_json::from_str::<WindFarm>(&negative_efficiency).is_err());
    }
}
