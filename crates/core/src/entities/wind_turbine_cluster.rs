//! Wind turbine cluster: wind farms aggregated one level up

use super::weighted_log_mean;
use crate::core_types::units::{Meters, Watts};
use crate::entities::wind_farm::WindFarm;
use crate::error::{Result, WindPowerError};
use serde::{Deserialize, Serialize};

/// A group of wind farms, e.g. all farms of one weather grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WindTurbineClusterRaw")]
pub struct WindTurbineCluster {
    /// Cluster name
    pub name: String,
    /// Member farms, in insertion order
    pub wind_farms: Vec<WindFarm>,
}

impl WindTurbineCluster {
    /// Create a cluster; an empty farm list fails with [`WindPowerError::InvalidInput`].
    pub fn new(name: impl Into<String>, wind_farms: Vec<WindFarm>) -> Result<Self> {
        let name = name.into();
        if wind_farms.is_empty() {
            return Err(WindPowerError::InvalidInput(format!("turbine cluster {name} has no wind farms")));
        }
        Ok(Self { name, wind_farms })
    }

    /// Sum of the farms' installed power
    pub fn installed_power(&self) -> Watts {
        self.wind_farms.iter().map(WindFarm::installed_power).sum()
    }

    /// Logarithmic mean of the farms' mean hub heights, weighted by installed power
    pub fn mean_hub_height(&self) -> Result<Meters> {
        let farms = self
            .wind_farms
            .iter()
            .map(|farm| Ok((farm.mean_hub_height()?, farm.installed_power())))
            .collect::<Result<Vec<_>>>()?;
        weighted_log_mean(&self.name, farms)
    }
}

#[derive(Deserialize)]
struct WindTurbineClusterRaw {
    name: String,
    wind_farms: Vec<WindFarm>,
}

impl TryFrom<WindTurbineClusterRaw> for WindTurbineCluster {
    type Error = WindPowerError;

    fn try_from(raw: WindTurbineClusterRaw) -> Result<Self> {
        Self::new(raw.name, raw.wind_farms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::turbine::WindTurbine;
    use approx::assert_relative_eq;

    fn farm(name: &str, hub_height: f64, nominal_power: f64, count: u32) -> WindFarm {
        let turbine = WindTurbine::new("T", Meters::new(hub_height), Watts::new(nominal_power));
        WindFarm::new(name, [(turbine, count)]).unwrap()
    }

    #[test]
    fn test_cluster_aggregates() {
        let cluster = WindTurbineCluster::new(
            "cluster",
            vec![farm("a", 100.0, 2.0e6, 2), farm("b", 150.0, 4.0e6, 1)],
        )
        .unwrap();
        assert_eq!(cluster.installed_power(), Watts::new(8.0e6));
        assert_relative_eq!(*cluster.mean_hub_height().unwrap(), (100.0_f64 * 150.0).sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn test_empty_cluster() {
        assert!(WindTurbineCluster::new("empty", Vec::new()).is_err());
        assert!(serde_json::from_str::<WindTurbineCluster>(r#"{"name":"empty","wind_farms":[]}"#).is_err());
    }
}
