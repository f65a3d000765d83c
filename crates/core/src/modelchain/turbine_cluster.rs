//! Model chain for wind farms and turbine clusters
//!
//! The plant is treated as one large turbine at its mean hub height whose
//! power curve is the aggregate of all turbine curves. Aggregation runs in
//! this order:
//!
//! 1. turbine curves, smoothed if `smoothing_order` is `turbine_power_curves`
//! 2. farm curve = Σ curve × count, smoothed if `wind_farm_power_curves`
//! 3. power-based wake losses of the farm
//! 4. cluster curve = Σ farm curves, smoothed if `cluster_power_curve`
//!
//! Wind speed based wake losses are applied later, to the hub height wind
//! speed. Only the power curve output model applies to an aggregated plant.
//!
//! # Scientific References
//! - Knorr, K. (2016). "Modellierung von raum-zeitlichen Eigenschaften der
//!   Windenergieeinspeisung für wetterdatenbasierte Windleistungssimulationen",
//!   Universität Kassel

use super::{resolve_density, ChainStage, ModelChain, ModelChainOutput};
use crate::config::{
    PowerOutputModel, SmoothingOrder, StandardDeviationMethod, TurbineClusterConfig, WakeLossesModel,
    WindEfficiencyCurveName,
};
use crate::core_types::curve::{EfficiencyCurve, PowerCurve};
use crate::core_types::units::{Meters, Watts};
use crate::core_types::weather::{WeatherData, WeatherVariable};
use crate::entities::{WindFarm, WindTurbine, WindTurbineCluster};
use crate::error::{Result, WindPowerError};
use crate::physics::tools::{estimate_turbulence_intensity, select_closest};
use crate::power_curves::{smooth_power_curve, sum_power_curves, wake_losses_to_power_curve, SmoothingParams};
use crate::wake_losses::{get_wind_efficiency_curve, reduce_wind_speed_by, WindEfficiencyCurves};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A plant evaluated by [`TurbineClusterModelChain`]
#[derive(Debug, Clone, Copy)]
pub enum PowerPlant<'a> {
    /// A single wind farm
    Farm(&'a WindFarm),
    /// A cluster of wind farms
    Cluster(&'a WindTurbineCluster),
}

impl<'a> PowerPlant<'a> {
    /// Plant name
    pub fn name(&self) -> &'a str {
        match *self {
            Self::Farm(farm) => &farm.name,
            Self::Cluster(cluster) => &cluster.name,
        }
    }

    /// Farms of the plant; a single farm for [`PowerPlant::Farm`]
    pub fn farms(&self) -> &'a [WindFarm] {
        match *self {
            Self::Farm(farm) => std::slice::from_ref(farm),
            Self::Cluster(cluster) => &cluster.wind_farms,
        }
    }

    /// Installed power of the plant
    pub fn installed_power(&self) -> Watts {
        match self {
            Self::Farm(farm) => farm.installed_power(),
            Self::Cluster(cluster) => cluster.installed_power(),
        }
    }

    /// Power-weighted logarithmic mean hub height of the plant
    pub fn mean_hub_height(&self) -> Result<Meters> {
        match self {
            Self::Farm(farm) => farm.mean_hub_height(),
            Self::Cluster(cluster) => cluster.mean_hub_height(),
        }
    }
}

impl<'a> From<&'a WindFarm> for PowerPlant<'a> {
    fn from(farm: &'a WindFarm) -> Self {
        Self::Farm(farm)
    }
}

impl<'a> From<&'a WindTurbineCluster> for PowerPlant<'a> {
    fn from(cluster: &'a WindTurbineCluster) -> Self {
        Self::Cluster(cluster)
    }
}

/// Aggregated power curve of a plant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPowerCurve {
    /// Mean hub height the curve applies at
    pub mean_hub_height: Meters,
    /// Installed power of the plant
    pub installed_power: Watts,
    /// Plant power curve
    pub power_curve: PowerCurve,
    /// Power curve of each farm by farm name, before cluster summation
    pub farm_power_curves: Vec<(String, PowerCurve)>,
}

impl AggregatedPowerCurve {
    /// The plant as a single turbine carrying the aggregated curve
    pub fn as_turbine(&self, name: &str) -> WindTurbine {
        WindTurbine::new(name, self.mean_hub_height, self.installed_power).with_power_curve(self.power_curve.clone())
    }
}

/// Result of a [`TurbineClusterModelChain`] run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbineClusterOutput {
    /// Curve used for the power output
    pub power_curve: AggregatedPowerCurve,
    /// Series of the run; `wind_speed_hub` already includes wind speed based
    /// wake losses
    pub chain: ModelChainOutput,
}

/// Model chain for a [`WindFarm`] or [`WindTurbineCluster`]
#[derive(Debug, Clone)]
pub struct TurbineClusterModelChain<'a> {
    plant: PowerPlant<'a>,
    config: TurbineClusterConfig,
    wind_efficiency_curves: Option<WindEfficiencyCurves>,
}

impl<'a> TurbineClusterModelChain<'a> {
    /// Create a model chain for a plant.
    ///
    /// # Errors
    /// [`WindPowerError::Configuration`] if smoothing at cluster level is
    /// requested for a single wind farm, or if the power output model is not
    /// `power_curve`.
    pub fn new(plant: impl Into<PowerPlant<'a>>, config: TurbineClusterConfig) -> Result<Self> {
        let plant = plant.into();
        if config.smoothing
            && config.smoothing_order == SmoothingOrder::ClusterPowerCurve
            && matches!(plant, PowerPlant::Farm(_))
        {
            return Err(WindPowerError::configuration(
                "smoothing_order",
                SmoothingOrder::ClusterPowerCurve.to_string(),
                &["turbine_power_curves", "wind_farm_power_curves"],
            ));
        }
        if config.chain.power_output_model != PowerOutputModel::PowerCurve {
            return Err(WindPowerError::configuration(
                "power_output_model",
                config.chain.power_output_model.to_string(),
                &["power_curve"],
            ));
        }
        debug!(plant = plant.name(), stage = %ChainStage::Configured, "Turbine cluster model chain created");
        Ok(Self {
            plant,
            config,
            wind_efficiency_curves: None,
        })
    }

    /// Use `curves` for wind speed based wake losses instead of the bundled
    /// catalogue.
    pub fn with_wind_efficiency_curves(mut self, curves: WindEfficiencyCurves) -> Self {
        self.wind_efficiency_curves = Some(curves);
        self
    }

    fn wind_efficiency_curve(&self, name: WindEfficiencyCurveName) -> Result<EfficiencyCurve> {
        match &self.wind_efficiency_curves {
            Some(curves) => curves.get(name).cloned(),
            None => get_wind_efficiency_curve(name),
        }
    }

    /// The evaluated plant
    pub fn plant(&self) -> PowerPlant<'a> {
        self.plant
    }

    /// The chain's options
    pub fn config(&self) -> &TurbineClusterConfig {
        &self.config
    }

    /// Smoothing parameters at `hub_height`.
    ///
    /// The turbulence intensity is the mean of the measured series closest to
    /// `hub_height`, else estimated from the mean roughness length. If neither
    /// is available and the method needs it, smoothing fails with a
    /// configuration error.
    fn smoothing_params(&self, weather: &WeatherData, hub_height: Meters) -> SmoothingParams {
        let turbulence_intensity = match self.config.standard_deviation_method {
            StandardDeviationMethod::StaffellPfenninger => None,
            StandardDeviationMethod::TurbulenceIntensity => {
                match select_closest(weather.candidates(WeatherVariable::TurbulenceIntensity), hub_height) {
                    Ok(measured) => Some(measured.mean()),
                    Err(_) => weather
                        .mean(WeatherVariable::RoughnessLength)
                        .map(|z0| estimate_turbulence_intensity(hub_height, z0)),
                }
            }
        };
        SmoothingParams {
            block_width: self.config.block_width,
            wind_speed_range: self.config.wind_speed_range,
            standard_deviation_method: self.config.standard_deviation_method,
            turbulence_intensity,
            ..SmoothingParams::default()
        }
    }

    fn smooth_at(&self, order: SmoothingOrder) -> bool {
        self.config.smoothing && self.config.smoothing_order == order
    }

    /// Power curve of one farm, including power-based wake losses.
    fn farm_power_curve(&self, farm: &WindFarm, weather: &WeatherData) -> Result<PowerCurve> {
        let turbine_curves = farm
            .fleet()
            .iter()
            .map(|entry| {
                let curve = entry.turbine.require_power_curve()?;
                let curve = if self.smooth_at(SmoothingOrder::TurbinePowerCurves) {
                    smooth_power_curve(curve, &self.smoothing_params(weather, entry.turbine.hub_height))?
                } else {
                    curve.clone()
                };
                Ok(curve.scaled(f64::from(entry.number_of_turbines)))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut curve = sum_power_curves(&turbine_curves)?;
        if self.smooth_at(SmoothingOrder::WindFarmPowerCurves) {
            curve = smooth_power_curve(&curve, &self.smoothing_params(weather, farm.mean_hub_height()?))?;
        }

        match self.config.wake_losses_model {
            model @ (WakeLossesModel::PowerEfficiencyCurve | WakeLossesModel::ConstantEfficiency) => {
                wake_losses_to_power_curve(&curve, model, farm.require_efficiency()?)
            }
            WakeLossesModel::WindEfficiencyCurve(_) | WakeLossesModel::None => Ok(curve),
        }
    }

    /// Aggregate the plant's power curve.
    ///
    /// Farm curves are computed in parallel; `weather` is only read for the
    /// turbulence intensity or roughness length used by smoothing.
    pub fn assign_power_curve(&self, weather: &WeatherData) -> Result<AggregatedPowerCurve> {
        let farms = self.plant.farms();
        let farm_power_curves = farms
            .par_iter()
            .map(|farm| Ok((farm.name.clone(), self.farm_power_curve(farm, weather)?)))
            .collect::<Result<Vec<_>>>()?;

        let mean_hub_height = self.plant.mean_hub_height()?;
        let mut power_curve = sum_power_curves(farm_power_curves.iter().map(|(_, curve)| curve))?;
        if matches!(self.plant, PowerPlant::Cluster(_)) && self.smooth_at(SmoothingOrder::ClusterPowerCurve) {
            power_curve = smooth_power_curve(&power_curve, &self.smoothing_params(weather, mean_hub_height))?;
        }

        debug!(
            farms = farms.len(),
            points = power_curve.len(),
            stage = %ChainStage::PowerCurveAssigned
        );
        Ok(AggregatedPowerCurve {
            mean_hub_height,
            installed_power: self.plant.installed_power(),
            power_curve,
            farm_power_curves,
        })
    }

    /// Run the whole chain on `weather`.
    pub fn run_model(&self, weather: &WeatherData) -> Result<TurbineClusterOutput> {
        info!(
            plant = self.plant.name(),
            wake_losses = %self.config.wake_losses_model,
            smoothing = self.config.smoothing,
            steps = weather.len(),
            "Running turbine cluster model chain"
        );
        let wind_efficiency_curve = match self.config.wake_losses_model {
            WakeLossesModel::WindEfficiencyCurve(name) => Some((name, self.wind_efficiency_curve(name)?)),
            _ => None,
        };

        let power_curve = self.assign_power_curve(weather)?;
        let turbine = power_curve.as_turbine(self.plant.name());
        let chain = ModelChain::new(&turbine, self.config.chain.clone());

        let mut wind_speed_hub = chain.wind_speed_hub(weather)?;
        if let Some((name, curve)) = &wind_efficiency_curve {
            debug!(curve = %name, "Reducing wind speed by wind efficiency curve");
            wind_speed_hub = reduce_wind_speed_by(&wind_speed_hub, curve);
        }
        debug!(stage = %ChainStage::SpeedResolved);

        let (density_hub, temperature_hub) = if chain.needs_density() {
            let (density, temperature) = resolve_density(weather, turbine.hub_height, chain.config())?;
            debug!(stage = %ChainStage::DensityResolved);
            (Some(density), temperature)
        } else {
            (None, None)
        };

        let power_output = chain.calculate_power_output(&wind_speed_hub, density_hub.as_deref())?;
        debug!(stage = %ChainStage::OutputComputed);

        Ok(TurbineClusterOutput {
            power_curve,
            chain: ModelChainOutput {
                index: weather.index().to_vec(),
                wind_speed_hub,
                temperature_hub,
                density_hub,
                power_output,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::FarmEfficiency;
    use crate::wake_losses::reduce_wind_speed;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn turbine(name: &str, hub_height: f64, rated: f64) -> WindTurbine {
        let curve = PowerCurve::from_pairs(&[(0.0, 0.0), (3.0, 0.0), (12.0, rated), (25.0, rated)]).unwrap();
        WindTurbine::from_power_curve(name, Meters::new(hub_height), curve)
    }

    fn farm() -> WindFarm {
        WindFarm::new("farm", [(turbine("a", 100.0, 3000.0), 2), (turbine("b", 100.0, 1000.0), 3)]).unwrap()
    }

    fn weather() -> WeatherData {
        let start = NaiveDate::from_ymd_opt(2010, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        WeatherData::hourly(start, 3)
            .with(WeatherVariable::WindSpeed, Meters::new(100.0), vec![2.0, 7.5, 30.0])
            .unwrap()
            .with(WeatherVariable::RoughnessLength, Meters::ZERO, vec![0.1, 0.1, 0.1])
            .unwrap()
    }

    fn config(wake_losses_model: &str) -> TurbineClusterConfig {
        TurbineClusterConfig::default()
            .with_option("wake_losses_model", wake_losses_model)
            .unwrap()
    }

    #[test]
    fn test_farm_power_curve_is_weighted_sum() {
        let farm = farm();
        let mc = TurbineClusterModelChain::new(&farm, config("none")).unwrap();
        let aggregated = mc.assign_power_curve(&weather()).unwrap();
        assert_eq!(aggregated.installed_power, Watts::new(9000.0));
        assert_eq!(aggregated.mean_hub_height, Meters::new(100.0));
        assert_relative_eq!(aggregated.power_curve.max_power(), 9000.0);
        assert_eq!(aggregated.farm_power_curves.len(), 1);
    }

    #[test]
    fn test_run_model_without_wake_losses() {
        let farm = farm();
        let mc = TurbineClusterModelChain::new(&farm, config("none")).unwrap();
        let output = mc.run_model(&weather()).unwrap();
        assert_eq!(output.chain.wind_speed_hub, vec![2.0, 7.5, 30.0]);
        assert_relative_eq!(output.chain.power_output[0], 0.0);
        assert_relative_eq!(output.chain.power_output[1], 4500.0, epsilon = 1e-9);
        assert_relative_eq!(output.chain.power_output[2], 9000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_constant_efficiency_needs_farm_efficiency() {
        let farm = farm();
        let mc = TurbineClusterModelChain::new(&farm, config("constant_efficiency")).unwrap();
        assert!(matches!(mc.run_model(&weather()), Err(WindPowerError::MissingData(_))));

        let farm = farm.with_efficiency(FarmEfficiency::Constant(0.8));
        let mc = TurbineClusterModelChain::new(&farm, config("constant_efficiency")).unwrap();
        let output = mc.run_model(&weather()).unwrap();
        assert_relative_eq!(output.chain.power_output[2], 9000.0 * 0.8, epsilon = 1e-9);
    }

    #[test]
    fn test_wind_efficiency_curve_reduces_wind_speed() {
        let farm = farm();
        let mc = TurbineClusterModelChain::new(&farm, TurbineClusterConfig::default()).unwrap();
        let output = mc.run_model(&weather()).unwrap();
        let expected = reduce_wind_speed(&[7.5], WindEfficiencyCurveName::DenaMean).unwrap()[0];
        assert_relative_eq!(output.chain.wind_speed_hub[1], expected, epsilon = 1e-12);
        assert!(output.chain.power_output[1] < 4500.0);
    }

    #[test]
    fn test_wind_efficiency_curve_from_supplied_set() {
        let farm = farm();
        let mc = TurbineClusterModelChain::new(&farm, config("knorr_mean")).unwrap();
        assert!(matches!(mc.run_model(&weather()), Err(WindPowerError::MissingData(_))));

        let mut curves = WindEfficiencyCurves::default();
        curves.insert(
            WindEfficiencyCurveName::KnorrMean,
            EfficiencyCurve::from_pairs(&[(0.0, 0.9), (25.0, 0.9)]).unwrap(),
        );
        let output = mc.with_wind_efficiency_curves(curves).run_model(&weather()).unwrap();
        assert_relative_eq!(output.chain.wind_speed_hub[1], 7.5 * 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_power_coefficient_output_model_rejected() {
        let farm = farm();
        let config = config("none")
            .with_option("power_output_model", "power_coefficient_curve")
            .unwrap();
        let err = TurbineClusterModelChain::new(&farm, config).unwrap_err();
        assert!(matches!(
            err,
            WindPowerError::Configuration {
                parameter: "power_output_model",
                ..
            }
        ));
    }

    #[test]
    fn test_cluster_smoothing_rejected_for_farm() {
        let farm = farm();
        let config = TurbineClusterConfig::default()
            .with_option("smoothing", "true")
            .unwrap()
            .with_option("smoothing_order", "cluster_power_curve")
            .unwrap();
        let err = TurbineClusterModelChain::new(&farm, config.clone()).unwrap_err();
        assert!(err.is_configuration());

        let cluster = WindTurbineCluster::new("cluster", vec![farm]).unwrap();
        assert!(TurbineClusterModelChain::new(&cluster, config).is_ok());
    }

    #[test]
    fn test_smoothing_without_turbulence_data() {
        let farm = farm();
        let config = config("none").with_option("smoothing", "true").unwrap();
        let mc = TurbineClusterModelChain::new(&farm, config).unwrap();
        let start = NaiveDate::from_ymd_opt(2010, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bare = WeatherData::hourly(start, 1)
            .with(WeatherVariable::WindSpeed, Meters::new(100.0), vec![8.0])
            .unwrap();
        assert!(mc.assign_power_curve(&bare).unwrap_err().is_configuration());
        assert!(mc.assign_power_curve(&weather()).is_ok());
    }
}
