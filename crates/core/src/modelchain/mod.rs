//! Model chains
//!
//! A [`ModelChain`] turns a weather table into the power output of a single
//! turbine type:
//!
//! ```text
//! configured → speed_resolved → density_resolved (optional) → output_computed
//! ```
//!
//! [`TurbineClusterModelChain`] inserts a power curve aggregation stage for
//! wind farms and turbine clusters and then reuses the single turbine stages.
//!
//! A run borrows its entities and returns a fresh output record. Any failure
//! aborts the run; no partial output is returned.

mod turbine_cluster;

pub use turbine_cluster::{AggregatedPowerCurve, PowerPlant, TurbineClusterModelChain, TurbineClusterOutput};

use crate::config::{DensityModel, ModelChainConfig, PowerOutputModel, TemperatureModel, WindSpeedModel};
use crate::core_types::units::Meters;
use crate::core_types::weather::{HeightSeries, WeatherData, WeatherVariable};
use crate::entities::WindTurbine;
use crate::error::{Result, WindPowerError};
use crate::physics::density::{density_series, rho_barometric, rho_ideal_gas};
use crate::physics::temperature::temperature_gradient_series;
use crate::physics::tools::{linear_extra_interpolation, select_closest};
use crate::physics::wind_speed::{hellman_series, logarithmic_profile_series};
use crate::power_output;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Pipeline stage, reported in debug logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainStage {
    /// Options validated, nothing computed yet
    Configured,
    /// Wind speed known at hub height
    SpeedResolved,
    /// Temperature and density known at hub height
    DensityResolved,
    /// Aggregated power curve assigned (cluster chain only)
    PowerCurveAssigned,
    /// Power output computed
    OutputComputed,
}

impl fmt::Display for ChainStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Configured => "configured",
            Self::SpeedResolved => "speed_resolved",
            Self::DensityResolved => "density_resolved",
            Self::PowerCurveAssigned => "power_curve_assigned",
            Self::OutputComputed => "output_computed",
        })
    }
}

/// Result of a [`ModelChain`] run, aligned with the weather time index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelChainOutput {
    /// Time index of the weather table
    pub index: Vec<NaiveDateTime>,
    /// Wind speed at hub height (m/s)
    pub wind_speed_hub: Vec<f64>,
    /// Temperature at hub height (K), if the density was derived from it
    pub temperature_hub: Option<Vec<f64>>,
    /// Density at hub height (kg/m³), if the output model needed it
    pub density_hub: Option<Vec<f64>>,
    /// Power output (W)
    pub power_output: Vec<f64>,
}

impl ModelChainOutput {
    /// Number of time steps
    pub fn len(&self) -> usize {
        self.power_output.len()
    }

    /// True if the run covered no time steps
    pub fn is_empty(&self) -> bool {
        self.power_output.is_empty()
    }
}

/// Series measured exactly at `height`, if any
fn at_height(candidates: &[HeightSeries], height: Meters) -> Option<&HeightSeries> {
    candidates.iter().find(|s| s.height == height)
}

/// Wind speed at `hub_height` using the configured wind speed model.
pub(crate) fn resolve_wind_speed(weather: &WeatherData, hub_height: Meters, config: &ModelChainConfig) -> Result<Vec<f64>> {
    let candidates = weather.require(WeatherVariable::WindSpeed)?;
    if let Some(series) = at_height(candidates, hub_height) {
        debug!("Using given wind speed at hub height");
        return Ok(series.values.clone());
    }
    match config.wind_speed_model {
        WindSpeedModel::Logarithmic => {
            debug!("Calculating wind speed using logarithmic wind profile");
            let closest = select_closest(candidates, hub_height)?;
            let roughness = weather.require(WeatherVariable::RoughnessLength)?;
            logarithmic_profile_series(
                &closest.values,
                closest.height,
                hub_height,
                &roughness[0].values,
                config.obstacle_height,
            )
        }
        WindSpeedModel::Hellman => {
            debug!("Calculating wind speed using Hellman equation");
            let closest = select_closest(candidates, hub_height)?;
            let roughness = weather
                .candidates(WeatherVariable::RoughnessLength)
                .first()
                .map(|s| s.values.as_slice());
            Ok(hellman_series(
                &closest.values,
                closest.height,
                hub_height,
                config.hellman_exponent,
                roughness,
            ))
        }
        WindSpeedModel::InterpolationExtrapolation => {
            debug!("Calculating wind speed using linear inter-/extrapolation");
            linear_extra_interpolation(candidates, hub_height)
        }
    }
}

/// Temperature at `hub_height` using the configured temperature model.
pub(crate) fn resolve_temperature(
    weather: &WeatherData,
    hub_height: Meters,
    config: &ModelChainConfig,
) -> Result<Vec<f64>> {
    let candidates = weather.require(WeatherVariable::Temperature)?;
    if let Some(series) = at_height(candidates, hub_height) {
        debug!("Using given temperature at hub height");
        return Ok(series.values.clone());
    }
    match config.temperature_model {
        TemperatureModel::LinearGradient => {
            debug!("Calculating temperature using temperature gradient");
            let closest = select_closest(candidates, hub_height)?;
            Ok(temperature_gradient_series(&closest.values, closest.height, hub_height))
        }
        TemperatureModel::InterpolationExtrapolation => {
            debug!("Calculating temperature using linear inter-/extrapolation");
            linear_extra_interpolation(candidates, hub_height)
        }
    }
}

/// Density at `hub_height` and the temperature it was derived from, if any.
pub(crate) fn resolve_density(
    weather: &WeatherData,
    hub_height: Meters,
    config: &ModelChainConfig,
) -> Result<(Vec<f64>, Option<Vec<f64>>)> {
    let equation = match config.density_model {
        DensityModel::InterpolationExtrapolation => {
            let candidates = weather.require(WeatherVariable::Density)?;
            if let Some(series) = at_height(candidates, hub_height) {
                debug!("Using given density at hub height");
                return Ok((series.values.clone(), None));
            }
            debug!("Calculating density using linear inter-/extrapolation");
            return Ok((linear_extra_interpolation(candidates, hub_height)?, None));
        }
        DensityModel::Barometric => {
            debug!("Calculating density using barometric height equation");
            rho_barometric
        }
        DensityModel::IdealGas => {
            debug!("Calculating density using ideal gas equation");
            rho_ideal_gas
        }
    };
    let temperature = resolve_temperature(weather, hub_height, config)?;
    let pressure = select_closest(weather.require(WeatherVariable::Pressure)?, hub_height)?;
    let density = density_series(equation, &pressure.values, pressure.height, hub_height, &temperature);
    Ok((density, Some(temperature)))
}

/// Single turbine model chain
#[derive(Debug, Clone)]
pub struct ModelChain<'a> {
    turbine: &'a WindTurbine,
    config: ModelChainConfig,
}

impl<'a> ModelChain<'a> {
    /// Create a model chain for `turbine`.
    pub fn new(turbine: &'a WindTurbine, config: ModelChainConfig) -> Self {
        debug!(turbine = %turbine.name, stage = %ChainStage::Configured, "Model chain created");
        Self { turbine, config }
    }

    /// The evaluated turbine
    pub fn turbine(&self) -> &WindTurbine {
        self.turbine
    }

    /// The chain's options
    pub fn config(&self) -> &ModelChainConfig {
        &self.config
    }

    /// True if the configured output model needs the density at hub height
    pub fn needs_density(&self) -> bool {
        self.config.power_output_model == PowerOutputModel::PowerCoefficientCurve || self.config.density_correction
    }

    /// Wind speed at hub height (m/s).
    ///
    /// A measurement already at hub height is used as is; otherwise the
    /// closest measurement is moved to hub height with the configured model.
    pub fn wind_speed_hub(&self, weather: &WeatherData) -> Result<Vec<f64>> {
        resolve_wind_speed(weather, self.turbine.hub_height, &self.config)
    }

    /// Temperature at hub height (K).
    pub fn temperature_hub(&self, weather: &WeatherData) -> Result<Vec<f64>> {
        resolve_temperature(weather, self.turbine.hub_height, &self.config)
    }

    /// Density at hub height (kg/m³).
    ///
    /// The barometric and ideal gas models first resolve the temperature at
    /// hub height; interpolation uses measured densities directly.
    pub fn density_hub(&self, weather: &WeatherData) -> Result<Vec<f64>> {
        resolve_density(weather, self.turbine.hub_height, &self.config).map(|(density, _)| density)
    }

    /// Power output (W) for a hub height wind speed series.
    ///
    /// # Errors
    /// [`WindPowerError::MissingData`] if the curve for the configured output
    /// model is absent, or the density is absent where it is needed.
    pub fn calculate_power_output(&self, wind_speed: &[f64], density: Option<&[f64]>) -> Result<Vec<f64>> {
        let require_density = || {
            density.ok_or_else(|| {
                WindPowerError::MissingData(format!(
                    "density at hub height is needed for {} with density correction {}",
                    self.config.power_output_model, self.config.density_correction
                ))
            })
        };
        match (self.config.power_output_model, self.config.density_correction) {
            (PowerOutputModel::PowerCurve, false) => {
                debug!("Calculating power output using power curve");
                Ok(power_output::power_curve(wind_speed, self.turbine.require_power_curve()?))
            }
            (PowerOutputModel::PowerCurve, true) => {
                debug!("Calculating power output using density corrected power curve");
                power_output::power_curve_density_corrected(
                    wind_speed,
                    require_density()?,
                    self.turbine.require_power_curve()?,
                )
            }
            (PowerOutputModel::PowerCoefficientCurve, correction) => {
                let cp_curve = self.turbine.require_power_coefficient_curve()?;
                let rotor_diameter = self.turbine.require_rotor_diameter()?;
                if correction {
                    debug!("Calculating power output using density corrected power coefficient curve");
                    power_output::power_coefficient_curve_density_corrected(
                        wind_speed,
                        require_density()?,
                        rotor_diameter,
                        cp_curve,
                    )
                } else {
                    debug!("Calculating power output using power coefficient curve");
                    power_output::power_coefficient_curve(wind_speed, require_density()?, rotor_diameter, cp_curve)
                }
            }
        }
    }

    /// Fail early if the turbine lacks what the output model needs.
    fn check_turbine(&self) -> Result<()> {
        match self.config.power_output_model {
            PowerOutputModel::PowerCurve => self.turbine.require_power_curve().map(|_| ()),
            PowerOutputModel::PowerCoefficientCurve => {
                self.turbine.require_power_coefficient_curve()?;
                self.turbine.require_rotor_diameter().map(|_| ())
            }
        }
    }

    /// Run the whole chain on `weather`.
    pub fn run_model(&self, weather: &WeatherData) -> Result<ModelChainOutput> {
        info!(
            turbine = %self.turbine.name,
            hub_height = %self.turbine.hub_height,
            steps = weather.len(),
            "Running model chain"
        );
        self.check_turbine()?;

        let wind_speed_hub = self.wind_speed_hub(weather)?;
        debug!(stage = %ChainStage::SpeedResolved);

        let (density_hub, temperature_hub) = if self.needs_density() {
            let (density, temperature) = resolve_density(weather, self.turbine.hub_height, &self.config)?;
            debug!(stage = %ChainStage::DensityResolved);
            (Some(density), temperature)
        } else {
            (None, None)
        };

        let power_output = self.calculate_power_output(&wind_speed_hub, density_hub.as_deref())?;
        debug!(stage = %ChainStage::OutputComputed);

        Ok(ModelChainOutput {
            index: weather.index().to_vec(),
            wind_speed_hub,
            temperature_hub,
            density_hub,
            power_output,
        })
    }
}
