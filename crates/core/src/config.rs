//! Model chain configuration
//!
//! Every model or method choice is a closed enum. String values coming from a
//! CLI or a config file are parsed once through [`FromStr`]; an unknown value
//! fails with [`WindPowerError::Configuration`] before any computation starts.

use crate::core_types::units::Meters;
use crate::error::{Result, WindPowerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A closed set of named options for one configuration parameter
pub trait Selector: Copy + Sized + 'static {
    /// Parameter name reported in configuration errors
    const PARAMETER: &'static str;
    /// Every accepted value
    const ALL: &'static [Self];

    /// Name of this option as written in configuration
    fn name(self) -> &'static str;

    /// Parse an option by name.
    fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|option| option.name() == value)
            .ok_or_else(|| {
                let expected: Vec<&str> = Self::ALL.iter().map(|o| o.name()).collect();
                WindPowerError::configuration(Self::PARAMETER, value, &expected)
            })
    }
}

macro_rules! selector_traits {
    ($($ty:ty),+ $(,)?) => {$(
        impl FromStr for $ty {
            type Err = WindPowerError;
            fn from_str(s: &str) -> Result<Self> {
                <$ty as Selector>::parse(s)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    )+};
}

/// Model for the wind speed at hub height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindSpeedModel {
    /// Logarithmic wind profile with roughness length and obstacle height
    #[default]
    Logarithmic,
    /// Hellman power law
    Hellman,
    /// Linear inter-/extrapolation between two measurement heights
    InterpolationExtrapolation,
}

impl Selector for WindSpeedModel {
    const PARAMETER: &'static str = "wind_speed_model";
    const ALL: &'static [Self] = &[Self::Logarithmic, Self::Hellman, Self::InterpolationExtrapolation];

    fn name(self) -> &'static str {
        match self {
            Self::Logarithmic => "logarithmic",
            Self::Hellman => "hellman",
            Self::InterpolationExtrapolation => "interpolation_extrapolation",
        }
    }
}

/// Model for the air temperature at hub height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureModel {
    /// Fixed gradient of -6.5 K/km from the closest measurement
    #[default]
    LinearGradient,
    /// Linear inter-/extrapolation between two measurement heights
    InterpolationExtrapolation,
}

impl Selector for TemperatureModel {
    const PARAMETER: &'static str = "temperature_model";
    const ALL: &'static [Self] = &[Self::LinearGradient, Self::InterpolationExtrapolation];

    fn name(self) -> &'static str {
        match self {
            Self::LinearGradient => "linear_gradient",
            Self::InterpolationExtrapolation => "interpolation_extrapolation",
        }
    }
}

/// Model for the air density at hub height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityModel {
    /// Barometric height equation
    #[default]
    Barometric,
    /// Ideal gas equation
    IdealGas,
    /// Linear inter-/extrapolation of measured densities
    InterpolationExtrapolation,
}

impl Selector for DensityModel {
    const PARAMETER: &'static str = "density_model";
    const ALL: &'static [Self] = &[Self::Barometric, Self::IdealGas, Self::InterpolationExtrapolation];

    fn name(self) -> &'static str {
        match self {
            Self::Barometric => "barometric",
            Self::IdealGas => "ideal_gas",
            Self::InterpolationExtrapolation => "interpolation_extrapolation",
        }
    }
}

/// Model for the turbine power output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerOutputModel {
    /// Interpolate the power curve
    #[default]
    PowerCurve,
    /// Physical power formula with the cp curve
    PowerCoefficientCurve,
}

impl Selector for PowerOutputModel {
    const PARAMETER: &'static str = "power_output_model";
    const ALL: &'static [Self] = &[Self::PowerCurve, Self::PowerCoefficientCurve];

    fn name(self) -> &'static str {
        match self {
            Self::PowerCurve => "power_curve",
            Self::PowerCoefficientCurve => "power_coefficient_curve",
        }
    }
}

/// Standard deviation of the Gaussian kernel used for power curve smoothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StandardDeviationMethod {
    /// σ = v × turbulence intensity
    #[default]
    #[serde(rename = "turbulence_intensity")]
    TurbulenceIntensity,
    /// σ = 0.2 × v + 0.6
    #[serde(rename = "Staffell_Pfenninger")]
    StaffellPfenninger,
}

impl Selector for StandardDeviationMethod {
    const PARAMETER: &'static str = "standard_deviation_method";
    const ALL: &'static [Self] = &[Self::TurbulenceIntensity, Self::StaffellPfenninger];

    fn name(self) -> &'static str {
        match self {
            Self::TurbulenceIntensity => "turbulence_intensity",
            Self::StaffellPfenninger => "Staffell_Pfenninger",
        }
    }
}

/// Stage of the power curve aggregation at which smoothing is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingOrder {
    /// Smooth each turbine curve before summation
    TurbinePowerCurves,
    /// Smooth each summed wind farm curve
    #[default]
    WindFarmPowerCurves,
    /// Smooth once, after summing the farm curves of a cluster
    ClusterPowerCurve,
}

impl Selector for SmoothingOrder {
    const PARAMETER: &'static str = "smoothing_order";
    const ALL: &'static [Self] = &[Self::TurbinePowerCurves, Self::WindFarmPowerCurves, Self::ClusterPowerCurve];

    fn name(self) -> &'static str {
        match self {
            Self::TurbinePowerCurves => "turbine_power_curves",
            Self::WindFarmPowerCurves => "wind_farm_power_curves",
            Self::ClusterPowerCurve => "cluster_power_curve",
        }
    }
}

/// Name of a wind efficiency curve (dena or Knorr)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindEfficiencyCurveName {
    /// dena, mean curve
    #[default]
    DenaMean,
    /// dena, extreme curve 1
    DenaExtreme1,
    /// dena, extreme curve 2
    DenaExtreme2,
    /// Knorr, mean curve
    KnorrMean,
    /// Knorr, extreme curve 1
    KnorrExtreme1,
    /// Knorr, extreme curve 2
    KnorrExtreme2,
    /// Knorr, extreme curve 3
    KnorrExtreme3,
}

impl Selector for WindEfficiencyCurveName {
    const PARAMETER: &'static str = "wind_efficiency_curve_name";
    const ALL: &'static [Self] = &[
        Self::DenaMean,
        Self::DenaExtreme1,
        Self::DenaExtreme2,
        Self::KnorrMean,
        Self::KnorrExtreme1,
        Self::KnorrExtreme2,
        Self::KnorrExtreme3,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::DenaMean => "dena_mean",
            Self::DenaExtreme1 => "dena_extreme1",
            Self::DenaExtreme2 => "dena_extreme2",
            Self::KnorrMean => "knorr_mean",
            Self::KnorrExtreme1 => "knorr_extreme1",
            Self::KnorrExtreme2 => "knorr_extreme2",
            Self::KnorrExtreme3 => "knorr_extreme3",
        }
    }
}

/// How wake losses inside a wind farm are taken into account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WakeLossesModel {
    /// Scale the farm power curve by the farm's efficiency curve
    PowerEfficiencyCurve,
    /// Scale the farm power curve by the farm's constant efficiency
    ConstantEfficiency,
    /// Reduce the hub height wind speed with a named efficiency curve
    WindEfficiencyCurve(WindEfficiencyCurveName),
    /// No wake losses
    None,
}

impl Default for WakeLossesModel {
    fn default() -> Self {
        Self::WindEfficiencyCurve(WindEfficiencyCurveName::DenaMean)
    }
}

impl Selector for WakeLossesModel {
    const PARAMETER: &'static str = "wake_losses_model";
    const ALL: &'static [Self] = &[
        Self::PowerEfficiencyCurve,
        Self::ConstantEfficiency,
        Self::WindEfficiencyCurve(WindEfficiencyCurveName::DenaMean),
        Self::WindEfficiencyCurve(WindEfficiencyCurveName::DenaExtreme1),
        Self::WindEfficiencyCurve(WindEfficiencyCurveName::DenaExtreme2),
        Self::WindEfficiencyCurve(WindEfficiencyCurveName::KnorrMean),
        Self::WindEfficiencyCurve(WindEfficiencyCurveName::KnorrExtreme1),
        Self::WindEfficiencyCurve(WindEfficiencyCurveName::KnorrExtreme2),
        Self::WindEfficiencyCurve(WindEfficiencyCurveName::KnorrExtreme3),
        Self::None,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::PowerEfficiencyCurve => "power_efficiency_curve",
            Self::ConstantEfficiency => "constant_efficiency",
            Self::WindEfficiencyCurve(curve) => curve.name(),
            Self::None => "none",
        }
    }
}

impl TryFrom<String> for WakeLossesModel {
    type Error = WindPowerError;
    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<WakeLossesModel> for String {
    fn from(model: WakeLossesModel) -> String {
        model.name().to_owned()
    }
}

selector_traits!(
    WindSpeedModel,
    TemperatureModel,
    DensityModel,
    PowerOutputModel,
    StandardDeviationMethod,
    SmoothingOrder,
    WindEfficiencyCurveName,
    WakeLossesModel,
);

fn parse_bool(parameter: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(WindPowerError::configuration(parameter, value, &["true", "false"])),
    }
}

fn parse_number(parameter: &'static str, value: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(WindPowerError::configuration(parameter, value, &["a finite number"])),
    }
}

/// Configuration of a single turbine [`ModelChain`](crate::modelchain::ModelChain)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelChainConfig {
    /// Model for the wind speed at hub height
    pub wind_speed_model: WindSpeedModel,
    /// Model for the temperature at hub height
    pub temperature_model: TemperatureModel,
    /// Model for the density at hub height
    pub density_model: DensityModel,
    /// Model for the power output
    pub power_output_model: PowerOutputModel,
    /// Density-correct the power curve before evaluating it
    pub density_correction: bool,
    /// Height of obstacles around the turbine; zero for widely spread obstacles
    pub obstacle_height: Meters,
    /// Hellman exponent; derived from the roughness length when absent
    pub hellman_exponent: Option<f64>,
}

impl Default for ModelChainConfig {
    fn default() -> Self {
        Self {
            wind_speed_model: WindSpeedModel::default(),
            temperature_model: TemperatureModel::default(),
            density_model: DensityModel::default(),
            power_output_model: PowerOutputModel::default(),
            density_correction: false,
            obstacle_height: Meters::ZERO,
            hellman_exponent: None,
        }
    }
}

impl ModelChainConfig {
    /// Option keys accepted by [`ModelChainConfig::set_option`]
    pub const OPTIONS: &'static [&'static str] = &[
        "wind_speed_model",
        "temperature_model",
        "density_model",
        "power_output_model",
        "density_correction",
        "obstacle_height",
        "hellman_exp",
    ];

    /// Set one option from its string form.
    ///
    /// # Errors
    /// [`WindPowerError::Configuration`] for an unknown key, an unknown model
    /// name, or a negative obstacle height.
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "wind_speed_model" => self.wind_speed_model = value.parse()?,
            "temperature_model" => self.temperature_model = value.parse()?,
            "density_model" | "rho_model" => self.density_model = value.parse()?,
            "power_output_model" => self.power_output_model = value.parse()?,
            "density_correction" => self.density_correction = parse_bool("density_correction", value)?,
            "obstacle_height" => {
                let height = parse_number("obstacle_height", value)?;
                self.obstacle_height = Meters::try_new(height).map_err(|_| {
                    WindPowerError::configuration("obstacle_height", value, &["a height >= 0"])
                })?;
            }
            "hellman_exp" | "hellman_exponent" => {
                self.hellman_exponent = match value.trim() {
                    "" | "none" | "None" => None,
                    v => Some(parse_number("hellman_exp", v)?),
                };
            }
            _ => return Err(WindPowerError::configuration("option", key, Self::OPTIONS)),
        }
        Ok(())
    }

    /// Builder-style [`ModelChainConfig::set_option`]
    pub fn with_option(mut self, key: &str, value: &str) -> Result<Self> {
        self.set_option(key, value)?;
        Ok(self)
    }
}

/// Configuration of a [`TurbineClusterModelChain`](crate::modelchain::TurbineClusterModelChain)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurbineClusterConfig {
    /// Options of the underlying single turbine chain
    ///
    /// `power_output_model` is ignored: aggregated plants always use their
    /// aggregated power curve.
    pub chain: ModelChainConfig,
    /// Wake loss treatment
    pub wake_losses_model: WakeLossesModel,
    /// Smooth power curves with a Gaussian kernel
    pub smoothing: bool,
    /// Step of the smoothing window (m/s)
    pub block_width: f64,
    /// Half width of the smoothing window and extension past the curve end (m/s)
    pub wind_speed_range: f64,
    /// Standard deviation of the smoothing kernel
    pub standard_deviation_method: StandardDeviationMethod,
    /// Aggregation stage at which smoothing is applied
    pub smoothing_order: SmoothingOrder,
}

impl Default for TurbineClusterConfig {
    fn default() -> Self {
        Self {
            chain: ModelChainConfig::default(),
            wake_losses_model: WakeLossesModel::default(),
            smoothing: false,
            block_width: 0.5,
            wind_speed_range: 15.0,
            standard_deviation_method: StandardDeviationMethod::default(),
            smoothing_order: SmoothingOrder::default(),
        }
    }
}

impl TurbineClusterConfig {
    /// Set one option from its string form; unknown keys go to the chain options.
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "wake_losses_model" | "wake_losses_method" => self.wake_losses_model = value.parse()?,
            "smoothing" => self.smoothing = parse_bool("smoothing", value)?,
            "block_width" => {
                let width = parse_number("block_width", value)?;
                if width <= 0.0 {
                    return Err(WindPowerError::configuration("block_width", value, &["a width > 0"]));
                }
                self.block_width = width;
            }
            "wind_speed_range" => {
                let range = parse_number("wind_speed_range", value)?;
                if range < 0.0 {
                    return Err(WindPowerError::configuration("wind_speed_range", value, &["a range >= 0"]));
                }
                self.wind_speed_range = range;
            }
            "standard_deviation_method" => self.standard_deviation_method = value.parse()?,
            "smoothing_order" => self.smoothing_order = value.parse()?,
            _ => self.chain.set_option(key, value)?,
        }
        Ok(())
    }

    /// Builder-style [`TurbineClusterConfig::set_option`]
    pub fn with_option(mut self, key: &str, value: &str) -> Result<Self> {
        self.set_option(key, value)?;
        Ok(self)
    }
}
