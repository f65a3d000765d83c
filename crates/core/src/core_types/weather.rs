//! Height-tagged weather measurements
//!
//! A [`WeatherData`] table maps each [`WeatherVariable`] to one or more time
//! series, each recorded at a known height above ground. All series share the
//! table's time index. This is the only input shape the model chain accepts;
//! loaders convert whatever they read into it once, at the boundary.

use crate::core_types::units::Meters;
use crate::error::{Result, WindPowerError};
use chrono::{Duration, NaiveDateTime};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical quantity recorded in a weather table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherVariable {
    /// Wind speed (m/s)
    WindSpeed,
    /// Air temperature (K)
    Temperature,
    /// Air pressure (Pa)
    Pressure,
    /// Roughness length (m)
    RoughnessLength,
    /// Turbulence intensity (fraction)
    TurbulenceIntensity,
    /// Air density (kg/m³)
    Density,
}

impl WeatherVariable {
    /// All variables, in catalogue order
    pub const ALL: [WeatherVariable; 6] = [
        WeatherVariable::WindSpeed,
        WeatherVariable::Temperature,
        WeatherVariable::Pressure,
        WeatherVariable::RoughnessLength,
        WeatherVariable::TurbulenceIntensity,
        WeatherVariable::Density,
    ];

    /// Canonical column name
    pub fn name(self) -> &'static str {
        match self {
            WeatherVariable::WindSpeed => "wind_speed",
            WeatherVariable::Temperature => "temperature",
            WeatherVariable::Pressure => "pressure",
            WeatherVariable::RoughnessLength => "roughness_length",
            WeatherVariable::TurbulenceIntensity => "turbulence_intensity",
            WeatherVariable::Density => "density",
        }
    }
}

impl fmt::Display for WeatherVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeatherVariable {
    type Err = WindPowerError;

    /// Accepts the canonical names plus the short aliases used by older
    /// weather files (`v_wind`, `v_wind_2`, `temp_air`, `temp_air_2`, `z0`).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "wind_speed" | "v_wind" | "v_wind_2" => Ok(WeatherVariable::WindSpeed),
            "temperature" | "temp_air" | "temp_air_2" => Ok(WeatherVariable::Temperature),
            "pressure" => Ok(WeatherVariable::Pressure),
            "roughness_length" | "z0" => Ok(WeatherVariable::RoughnessLength),
            "turbulence_intensity" => Ok(WeatherVariable::TurbulenceIntensity),
            "density" => Ok(WeatherVariable::Density),
            other => Err(WindPowerError::configuration(
                "weather variable",
                other,
                &WeatherVariable::ALL.map(WeatherVariable::name),
            )),
        }
    }
}

/// One time series recorded at a fixed height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightSeries {
    /// Measurement height above ground
    pub height: Meters,
    /// Values aligned with the owning table's time index
    pub values: Vec<f64>,
}

impl HeightSeries {
    /// Create a height-tagged series
    pub fn new(height: Meters, values: Vec<f64>) -> Self {
        Self { height, values }
    }

    /// Arithmetic mean of the values (NaN for an empty series)
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

/// Weather table: time index plus height-tagged series per variable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "WeatherDataRaw")]
pub struct WeatherData {
    index: Vec<NaiveDateTime>,
    series: FxHashMap<WeatherVariable, Vec<HeightSeries>>,
}

impl WeatherData {
    /// Create an empty table over the given time index.
    pub fn new(index: Vec<NaiveDateTime>) -> Self {
        Self {
            index,
            series: FxHashMap::default(),
        }
    }

    /// Create an empty table with `len` hourly timestamps starting at `start`.
    pub fn hourly(start: NaiveDateTime, len: usize) -> Self {
        let index = (0..len)
            .map(|i| start + Duration::hours(i as i64))
            .collect();
        Self::new(index)
    }

    /// Add a series for `variable` measured at `height`.
    ///
    /// Replaces an existing series of the same variable and height.
    /// Fails with [`WindPowerError::InvalidInput`] if the series length does
    /// not match the time index.
    pub fn insert(&mut self, variable: WeatherVariable, height: Meters, values: Vec<f64>) -> Result<()> {
        if values.len() != self.index.len() {
            return Err(WindPowerError::InvalidInput(format!(
                "{variable} at {height}: {} values but the time index has {} entries",
                values.len(),
                self.index.len()
            )));
        }
        let candidates = self.series.entry(variable).or_default();
        if let Some(existing) = candidates.iter_mut().find(|s| s.height == height) {
            existing.values = values;
        } else {
            candidates.push(HeightSeries::new(height, values));
            candidates.sort_by(|a, b| a.height.cmp(&b.height));
        }
        Ok(())
    }

    /// Builder-style [`WeatherData::insert`]
    pub fn with(mut self, variable: WeatherVariable, height: Meters, values: Vec<f64>) -> Result<Self> {
        self.insert(variable, height, values)?;
        Ok(self)
    }

    /// Time index shared by all series
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Number of time steps
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if the table has no time steps
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All series of `variable`, sorted by height (empty if absent)
    pub fn candidates(&self, variable: WeatherVariable) -> &[HeightSeries] {
        self.series.get(&variable).map_or(&[][..], Vec::as_slice)
    }

    /// All series of `variable`, or [`WindPowerError::MissingData`] if none exist.
    pub fn require(&self, variable: WeatherVariable) -> Result<&[HeightSeries]> {
        match self.candidates(variable) {
            [] => Err(WindPowerError::MissingData(format!(
                "weather data contains no `{variable}` series"
            ))),
            found => Ok(found),
        }
    }

    /// Mean over the lowest series of `variable`, if present.
    ///
    /// Scalar summaries like this feed the power curve aggregation, which
    /// works on a single turbulence intensity or roughness length per run.
    pub fn mean(&self, variable: WeatherVariable) -> Option<f64> {
        self.candidates(variable).first().map(HeightSeries::mean)
    }
}

/// Serialized form of [`WeatherData`], revalidated through [`WeatherData::insert`]
#[derive(Deserialize)]
struct WeatherDataRaw {
    index: Vec<NaiveDateTime>,
    #[serde(default)]
    series: FxHashMap<WeatherVariable, Vec<HeightSeries>>,
}

impl TryFrom<WeatherDataRaw> for WeatherData {
    type Error = WindPowerError;

    fn try_from(raw: WeatherDataRaw) -> Result<Self> {
        let mut weather = WeatherData::new(raw.index);
        for (variable, candidates) in raw.series {
            for series in candidates {
                weather.insert(variable, series.height, series.values)?;
            }
        }
        Ok(weather)
    }
}
