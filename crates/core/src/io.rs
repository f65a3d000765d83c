//! CSV loaders for weather tables and turbine curves

use crate::core_types::curve::{EfficiencyCurve, PowerCoefficientCurve, PowerCurve};
use crate::core_types::units::Meters;
use crate::core_types::weather::{WeatherData, WeatherVariable};
use crate::error::{Result, WindPowerError};
use chrono::{DateTime, NaiveDateTime};
use std::path::Path;
use tracing::debug;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIMESTAMP_FORMAT_WITH_OFFSET: &str = "%Y-%m-%d %H:%M:%S%:z";

fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_str(value, TIMESTAMP_FORMAT_WITH_OFFSET).map(|t| t.naive_local()))
        .map_err(|_| WindPowerError::InvalidInput(format!("cannot parse timestamp '{value}'")))
}

fn parse_value(value: &str, what: &str, row: usize) -> Result<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(f64::NAN);
    }
    value
        .parse()
        .map_err(|_| WindPowerError::InvalidInput(format!("row {row}: cannot parse {what} '{value}'")))
}

/// Read a weather table.
///
/// Layout: the first header row names the variable of each column, the second
/// the measurement height in m. The first column holds the timestamps
/// (`%Y-%m-%d %H:%M:%S`, optionally followed by a `%:z` offset which is
/// dropped). Empty cells are read as NaN.
///
/// ```text
/// variable_name,pressure,temperature,wind_speed,roughness_length
/// height,0,2,10,0
/// 2010-01-01 00:00:00,101125,267.6,5.3,0.15
/// ```
pub fn read_weather_csv(path: impl AsRef<Path>) -> Result<WeatherData> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new().has_headers(false).from_path(path)?;
    let mut records = reader.records();

    let missing_header = || WindPowerError::InvalidInput(format!("{}: two header rows expected", path.display()));
    let names = records.next().ok_or_else(missing_header)??;
    let heights = records.next().ok_or_else(missing_header)??;

    let columns = names
        .iter()
        .zip(heights.iter())
        .skip(1)
        .map(|(name, height)| {
            let variable: WeatherVariable = name.trim().parse()?;
            let height = parse_value(height, "height", 2)?;
            Ok((variable, Meters::try_new(height)?))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut index = Vec::new();
    let mut values = vec![Vec::new(); columns.len()];
    for (row, record) in records.enumerate() {
        let record = record?;
        let row = row + 3;
        let timestamp = record
            .get(0)
            .ok_or_else(|| WindPowerError::InvalidInput(format!("row {row}: missing timestamp")))?;
        index.push(parse_timestamp(timestamp)?);
        for (column, series) in values.iter_mut().enumerate() {
            series.push(parse_value(record.get(column + 1).unwrap_or(""), "value", row)?);
        }
    }

    let mut weather = WeatherData::new(index);
    for ((variable, height), series) in columns.into_iter().zip(values) {
        weather.insert(variable, height, series)?;
    }
    debug!(path = %path.display(), steps = weather.len(), "Read weather data");
    Ok(weather)
}

/// Read two named columns of a curve file.
fn read_curve_columns(path: &Path, value_column: &str) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| WindPowerError::MissingData(format!("{}: no `{name}` column", path.display())))
    };
    let (x_column, y_column) = (position("wind_speed")?, position(value_column)?);

    let mut wind_speed = Vec::new();
    let mut values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        wind_speed.push(parse_value(record.get(x_column).unwrap_or(""), "wind_speed", row + 2)?);
        values.push(parse_value(record.get(y_column).unwrap_or(""), value_column, row + 2)?);
    }
    Ok((wind_speed, values))
}

/// Read a power curve with columns `wind_speed,power` (m/s, W).
pub fn read_power_curve_csv(path: impl AsRef<Path>) -> Result<PowerCurve> {
    let (wind_speed, power) = read_curve_columns(path.as_ref(), "power")?;
    PowerCurve::new(wind_speed, power)
}

/// Read a power coefficient curve with columns `wind_speed,power_coefficient`.
pub fn read_power_coefficient_curve_csv(path: impl AsRef<Path>) -> Result<PowerCoefficientCurve> {
    let (wind_speed, cp) = read_curve_columns(path.as_ref(), "power_coefficient")?;
    PowerCoefficientCurve::new(wind_speed, cp)
}

/// Read a wind farm efficiency curve with columns `wind_speed,efficiency`.
pub fn read_efficiency_curve_csv(path: impl AsRef<Path>) -> Result<EfficiencyCurve> {
    let (wind_speed, efficiency) = read_curve_columns(path.as_ref(), "efficiency")?;
    EfficiencyCurve::new(wind_speed, efficiency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_weather_csv() {
        let file = write_file(
            "variable_name,pressure,temperature,wind_speed,wind_speed,roughness_length\n\
             height,0,2,10,80,0\n\
             2010-01-01 00:00:00+01:00,101125,267.6,5.3,7.1,0.15\n\
             2010-01-01 01:00:00+01:00,101000,267.6,5.5,,0.15\n",
        );
        let weather = read_weather_csv(file.path()).unwrap();
        assert_eq!(weather.len(), 2);
        assert_eq!(weather.candidates(WeatherVariable::WindSpeed).len(), 2);
        let at_80 = &weather.candidates(WeatherVariable::WindSpeed)[1];
        assert_eq!(at_80.height, Meters::new(80.0));
        assert_eq!(at_80.values[0], 7.1);
        assert!(at_80.values[1].is_nan());
        assert_eq!(weather.mean(WeatherVariable::Pressure), Some(101_062.5));
        assert_eq!(weather.index()[1].to_string(), "2010-01-01 01:00:00");
    }

    #[test]
    fn test_read_weather_csv_rejects_unknown_variable() {
        let file = write_file("variable_name,humidity\nheight,2\n2010-01-01 00:00:00,0.8\n");
        assert!(read_weather_csv(file.path()).is_err());
    }

    #[test]
    fn test_read_curves() {
        let file = write_file("wind_speed,power\n0,0\n3,0\n12,3000000\n25,3000000\n");
        let curve = read_power_curve_csv(file.path()).unwrap();
        assert_eq!(curve.len(), 4);
        assert_eq!(curve.max_power(), 3.0e6);

        let file = write_file("wind_speed,power_coefficient\n4,0.2\n8,0.45\n");
        let cp = read_power_coefficient_curve_csv(file.path()).unwrap();
        assert_eq!(cp.cp_at(8.0), 0.45);

        let file = write_file("wind_speed,efficiency\n0,0.8\n25,1.0\n");
        let eff = read_efficiency_curve_csv(file.path()).unwrap();
        assert_eq!(eff.efficiency(), &[0.8, 1.0]);

        let file = write_file("speed,power\n0,0\n");
        assert!(matches!(read_power_curve_csv(file.path()), Err(WindPowerError::MissingData(_))));
    }
}
