//! Wake losses in the wind speed domain
//!
//! Instead of scaling power, the hub height wind speed of a wind farm is
//! reduced by a named wind efficiency curve.
//!
//! Only `dena_mean` ships with the crate. The other dena and Knorr curves
//! have to be supplied as a table in the same layout: a `wind_speed` column
//! followed by one column per curve name.
//!
//! ```text
//! wind_speed,knorr_mean,knorr_extreme1
//! 0.0,1.0,1.0
//! 1.0,0.97,0.98
//! ```
//!
//! # Scientific References
//! - Kohler et al. (2010). "dena-Netzstudie II. Integration erneuerbarer
//!   Energien in die deutsche Stromversorgung im Zeitraum 2015 - 2020 mit
//!   Ausblick 2025", Deutsche Energie-Agentur GmbH (dena), p. 101
//! - Knorr, K. (2016). "Modellierung von raum-zeitlichen Eigenschaften der
//!   Windenergieeinspeisung für wetterdatenbasierte Windleistungssimulationen",
//!   Universität Kassel, p. 124

pub use crate::config::WindEfficiencyCurveName;
use crate::config::Selector;
use crate::core_types::curve::EfficiencyCurve;
use crate::error::{Result, WindPowerError};
use crate::physics::tools::interp_clamped;
use rustc_hash::FxHashMap;
use std::path::Path;
use tracing::debug;

const DENA_CURVES: &str = include_str!("../data/wind_efficiency_curves_dena.csv");

/// A set of wind efficiency curves keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindEfficiencyCurves {
    curves: FxHashMap<WindEfficiencyCurveName, EfficiencyCurve>,
}

impl WindEfficiencyCurves {
    /// The curves bundled with the crate (`dena_mean`).
    ///
    /// # Errors
    /// [`WindPowerError::Csv`] or [`WindPowerError::InvalidInput`] if the
    /// bundled table is malformed.
    pub fn bundled() -> Result<Self> {
        Self::from_reader(DENA_CURVES.as_bytes(), "bundled dena table")
    }

    /// Read a curve table from `reader`; `source` names it in error messages.
    ///
    /// # Errors
    /// - [`WindPowerError::MissingData`] without a `wind_speed` column
    /// - [`WindPowerError::Configuration`] for a column that is not a curve name
    /// - [`WindPowerError::InvalidInput`] for unparsable cells or badly shaped curves
    pub fn from_reader<R: std::io::Read>(reader: R, source: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.clone();
        let x_column = headers
            .iter()
            .position(|h| h.trim() == "wind_speed")
            .ok_or_else(|| WindPowerError::MissingData(format!("{source}: no `wind_speed` column")))?;
        let names = headers
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != x_column)
            .map(|(i, h)| Ok((i, h.trim().parse::<WindEfficiencyCurveName>()?)))
            .collect::<Result<Vec<_>>>()?;

        let mut wind_speed = Vec::new();
        let mut columns = vec![Vec::new(); names.len()];
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let parse = |i: usize| -> Result<f64> {
                record.get(i).and_then(|v| v.trim().parse().ok()).ok_or_else(|| {
                    WindPowerError::InvalidInput(format!("{source}: malformed cell in row {}", row + 2))
                })
            };
            wind_speed.push(parse(x_column)?);
            for ((i, _), column) in names.iter().zip(&mut columns) {
                column.push(parse(*i)?);
            }
        }

        let curves = names
            .into_iter()
            .zip(columns)
            .map(|((_, name), efficiency)| Ok((name, EfficiencyCurve::new(wind_speed.clone(), efficiency)?)))
            .collect::<Result<FxHashMap<_, _>>>()?;
        debug!(source, curves = curves.len(), "Read wind efficiency curves");
        Ok(Self { curves })
    }

    /// Read a curve table from a CSV file.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Add or replace a curve
    pub fn insert(&mut self, name: WindEfficiencyCurveName, curve: EfficiencyCurve) {
        self.curves.insert(name, curve);
    }

    /// Add every curve of `other`, replacing curves of the same name
    pub fn merge(&mut self, other: Self) {
        self.curves.extend(other.curves);
    }

    /// The named curve, or [`WindPowerError::MissingData`] if the set lacks it
    pub fn get(&self, name: WindEfficiencyCurveName) -> Result<&EfficiencyCurve> {
        self.curves.get(&name).ok_or_else(|| {
            WindPowerError::MissingData(format!(
                "wind efficiency curve {name} is not available, load a table that contains it"
            ))
        })
    }

    /// Names of the curves in the set, in catalogue order
    pub fn names(&self) -> Vec<WindEfficiencyCurveName> {
        WindEfficiencyCurveName::ALL
            .iter()
            .copied()
            .filter(|name| self.curves.contains_key(name))
            .collect()
    }

    /// Reduce a wind speed series by the named curve.
    ///
    /// ```text
    /// v_reduced = v × η(v)
    /// ```
    ///
    /// with η linearly interpolated and held constant beyond the table.
    pub fn reduce_wind_speed(&self, wind_speed: &[f64], name: WindEfficiencyCurveName) -> Result<Vec<f64>> {
        Ok(reduce_wind_speed_by(wind_speed, self.get(name)?))
    }
}

/// Reduce a wind speed series by an efficiency curve: `v × η(v)`.
pub fn reduce_wind_speed_by(wind_speed: &[f64], curve: &EfficiencyCurve) -> Vec<f64> {
    wind_speed
        .iter()
        .map(|&v| v * interp_clamped(v, curve.wind_speed(), curve.efficiency()))
        .collect()
}

/// Read one named wind efficiency curve from the bundled table.
///
/// # Errors
/// [`WindPowerError::MissingData`] for a curve that is not bundled.
pub fn get_wind_efficiency_curve(name: WindEfficiencyCurveName) -> Result<EfficiencyCurve> {
    WindEfficiencyCurves::bundled()?.get(name).cloned()
}

/// Parse a curve name and read it; unknown names fail with
/// [`WindPowerError::Configuration`].
pub fn get_wind_efficiency_curve_by_name(name: &str) -> Result<EfficiencyCurve> {
    get_wind_efficiency_curve(name.parse()?)
}

/// All bundled curves, in catalogue order
pub fn available_wind_efficiency_curves() -> Result<Vec<(WindEfficiencyCurveName, EfficiencyCurve)>> {
    let bundled = WindEfficiencyCurves::bundled()?;
    bundled
        .names()
        .into_iter()
        .map(|name| Ok((name, bundled.get(name)?.clone())))
        .collect()
}

/// Reduce a wind speed series by a bundled wind efficiency curve.
pub fn reduce_wind_speed(wind_speed: &[f64], name: WindEfficiencyCurveName) -> Result<Vec<f64>> {
    WindEfficiencyCurves::bundled()?.reduce_wind_speed(wind_speed, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reduce_wind_speed_dena_mean() {
        let wind_speed: Vec<f64> = (0..26).map(f64::from).collect();
        let reduced = reduce_wind_speed(&wind_speed, WindEfficiencyCurveName::DenaMean).unwrap();
        let expected = [
            (0, 0.0),
            (1, 0.994_953_423_411_939_6),
            (4, 3.807_636_264_984_227),
            (6, 5.642_507_531_914_893),
            (10, 9.606_135_658_475_111),
            (15, 14.742_508_260_567_297),
            (25, 24.958_125),
        ];
        for (i, v) in expected {
            assert_relative_eq!(reduced[i], v, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_bundled_catalogue_holds_dena_mean_only() {
        let curves = available_wind_efficiency_curves().unwrap();
        assert_eq!(curves.len(), 1);
        let (name, curve) = &curves[0];
        assert_eq!(*name, WindEfficiencyCurveName::DenaMean);
        assert!(curve.efficiency().iter().all(|&e| e > 0.0 && e <= 1.0));

        for &name in &WindEfficiencyCurveName::ALL[1..] {
            assert!(
                matches!(get_wind_efficiency_curve(name), Err(WindPowerError::MissingData(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn test_unknown_curve_name() {
        assert!(get_wind_efficiency_curve_by_name("misspelled").unwrap_err().is_configuration());
        assert!(get_wind_efficiency_curve_by_name("dena_misspelled").unwrap_err().is_configuration());
        assert!(get_wind_efficiency_curve_by_name("dena_mean").is_ok());
        assert!(matches!(
            get_wind_efficiency_curve_by_name("knorr_extreme3"),
            Err(WindPowerError::MissingData(_))
        ));
    }

    #[test]
    fn test_user_table_extends_bundled_curves() {
        let table = "wind_speed,knorr_mean,knorr_extreme3\n0,1.0,1.0\n10,0.9,0.8\n20,1.0,1.0\n";
        let mut curves = WindEfficiencyCurves::bundled().unwrap();
        curves.merge(WindEfficiencyCurves::from_reader(table.as_bytes(), "table").unwrap());
        assert_eq!(
            curves.names(),
            vec![
                WindEfficiencyCurveName::DenaMean,
                WindEfficiencyCurveName::KnorrMean,
                WindEfficiencyCurveName::KnorrExtreme3
            ]
        );
        let reduced = curves
            .reduce_wind_speed(&[5.0, 10.0, 30.0], WindEfficiencyCurveName::KnorrExtreme3)
            .unwrap();
        assert_relative_eq!(reduced[0], 4.5, epsilon = 1e-12);
        assert_relative_eq!(reduced[1], 8.0, epsilon = 1e-12);
        assert_relative_eq!(reduced[2], 30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_malformed_user_tables() {
        let unknown_column = "wind_speed,knorr_median\n0,1.0\n";
        assert!(WindEfficiencyCurves::from_reader(unknown_column.as_bytes(), "t")
            .unwrap_err()
            .is_configuration());
        let no_wind_speed = "speed,knorr_mean\n0,1.0\n";
        assert!(matches!(
            WindEfficiencyCurves::from_reader(no_wind_speed.as_bytes(), "t"),
            Err(WindPowerError::MissingData(_))
        ));
        let unsorted = "wind_speed,knorr_mean\n5,1.0\n2,0.9\n";
        assert!(matches!(
            WindEfficiencyCurves::from_reader(unsorted.as_bytes(), "t"),
            Err(WindPowerError::InvalidInput(_))
        ));
    }
}
