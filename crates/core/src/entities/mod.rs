//! Turbines, wind farms and turbine clusters
//!
//! Entities hold specification data only. Aggregates such as mean hub height
//! and installed power are recomputed from the current fleet on every call,
//! and model chain results live in separate output records.

pub mod turbine;
pub mod wind_farm;
pub mod wind_turbine_cluster;

pub use turbine::WindTurbine;
pub use wind_farm::{FarmEfficiency, FleetEntry, WindFarm};
pub use wind_turbine_cluster::WindTurbineCluster;

use crate::core_types::units::{Meters, Watts};
use crate::error::{Result, WindPowerError};

/// Power-weighted logarithmic mean of hub heights
///
/// ```text
/// h_mean = exp( Σ ln(h_k) × P_k / Σ P_k )
/// ```
///
/// `P_k` is the power installed at height `h_k` (nominal power times count
/// for a farm, installed power for a cluster).
///
/// The logarithms are taken relative to the first height, so a fleet whose
/// heights are all equal returns that height bit for bit.
///
/// # References
/// Knorr, K. (2016). "Modellierung von raum-zeitlichen Eigenschaften der
/// Windenergieeinspeisung für wetterdatenbasierte Windleistungssimulationen", p. 35
///
/// # Errors
/// [`WindPowerError::InvalidInput`] if the total power is zero.
pub(crate) fn weighted_log_mean<I>(owner: &str, heights: I) -> Result<Meters>
where
    I: IntoIterator<Item = (Meters, Watts)>,
{
    let mut heights = heights.into_iter().peekable();
    let reference = heights
        .peek()
        .map(|(height, _)| **height)
        .filter(|&height| height > 0.0)
        .unwrap_or(1.0);
    let (weighted, total) = heights.fold((0.0, 0.0), |(weighted, total), (height, power)| {
        (weighted + (*height / reference).ln() * *power, total + *power)
    });
    if total <= 0.0 {
        return Err(WindPowerError::InvalidInput(format!(
            "{owner}: mean hub height needs a total nominal power above zero"
        )));
    }
    Meters::try_new(reference * (weighted / total).exp())
}
