//! Shared numeric helpers: curve interpolation, height selection and the
//! Gaussian kernel used by power curve smoothing.

use crate::core_types::units::Meters;
use crate::core_types::weather::HeightSeries;
use crate::error::{Result, WindPowerError};

/// Index of the segment `[xs[i], xs[i+1]]` containing `x`.
///
/// Caller guarantees `xs[0] <= x <= xs[last]` and `xs.len() >= 2`.
#[inline]
fn segment(x: f64, xs: &[f64]) -> usize {
    // partition_point gives the first xs[i] > x
    xs.partition_point(|&v| v <= x).clamp(1, xs.len() - 1) - 1
}

#[inline]
fn lerp_segment(x: f64, xs: &[f64], ys: &[f64], i: usize) -> f64 {
    let (x0, x1) = (xs[i], xs[i + 1]);
    let (y0, y1) = (ys[i], ys[i + 1]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Linear interpolation with constant extension beyond both ends.
///
/// `xs` must be sorted ascending and have the same length as `ys`.
/// NaN input propagates.
pub fn interp_clamped(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    match xs.len() {
        0 => f64::NAN,
        1 => ys[0],
        n => {
            if x.is_nan() {
                f64::NAN
            } else if x <= xs[0] {
                ys[0]
            } else if x >= xs[n - 1] {
                ys[n - 1]
            } else {
                lerp_segment(x, xs, ys, segment(x, xs))
            }
        }
    }
}

/// Linear interpolation that evaluates to zero outside `[xs[0], xs[last]]`.
pub fn interp_zero_outside(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    match (xs.first(), xs.last()) {
        (Some(&lo), Some(&hi)) if x >= lo && x <= hi => interp_clamped(x, xs, ys),
        _ => 0.0,
    }
}

/// Linear interpolation along the index of a sparse column.
///
/// Returns `None` before the first point, interpolates inside the domain and
/// repeats the last value after it. Matches how a column with gaps is filled
/// when two tables are aligned on a shared wind speed index.
pub fn interp_index(x: f64, xs: &[f64], ys: &[f64]) -> Option<f64> {
    let first = *xs.first()?;
    if x.is_nan() || x < first {
        None
    } else {
        Some(interp_clamped(x, xs, ys))
    }
}

/// Select the series whose height is closest to `target`.
///
/// An exact height match wins outright. Otherwise the smallest absolute
/// difference wins, ties going to the lower height. A single candidate is
/// returned without any distance check.
///
/// Fails with [`WindPowerError::InvalidInput`] if there are no candidates.
pub fn select_closest(candidates: &[HeightSeries], target: Meters) -> Result<&HeightSeries> {
    match candidates {
        [] => Err(WindPowerError::InvalidInput(format!(
            "no measurement height available to select a value for {target}"
        ))),
        [only] => Ok(only),
        _ => {
            if let Some(exact) = candidates.iter().find(|c| c.height == target) {
                return Ok(exact);
            }
            let mut sorted: Vec<&HeightSeries> = candidates.iter().collect();
            sorted.sort_by(|a, b| a.height.cmp(&b.height));
            let mut best = sorted[0];
            for candidate in &sorted[1..] {
                if (candidate.height - target).abs() < (best.height - target).abs() {
                    best = candidate;
                }
            }
            Ok(best)
        }
    }
}

/// Linear inter- or extrapolation between the two heights closest to `target`.
///
/// ```text
/// value = (v₂ - v₁) / (h₂ - h₁) × (h_target - h₁) + v₁
/// ```
///
/// where h₂ is the closest height and h₁ the second closest. Fails with
/// [`WindPowerError::InvalidInput`] if fewer than two heights are available.
pub fn linear_extra_interpolation(candidates: &[HeightSeries], target: Meters) -> Result<Vec<f64>> {
    if candidates.len() < 2 {
        return Err(WindPowerError::InvalidInput(format!(
            "inter-/extrapolation to {target} needs data at two heights, got {}",
            candidates.len()
        )));
    }
    let closest = select_closest(candidates, target)?;
    let rest: Vec<HeightSeries> = candidates
        .iter()
        .filter(|c| c.height != closest.height)
        .cloned()
        .collect();
    let second = select_closest(&rest, target)?;

    let (h2, h1) = (*closest.height, *second.height);
    let slope_scale = (*target - h1) / (h2 - h1);
    Ok(closest
        .values
        .iter()
        .zip(&second.values)
        .map(|(&v2, &v1)| (v2 - v1) * slope_scale + v1)
        .collect())
}

/// Gaussian probability density at `x`.
///
/// Returns NaN for a zero standard deviation; callers decide how to treat it.
pub fn gauss_distribution(x: f64, standard_deviation: f64, mean: f64) -> f64 {
    let z = (x - mean) / standard_deviation;
    (-0.5 * z * z).exp() / (standard_deviation * (2.0 * std::f64::consts::PI).sqrt())
}

/// Estimate turbulence intensity from height and roughness length.
///
/// ```text
/// TI = 1 / ln(h / z₀)
/// ```
///
/// # References
/// Knorr, K. (2016). "Modellierung von raum-zeitlichen Eigenschaften der
/// Windenergieeinspeisung für wetterdatenbasierte Windleistungssimulationen", p. 88
pub fn estimate_turbulence_intensity(height: Meters, roughness_length: f64) -> f64 {
    1.0 / (*height / roughness_length).ln()
}
