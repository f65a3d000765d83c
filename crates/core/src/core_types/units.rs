//! Semantic unit types for type-safe physical quantity handling
//!
//! Newtype wrappers for the scalar quantities that describe turbines and
//! power plants, so a hub height cannot be passed where a nominal power is
//! expected.
//!
//! # Design Philosophy
//! - f64 throughout: power values reach 10^8 W for clusters and heights feed
//!   into logarithms
//! - Total ordering via `Ord` (NaN sorts above all values)
//! - Private inner fields with validated constructors
//! - Time series stay plain `Vec<f64>`; the unit is documented on the field
//!
//! # Usage
//! ```
//! use windpower_core::core_types::units::{Meters, Watts};
//!
//! let hub = Meters::new(135.0);
//! assert_eq!(*hub, 135.0);
//!
//! let farm = Watts::new(3_000_000.0) * 3.0 + Watts::new(7_500_000.0);
//! assert_eq!(farm, Watts::new(16_500_000.0));
//! ```

use crate::error::{Result, WindPowerError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Deref, Div, Mul, Sub};

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// DISTANCE/LENGTH TYPES
// ============================================================================

/// Distance or height above ground in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64")]
#[repr(transparent)]
pub struct Meters(f64);

impl Eq for Meters {}

impl PartialOrd for Meters {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Meters {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Meters {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Meters {
    /// Ground level
    pub const ZERO: Meters = Meters(0.0);

    /// Create a new distance in meters. Asserts value is finite and >= 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= 0.0 && value <= f64::MAX,
            "Meters::new: distance must be finite and non-negative"
        );
        Meters(value)
    }

    /// Create a distance from untrusted input.
    ///
    /// Returns [`WindPowerError::InvalidInput`] for negative or non-finite values.
    pub fn try_new(value: f64) -> Result<Self> {
        if value >= 0.0 && value.is_finite() {
            Ok(Meters(value))
        } else {
            Err(WindPowerError::InvalidInput(format!(
                "height must be finite and non-negative, got {value}"
            )))
        }
    }
}

impl TryFrom<f64> for Meters {
    type Error = WindPowerError;

    fn try_from(value: f64) -> Result<Self> {
        Self::try_new(value)
    }
}

impl From<Meters> for f64 {
    fn from(m: Meters) -> f64 {
        m.0
    }
}

impl Add for Meters {
    type Output = Meters;
    fn add(self, rhs: Meters) -> Meters {
        Meters(self.0 + rhs.0)
    }
}

// Height difference can be negative, so the result is a plain f64
impl Sub for Meters {
    type Output = f64;
    fn sub(self, rhs: Meters) -> f64 {
        self.0 - rhs.0
    }
}

impl Mul<f64> for Meters {
    type Output = Meters;
    fn mul(self, rhs: f64) -> Meters {
        Meters(self.0 * rhs)
    }
}

impl PartialEq<f64> for Meters {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m", self.0)
    }
}

// ============================================================================
// POWER TYPES
// ============================================================================

/// Electrical power in watts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64")]
#[repr(transparent)]
pub struct Watts(f64);

impl Eq for Watts {}

impl PartialOrd for Watts {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Watts {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Watts {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Watts {
    /// No power
    pub const ZERO: Watts = Watts(0.0);

    /// Create a new power value. Asserts value is finite and >= 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= 0.0 && value <= f64::MAX,
            "Watts::new: power must be finite and non-negative"
        );
        Watts(value)
    }

    /// Create a power value from untrusted input.
    pub fn try_new(value: f64) -> Result<Self> {
        if value >= 0.0 && value.is_finite() {
            Ok(Watts(value))
        } else {
            Err(WindPowerError::InvalidInput(format!(
                "power must be finite and non-negative, got {value}"
            )))
        }
    }

    /// Convert to megawatts (for display)
    #[inline]
    #[must_use]
    pub fn as_megawatts(self) -> f64 {
        self.0 / 1.0e6
    }
}

impl TryFrom<f64> for Watts {
    type Error = WindPowerError;

    fn try_from(value: f64) -> Result<Self> {
        Self::try_new(value)
    }
}

impl From<Watts> for f64 {
    fn from(w: Watts) -> f64 {
        w.0
    }
}

impl Add for Watts {
    type Output = Watts;
    fn add(self, rhs: Watts) -> Watts {
        Watts(self.0 + rhs.0)
    }
}

impl Mul<f64> for Watts {
    type Output = Watts;
    fn mul(self, rhs: f64) -> Watts {
        Watts(self.0 * rhs)
    }
}

// Ratio of two powers is dimensionless
impl Div for Watts {
    type Output = f64;
    fn div(self, rhs: Watts) -> f64 {
        self.0 / rhs.0
    }
}

impl Sum for Watts {
    fn sum<I: Iterator<Item = Watts>>(iter: I) -> Watts {
        Watts(iter.map(|w| w.0).sum())
    }
}

impl PartialEq<f64> for Watts {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Watts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 1.0e6 {
            write!(f, "{:.3} MW", self.0 / 1.0e6)
        } else {
            write!(f, "{:.1} W", self.0)
        }
    }
}
