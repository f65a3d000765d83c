//! Error types for the wind power model chain
//!
//! Every failure is terminal for the current run: the caller fixes the
//! configuration or the inputs and runs again. Nothing is retried and no
//! partial result is returned.

use thiserror::Error;

/// Unified error type for all model chain operations.
#[derive(Error, Debug)]
pub enum WindPowerError {
    /// Unknown value for a model or method selector, or an option that is not
    /// valid for the object it is applied to.
    #[error("Configuration error: '{value}' is an invalid value for `{parameter}`, expected {expected}")]
    Configuration {
        /// Name of the offending parameter (e.g. `density_model`)
        parameter: &'static str,
        /// Value that was supplied
        value: String,
        /// Human readable list of accepted values
        expected: String,
    },

    /// Physically inconsistent input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A curve, table or weather variable required by the selected model is absent.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// Wrong shape of a specification (e.g. a curve where a scalar is needed).
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// I/O errors from the CSV loaders
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse errors from the loaders
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl WindPowerError {
    /// Create a configuration error for a selector value.
    ///
    /// # Arguments
    /// * `parameter` - Name of the selector (e.g. `"wind_speed_model"`)
    /// * `value` - The rejected value
    /// * `expected` - Accepted values, e.g. `&["logarithmic", "hellman"]`
    pub fn configuration(parameter: &'static str, value: impl Into<String>, expected: &[&str]) -> Self {
        Self::Configuration {
            parameter,
            value: value.into(),
            expected: expected
                .iter()
                .map(|v| format!("'{v}'"))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// True for [`WindPowerError::Configuration`]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Convenience alias for results carrying a [`WindPowerError`].
pub type Result<T> = std::result::Result<T, WindPowerError>;
