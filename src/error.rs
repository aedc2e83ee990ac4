// src/error.rs

use thiserror::Error;

/// Errors raised by the analytics engine and its ingestion layer.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// A required column or field is missing, or a row breaks the table contract.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("insufficient data for {what}: need at least {required}, have {available}")]
    InsufficientData {
        what: &'static str,
        required: usize,
        available: usize,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl AnalyticsError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        AnalyticsError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Fails unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> AnalyticsResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AnalyticsError::invalid(name, value, "must be a finite positive number"))
    }
}

/// Fails unless `value` is finite and not negative.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> AnalyticsResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AnalyticsError::invalid(name, value, "must be a finite non-negative number"))
    }
}
