//! Error types for the training tracker core

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the aggregation and scheduling core.
///
/// Both variants abort the call that produced them. Per-record problems in
/// the activity list are not errors at this level; see [`SoftDataError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Caller supplied inconsistent parameters (e.g. `min_date > max_date`)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A training cycle or draft failed validation
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Configuration(_) => "CONFIGURATION_ERROR",
            CoreError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

/// A single activity record that could not be placed on the calendar.
///
/// The aggregator logs these and moves on; they never abort aggregation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Activity {activity_id} has unusable start time {start_time:?}: {reason}")]
pub struct SoftDataError {
    pub activity_id: Uuid,
    pub start_time: String,
    pub reason: String,
}

/// Result alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
