//! API request and response types
//!
//! Shared by the HTTP backend and the WASM bindings so both surfaces accept
//! the same JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::calendar::TimezonePolicy;
use crate::current_phase::CurrentPhaseInfo;
use crate::errors::CoreResult;
use crate::models::{ActivityRecord, TrainingCycle};
use crate::training_cycle::ComputedPhase;
use crate::validation::validate_window_span;

/// Build a structured training log
///
/// Window order is checked by the aggregator (a configuration error); only
/// the window length is a request validation error.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_log_window"))]
pub struct TrainingLogRequest {
    #[validate(length(max = 50000))]
    pub activities: Vec<ActivityRecord>,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    /// Overrides the server's timezone policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = -1439, max = 1439))]
    pub utc_offset_minutes: Option<i32>,
    /// Collapse empty buckets (defaults to the server setting)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compact: Option<bool>,
}

impl TrainingLogRequest {
    /// Timezone policy for this request, falling back to `default`.
    pub fn timezone_policy(&self, default: TimezonePolicy) -> CoreResult<TimezonePolicy> {
        match self.utc_offset_minutes {
            Some(minutes) => TimezonePolicy::fixed(minutes),
            None => Ok(default),
        }
    }
}

fn validate_log_window(req: &TrainingLogRequest) -> Result<(), ValidationError> {
    validate_window_span(req.min_date, req.max_date).map_err(|msg| {
        let mut err = ValidationError::new("window_too_long");
        err.message = Some(Cow::Owned(msg));
        err
    })
}

/// Project one or more training cycles
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrainingCyclesRequest {
    #[validate(length(max = 500))]
    pub cycles: Vec<TrainingCycle>,
}

/// Resolve the active phase across training cycles
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CurrentPhaseRequest {
    #[validate(length(max = 500))]
    pub cycles: Vec<TrainingCycle>,
    /// Defaults to today under the server's timezone policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today: Option<NaiveDate>,
}

/// Active and upcoming phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentPhaseResponse {
    pub today: NaiveDate,
    pub current: Option<CurrentPhaseInfo>,
    pub next: Option<ComputedPhase>,
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
