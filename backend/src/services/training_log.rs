//! Training log service
//!
//! Validates the request envelope, picks the timezone policy and runs the
//! aggregator. Records dropped by the aggregator are counted but never fail
//! the request.

use crate::error::ApiError;
use metrics::counter;
use tracing::{info, warn};
use training_tracker_shared::types::TrainingLogRequest;
use training_tracker_shared::{ActivityLogAggregator, StructuredLog, TimezonePolicy};
use validator::Validate;

/// Training log service for business logic
pub struct TrainingLogService;

impl TrainingLogService {
    /// Build the structured log for a request
    ///
    /// `default_policy` and `compact_by_default` apply when the request does
    /// not override them.
    pub fn build_log(
        req: &TrainingLogRequest,
        default_policy: TimezonePolicy,
        compact_by_default: bool,
    ) -> Result<StructuredLog, ApiError> {
        req.validate()?;

        let policy = req.timezone_policy(default_policy)?;
        let aggregator = ActivityLogAggregator::new(policy);
        let compact = req.compact.unwrap_or(compact_by_default);

        let log = if compact {
            aggregator.aggregate_compact(&req.activities, req.min_date, req.max_date)?
        } else {
            aggregator.aggregate(&req.activities, req.min_date, req.max_date)?
        };

        counter!("training_log_requests_total").increment(1);

        let skipped = log.skipped_activity_ids.len();
        if skipped > 0 {
            counter!("training_log_skipped_records_total").increment(skipped as u64);
            warn!(
                skipped,
                received = req.activities.len(),
                "Some activities were left out of the training log"
            );
        }

        info!(
            min_date = %req.min_date,
            max_date = %req.max_date,
            activities = log.totals.activity_count,
            utc_offset_minutes = policy.utc_offset_minutes,
            compact,
            "Training log built"
        );

        Ok(log)
    }
}
