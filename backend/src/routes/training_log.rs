//! Training log API routes

use crate::error::ApiResult;
use crate::services::TrainingLogService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use training_tracker_shared::types::TrainingLogRequest;
use training_tracker_shared::StructuredLog;

/// Create training log routes
pub fn training_log_routes() -> Router<AppState> {
    Router::new().route("/", post(build_training_log))
}

/// POST /api/v1/training-log - Build the calendar report
///
/// Buckets the posted activities into years, months, ISO weeks and days over
/// `[min_date, max_date]`. Activities with unreadable start times are listed
/// in `skipped_activity_ids` instead of failing the request.
async fn build_training_log(
    State(state): State<AppState>,
    Json(req): Json<TrainingLogRequest>,
) -> ApiResult<Json<StructuredLog>> {
    let log = TrainingLogService::build_log(&req, state.timezone, state.compact_by_default())?;
    Ok(Json(log))
}
