//! Training cycle API routes

use crate::error::ApiResult;
use crate::services::CycleService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use training_tracker_shared::types::{
    CurrentPhaseRequest, CurrentPhaseResponse, TrainingCyclesRequest,
};
use training_tracker_shared::PhaseProjection;

/// Create training cycle routes
pub fn cycle_routes() -> Router<AppState> {
    Router::new()
        .route("/phases", post(project_phases))
        .route("/current", post(current_phase))
}

/// POST /api/v1/training-cycles/phases - Place phases on the calendar
async fn project_phases(
    Json(req): Json<TrainingCyclesRequest>,
) -> ApiResult<Json<PhaseProjection>> {
    Ok(Json(CycleService::project(&req)?))
}

/// POST /api/v1/training-cycles/current - Active phase and week
///
/// `today` defaults to the current date under the server's timezone policy.
async fn current_phase(
    State(state): State<AppState>,
    Json(req): Json<CurrentPhaseRequest>,
) -> ApiResult<Json<CurrentPhaseResponse>> {
    let today = req
        .today
        .unwrap_or_else(|| state.timezone.calendar_date(Utc::now()));

    Ok(Json(CycleService::current(&req, today)?))
}
