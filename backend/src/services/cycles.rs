//! Training cycle service
//!
//! Phase projection and current-phase lookup over the cycles supplied with
//! each request.

use crate::error::ApiError;
use chrono::NaiveDate;
use metrics::counter;
use tracing::{debug, warn};
use training_tracker_shared::types::{
    CurrentPhaseRequest, CurrentPhaseResponse, TrainingCyclesRequest,
};
use training_tracker_shared::{
    next_phase, project_cycles, resolve_current_phase, PhaseProjection, TrainingCycle,
};
use validator::Validate;

/// Training cycle service for business logic
pub struct CycleService;

impl CycleService {
    /// Project every cycle in the request
    ///
    /// Cycles with invalid phases are reported in `rejected`; the request
    /// itself still succeeds.
    pub fn project(req: &TrainingCyclesRequest) -> Result<PhaseProjection, ApiError> {
        req.validate()?;
        Ok(Self::project_all(&req.cycles))
    }

    /// Active and upcoming phase on `today`
    pub fn current(
        req: &CurrentPhaseRequest,
        today: NaiveDate,
    ) -> Result<CurrentPhaseResponse, ApiError> {
        req.validate()?;

        let projection = Self::project_all(&req.cycles);
        let current = resolve_current_phase(&projection.phases, today);
        let next = next_phase(&projection.phases, today).cloned();

        debug!(
            %today,
            phases = projection.phases.len(),
            active = current.is_some(),
            "Resolved current training phase"
        );

        Ok(CurrentPhaseResponse {
            today,
            current,
            next,
        })
    }

    fn project_all(cycles: &[TrainingCycle]) -> PhaseProjection {
        let projection = project_cycles(cycles);

        if !projection.rejected.is_empty() {
            counter!("training_cycle_rejected_total").increment(projection.rejected.len() as u64);
            warn!(
                rejected = projection.rejected.len(),
                total = cycles.len(),
                "Some training cycles could not be projected"
            );
        }

        projection
    }
}
