//! Training cycle phase projection
//!
//! A cycle stores its phases relative to each other (type, length in weeks,
//! position). Projection lays them end to end from the cycle's start date so
//! each phase gets absolute dates. End dates are exclusive: a phase's end is
//! the next phase's start.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::calendar::checked_add_weeks;
use crate::errors::{CoreError, CoreResult};
use crate::models::{PhaseType, TrainingCycle};
use crate::validation::validate_phase_duration;

/// A phase placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedPhase {
    pub cycle_id: Uuid,
    pub cycle_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_id: Option<Uuid>,
    pub phase_type: PhaseType,
    pub duration_weeks: u32,
    pub order: i32,
    pub start_date: NaiveDate,
    /// Exclusive
    pub end_date: NaiveDate,
}

impl ComputedPhase {
    /// Whether `date` falls in `[start_date, end_date)`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date < self.end_date
    }
}

/// A cycle that could not be projected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedCycle {
    pub cycle_id: Uuid,
    pub cycle_name: String,
    pub message: String,
}

/// Outcome of projecting several cycles at once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhaseProjection {
    /// All phases of the accepted cycles, cycle by cycle in input order
    pub phases: Vec<ComputedPhase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedCycle>,
}

/// Project one cycle's phases onto the calendar.
///
/// Every phase must have a positive duration; otherwise the whole cycle is
/// rejected before anything is projected. Phases are taken in ascending
/// `order` (ties keep their listed order). A cycle without phases yields an
/// empty list.
pub fn project_cycle(cycle: &TrainingCycle) -> CoreResult<Vec<ComputedPhase>> {
    let mut phases = Vec::with_capacity(cycle.phases.len());
    for phase in &cycle.phases {
        let weeks = validate_phase_duration(phase.duration_weeks).map_err(|msg| {
            CoreError::Validation(format!(
                "cycle '{}' phase {} ({}): {}",
                cycle.name, phase.order, phase.phase_type, msg
            ))
        })?;
        phases.push((phase, weeks));
    }

    phases.sort_by_key(|(phase, _)| phase.order);

    let mut cursor = cycle.start_date;
    let mut computed = Vec::with_capacity(phases.len());
    for (phase, weeks) in phases {
        let start_date = cursor;
        let end_date = checked_add_weeks(start_date, weeks).ok_or_else(|| {
            CoreError::Validation(format!(
                "cycle '{}' phase {} ({}): {} weeks from {} runs past the last supported date",
                cycle.name, phase.order, phase.phase_type, weeks, start_date
            ))
        })?;
        cursor = end_date;

        computed.push(ComputedPhase {
            cycle_id: cycle.id,
            cycle_name: cycle.name.clone(),
            race_id: cycle.race_id,
            phase_type: phase.phase_type.clone(),
            duration_weeks: weeks,
            order: phase.order,
            start_date,
            end_date,
        });
    }

    Ok(computed)
}

/// Project several cycles independently.
///
/// A cycle that fails validation is reported in `rejected` and does not
/// affect the others. No ordering or overlap is enforced between cycles.
pub fn project_cycles(cycles: &[TrainingCycle]) -> PhaseProjection {
    let mut projection = PhaseProjection::default();

    for cycle in cycles {
        match project_cycle(cycle) {
            Ok(phases) => projection.phases.extend(phases),
            Err(err) => {
                warn!(cycle_id = %cycle.id, error = %err, "Skipping training cycle");
                projection.rejected.push(RejectedCycle {
                    cycle_id: cycle.id,
                    cycle_name: cycle.name.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    projection
}
