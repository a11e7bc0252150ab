//! Current phase lookup
//!
//! Answers "which phase am I in today, and which week of it?" from a list of
//! projected phases, possibly merged from many cycles.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{days_between, TimezonePolicy};
use crate::training_cycle::ComputedPhase;

/// The phase active on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentPhaseInfo {
    pub phase: ComputedPhase,
    pub cycle_name: String,
    /// 1-based week inside the phase
    pub week_number: u32,
    pub total_weeks: u32,
    /// 0 on the phase's first day
    pub days_into_phase: u32,
    /// Days left including today
    pub days_remaining: u32,
}

/// Find the phase containing `today`.
///
/// Phases are scanned in the order given and the first whose `[start, end)`
/// interval contains `today` wins, so overlapping cycles resolve to whichever
/// the caller listed first. Returns `None` before, between or after cycles.
pub fn resolve_current_phase(phases: &[ComputedPhase], today: NaiveDate) -> Option<CurrentPhaseInfo> {
    let phase = phases.iter().find(|p| p.contains(today))?;

    let elapsed = u32::try_from(days_between(today, phase.start_date)).unwrap_or(0);
    let remaining = u32::try_from(days_between(phase.end_date, today)).unwrap_or(0);

    Some(CurrentPhaseInfo {
        phase: phase.clone(),
        cycle_name: phase.cycle_name.clone(),
        week_number: elapsed / 7 + 1,
        total_weeks: phase.duration_weeks,
        days_into_phase: elapsed,
        days_remaining: remaining,
    })
}

/// [`resolve_current_phase`] for an instant, using the policy to pick the day.
pub fn resolve_current_phase_at(
    phases: &[ComputedPhase],
    now: DateTime<Utc>,
    policy: TimezonePolicy,
) -> Option<CurrentPhaseInfo> {
    resolve_current_phase(phases, policy.calendar_date(now))
}

/// The earliest phase starting after `today` (first listed wins on ties).
pub fn next_phase(phases: &[ComputedPhase], today: NaiveDate) -> Option<&ComputedPhase> {
    phases
        .iter()
        .filter(|p| p.start_date > today)
        .fold(None, |best: Option<&ComputedPhase>, p| match best {
            Some(b) if b.start_date <= p.start_date => Some(b),
            _ => Some(p),
        })
}
