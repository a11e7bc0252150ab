//! Training Tracker Shared Library
//!
//! The temporal aggregation and scheduling core of the training tracker:
//! calendar arithmetic, the structured training log, training cycle phase
//! projection and current-phase lookup. Everything here is a pure function of
//! its inputs; the backend and WASM crates only move JSON in and out.

pub mod activity_log;
pub mod calendar;
pub mod current_phase;
pub mod cycle_draft;
pub mod errors;
pub mod models;
pub mod training_cycle;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use activity_log::{
    aggregate, aggregate_compact, ActivityLogAggregator, DayEntry, MonthEntry, StructuredLog,
    Totals, WeekEntry, YearEntry,
};
pub use calendar::{add_weeks, iso_week, week_start, TimezonePolicy};
pub use current_phase::{next_phase, resolve_current_phase, resolve_current_phase_at, CurrentPhaseInfo};
pub use cycle_draft::{CycleDraft, DraftAction, DraftPhase, DraftStep};
pub use errors::*;
pub use models::{ActivityRecord, PhaseDefinition, PhaseType, TrainingCycle};
pub use training_cycle::{project_cycle, project_cycles, ComputedPhase, PhaseProjection, RejectedCycle};
