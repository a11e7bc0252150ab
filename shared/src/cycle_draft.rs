//! Training cycle draft
//!
//! State of the multi-step "new training cycle" flow. The draft is a plain
//! value: [`CycleDraft::apply`] returns the next state and leaves the current
//! one untouched, so the caller owns the state and can keep history, undo, or
//! replay actions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CoreError, CoreResult};
use crate::models::{PhaseDefinition, PhaseType, TrainingCycle};
use crate::training_cycle::{project_cycle, ComputedPhase};
use crate::validation::{validate_cycle_name, validate_phase_duration};

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStep {
    #[default]
    Details,
    Phases,
    Review,
}

impl DraftStep {
    fn next(self) -> Self {
        match self {
            DraftStep::Details => DraftStep::Phases,
            DraftStep::Phases | DraftStep::Review => DraftStep::Review,
        }
    }

    fn previous(self) -> Self {
        match self {
            DraftStep::Details | DraftStep::Phases => DraftStep::Details,
            DraftStep::Review => DraftStep::Phases,
        }
    }
}

/// A phase as entered; its position in the list is its order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPhase {
    pub phase_type: PhaseType,
    pub duration_weeks: i32,
}

/// User intent fed to [`CycleDraft::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DraftAction {
    SetName { name: String },
    SetRace { race_id: Option<Uuid> },
    SetStartDate { start_date: NaiveDate },
    AddPhase { phase_type: PhaseType, duration_weeks: i32 },
    RemovePhase { index: usize },
    MovePhase { from: usize, to: usize },
    SetPhaseDuration { index: usize, duration_weeks: i32 },
    Next,
    Back,
    Reset,
}

/// In-progress training cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CycleDraft {
    pub step: DraftStep,
    pub name: String,
    pub race_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub phases: Vec<DraftPhase>,
    /// Problems found by the last `Next`; cleared by any other action
    pub errors: Vec<String>,
}

impl CycleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a draft from an existing cycle for editing.
    pub fn from_cycle(cycle: &TrainingCycle) -> Self {
        let mut phases: Vec<&PhaseDefinition> = cycle.phases.iter().collect();
        phases.sort_by_key(|p| p.order);

        Self {
            step: DraftStep::Details,
            name: cycle.name.clone(),
            race_id: cycle.race_id,
            start_date: Some(cycle.start_date),
            phases: phases
                .into_iter()
                .map(|p| DraftPhase {
                    phase_type: p.phase_type.clone(),
                    duration_weeks: p.duration_weeks,
                })
                .collect(),
            errors: Vec::new(),
        }
    }

    /// Next state after `action`. Out-of-range indices are ignored.
    pub fn apply(&self, action: DraftAction) -> CycleDraft {
        let mut next = self.clone();
        next.errors.clear();

        match action {
            DraftAction::SetName { name } => next.name = name,
            DraftAction::SetRace { race_id } => next.race_id = race_id,
            DraftAction::SetStartDate { start_date } => next.start_date = Some(start_date),
            DraftAction::AddPhase {
                phase_type,
                duration_weeks,
            } => next.phases.push(DraftPhase {
                phase_type,
                duration_weeks,
            }),
            DraftAction::RemovePhase { index } => {
                if index < next.phases.len() {
                    next.phases.remove(index);
                }
            }
            DraftAction::MovePhase { from, to } => {
                if from < next.phases.len() && to < next.phases.len() {
                    let phase = next.phases.remove(from);
                    next.phases.insert(to, phase);
                }
            }
            DraftAction::SetPhaseDuration {
                index,
                duration_weeks,
            } => {
                if let Some(phase) = next.phases.get_mut(index) {
                    phase.duration_weeks = duration_weeks;
                }
            }
            DraftAction::Next => {
                let errors = self.step_errors(self.step);
                if errors.is_empty() {
                    next.step = self.step.next();
                } else {
                    next.errors = errors;
                }
            }
            DraftAction::Back => next.step = self.step.previous(),
            DraftAction::Reset => return CycleDraft::default(),
        }

        next
    }

    /// Fold a sequence of actions over this draft.
    pub fn apply_all<I>(&self, actions: I) -> CycleDraft
    where
        I: IntoIterator<Item = DraftAction>,
    {
        actions
            .into_iter()
            .fold(self.clone(), |draft, action| draft.apply(action))
    }

    /// Total planned length in weeks, counting only valid durations.
    pub fn total_weeks(&self) -> u32 {
        self.phases
            .iter()
            .filter_map(|p| validate_phase_duration(p.duration_weeks).ok())
            .fold(0u32, u32::saturating_add)
    }

    /// Dated phases as they would be saved.
    pub fn preview(&self) -> CoreResult<Vec<ComputedPhase>> {
        project_cycle(&self.to_cycle(Uuid::nil())?)
    }

    /// Validate the whole draft and turn it into a cycle with the given id.
    pub fn finish(&self, id: Uuid) -> CoreResult<TrainingCycle> {
        let mut errors = self.step_errors(DraftStep::Details);
        errors.extend(self.step_errors(DraftStep::Phases));
        if !errors.is_empty() {
            return Err(CoreError::Validation(errors.join("; ")));
        }

        let mut cycle = self.to_cycle(id)?;
        cycle.name = cycle.name.trim().to_string();
        Ok(cycle)
    }

    fn to_cycle(&self, id: Uuid) -> CoreResult<TrainingCycle> {
        let start_date = self
            .start_date
            .ok_or_else(|| CoreError::Validation("Start date is required".to_string()))?;

        Ok(TrainingCycle {
            id,
            race_id: self.race_id,
            name: self.name.clone(),
            start_date,
            phases: self
                .phases
                .iter()
                .enumerate()
                .map(|(i, p)| PhaseDefinition {
                    phase_type: p.phase_type.clone(),
                    duration_weeks: p.duration_weeks,
                    order: i32::try_from(i).unwrap_or(i32::MAX),
                })
                .collect(),
        })
    }

    fn step_errors(&self, step: DraftStep) -> Vec<String> {
        let mut errors = Vec::new();
        match step {
            DraftStep::Details => {
                if let Err(msg) = validate_cycle_name(&self.name) {
                    errors.push(msg);
                }
                if self.start_date.is_none() {
                    errors.push("Start date is required".to_string());
                }
            }
            DraftStep::Phases => {
                if self.phases.is_empty() {
                    errors.push("Add at least one phase".to_string());
                }
                for (i, phase) in self.phases.iter().enumerate() {
                    if let Err(msg) = validate_phase_duration(phase.duration_weeks) {
                        errors.push(format!("Phase {} ({}): {}", i + 1, phase.phase_type, msg));
                    }
                }
            }
            DraftStep::Review => {}
        }
        errors
    }
}
