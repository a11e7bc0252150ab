//! Data models for the training tracker

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A completed activity as delivered by the data-fetching layer.
///
/// `start_time` is kept as the raw ISO-8601 string: deciding which calendar
/// day it belongs to depends on the timezone policy, and a malformed value
/// must be dropped by the aggregator rather than rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain_meters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form sport label from the source (e.g. "Run", "TrailRun")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
}

/// Kind of training block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseType {
    Base,
    Build,
    Peak,
    Taper,
    Recovery,
    Race,
    Custom(String),
}

impl fmt::Display for PhaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseType::Base => write!(f, "base"),
            PhaseType::Build => write!(f, "build"),
            PhaseType::Peak => write!(f, "peak"),
            PhaseType::Taper => write!(f, "taper"),
            PhaseType::Recovery => write!(f, "recovery"),
            PhaseType::Race => write!(f, "race"),
            PhaseType::Custom(name) => write!(f, "{}", name),
        }
    }
}

impl std::str::FromStr for PhaseType {
    type Err = std::convert::Infallible;

    /// Known names map to their variant; anything else becomes `Custom`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "base" => PhaseType::Base,
            "build" => PhaseType::Build,
            "peak" => PhaseType::Peak,
            "taper" => PhaseType::Taper,
            "recovery" => PhaseType::Recovery,
            "race" => PhaseType::Race,
            _ => PhaseType::Custom(s.trim().to_string()),
        })
    }
}

/// One phase of a training cycle, defined relative to its neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDefinition {
    pub phase_type: PhaseType,
    /// Length in weeks; must be positive to be projected
    pub duration_weeks: i32,
    /// Position within the cycle (ascending)
    pub order: i32,
}

/// A plan toward a race or goal: phases laid end to end from `start_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingCycle {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_id: Option<Uuid>,
    pub name: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub phases: Vec<PhaseDefinition>,
}

impl TrainingCycle {
    /// Sum of all phase durations, ignoring non-positive ones.
    pub fn total_weeks(&self) -> u32 {
        self.phases
            .iter()
            .map(|p| u32::try_from(p.duration_weeks).unwrap_or(0))
            .fold(0u32, u32::saturating_add)
    }

    /// Exclusive end date of the last phase.
    pub fn end_date(&self) -> NaiveDate {
        crate::calendar::add_weeks(self.start_date, i64::from(self.total_weeks()))
    }
}
