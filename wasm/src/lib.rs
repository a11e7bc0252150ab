//! Training Tracker WASM Module
//!
//! WebAssembly bindings so the browser can build training logs and place
//! training cycles locally. Every binding takes and returns JSON using the
//! same request and response bodies as the HTTP API.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use training_tracker_shared::types::{
    CurrentPhaseRequest, CurrentPhaseResponse, TrainingCyclesRequest, TrainingLogRequest,
};
use training_tracker_shared::{
    next_phase, project_cycles, resolve_current_phase, ActivityLogAggregator, CycleDraft,
    DraftAction, TimezonePolicy,
};
use validator::Validate;
use wasm_bindgen::prelude::*;

/// Build a structured training log from a `TrainingLogRequest` body
#[wasm_bindgen]
pub fn build_training_log(request_json: &str) -> Result<String, JsError> {
    build_training_log_json(request_json).map_err(|e| JsError::new(&e))
}

/// Place training cycle phases on the calendar
#[wasm_bindgen]
pub fn project_phases(request_json: &str) -> Result<String, JsError> {
    project_phases_json(request_json).map_err(|e| JsError::new(&e))
}

/// Active and upcoming phase; `today` defaults to the current UTC date
#[wasm_bindgen]
pub fn current_phase(request_json: &str) -> Result<String, JsError> {
    current_phase_json(request_json).map_err(|e| JsError::new(&e))
}

/// Apply one wizard action to a cycle draft and return the next draft
#[wasm_bindgen]
pub fn apply_draft_action(draft_json: &str, action_json: &str) -> Result<String, JsError> {
    apply_draft_action_json(draft_json, action_json).map_err(|e| JsError::new(&e))
}

fn parse<T: DeserializeOwned>(json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid JSON: {}", e))
}

fn render<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn build_training_log_json(request_json: &str) -> Result<String, String> {
    let req: TrainingLogRequest = parse(request_json)?;
    req.validate().map_err(|e| e.to_string())?;

    let policy = req
        .timezone_policy(TimezonePolicy::UTC)
        .map_err(|e| e.to_string())?;
    let aggregator = ActivityLogAggregator::new(policy);

    let log = if req.compact.unwrap_or(true) {
        aggregator.aggregate_compact(&req.activities, req.min_date, req.max_date)
    } else {
        aggregator.aggregate(&req.activities, req.min_date, req.max_date)
    }
    .map_err(|e| e.to_string())?;

    render(&log)
}

fn project_phases_json(request_json: &str) -> Result<String, String> {
    let req: TrainingCyclesRequest = parse(request_json)?;
    req.validate().map_err(|e| e.to_string())?;

    render(&project_cycles(&req.cycles))
}

fn current_phase_json(request_json: &str) -> Result<String, String> {
    let req: CurrentPhaseRequest = parse(request_json)?;
    req.validate().map_err(|e| e.to_string())?;

    let today = req
        .today
        .unwrap_or_else(|| TimezonePolicy::UTC.calendar_date(Utc::now()));
    let projection = project_cycles(&req.cycles);

    render(&CurrentPhaseResponse {
        today,
        current: resolve_current_phase(&projection.phases, today),
        next: next_phase(&projection.phases, today).cloned(),
    })
}

fn apply_draft_action_json(draft_json: &str, action_json: &str) -> Result<String, String> {
    let draft: CycleDraft = if draft_json.trim().is_empty() {
        CycleDraft::new()
    } else {
        parse(draft_json)?
    };
    let action: DraftAction = parse(action_json)?;

    render(&draft.apply(action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn call(f: fn(&str) -> Result<String, String>, body: Value) -> Value {
        serde_json::from_str(&f(&body.to_string()).unwrap()).unwrap()
    }

    #[test]
    fn test_build_training_log_compacts_empty_window() {
        let log = call(
            build_training_log_json,
            json!({"activities": [], "min_date": "2024-06-10", "max_date": "2024-06-10"}),
        );
        assert_eq!(log["years"][0]["year"], 2024);
        assert!(log["years"][0]["months"].is_null());
    }

    #[test]
    fn test_build_training_log_rejects_inverted_window() {
        let body = json!({"activities": [], "min_date": "2024-06-16", "max_date": "2024-06-10"});
        let err = build_training_log_json(&body.to_string()).unwrap_err();
        assert!(err.contains("min_date"));
    }

    #[test]
    fn test_build_training_log_rejects_oversized_window() {
        let body = json!({"activities": [], "min_date": "0001-01-01", "max_date": "9999-12-31"});
        let err = build_training_log_json(&body.to_string()).unwrap_err();
        assert!(err.contains("cannot exceed"));
    }

    #[test]
    fn test_project_phases() {
        let projection = call(
            project_phases_json,
            json!({"cycles": [{
                "id": "aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa",
                "name": "Block",
                "start_date": "2024-01-01",
                "phases": [
                    {"phase_type": "base", "duration_weeks": 4, "order": 0},
                    {"phase_type": "build", "duration_weeks": 3, "order": 1}
                ]
            }]}),
        );
        assert_eq!(projection["phases"][1]["start_date"], "2024-01-29");
        assert_eq!(projection["phases"][1]["end_date"], "2024-02-19");
    }

    #[test]
    fn test_current_phase_with_explicit_today() {
        let response = call(
            current_phase_json,
            json!({
                "cycles": [{
                    "id": "aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa",
                    "name": "Block",
                    "start_date": "2024-01-01",
                    "phases": [{"phase_type": "base", "duration_weeks": 4, "order": 0}]
                }],
                "today": "2024-01-15"
            }),
        );
        assert_eq!(response["current"]["week_number"], 3);
        assert!(response["next"].is_null());
    }

    #[test]
    fn test_apply_draft_action_from_empty_draft() {
        let next = apply_draft_action_json("", r#"{"type":"set_name","name":"Autumn 10k"}"#).unwrap();
        let draft: CycleDraft = serde_json::from_str(&next).unwrap();
        assert_eq!(draft.name, "Autumn 10k");
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = project_phases_json("{not json").unwrap_err();
        assert!(err.starts_with("Invalid JSON"));
    }
}
