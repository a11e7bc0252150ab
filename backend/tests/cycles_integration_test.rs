//! Integration tests for training cycle endpoints

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

fn marathon_block() -> Value {
    json!({
        "id": "aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa",
        "name": "Spring Marathon",
        "start_date": "2024-01-01",
        "phases": [
            {"phase_type": "build", "duration_weeks": 3, "order": 1},
            {"phase_type": "base", "duration_weeks": 4, "order": 0}
        ]
    })
}

#[tokio::test]
async fn test_project_phases_back_to_back() {
    let app = common::TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/v1/training-cycles/phases",
            &json!({"cycles": [marathon_block()]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let phases = body["phases"].as_array().unwrap();
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0]["phase_type"], "base");
    assert_eq!(phases[0]["start_date"], "2024-01-01");
    assert_eq!(phases[0]["end_date"], "2024-01-29");
    assert_eq!(phases[1]["phase_type"], "build");
    assert_eq!(phases[1]["start_date"], "2024-01-29");
    assert_eq!(phases[1]["end_date"], "2024-02-19");
    assert_eq!(phases[1]["cycle_name"], "Spring Marathon");
    assert!(body.get("rejected").is_none());
}

#[tokio::test]
async fn test_invalid_cycle_is_rejected_not_fatal() {
    let app = common::TestApp::new();
    let broken = json!({
        "id": "bbbbbbbb-bbbb-4bbb-8bbb-bbbbbbbbbbbb",
        "name": "Broken",
        "start_date": "2024-03-04",
        "phases": [{"phase_type": "peak", "duration_weeks": 0, "order": 0}]
    });

    let (status, body) = app
        .post_json(
            "/api/v1/training-cycles/phases",
            &json!({"cycles": [marathon_block(), broken]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phases"].as_array().unwrap().len(), 2);
    let rejected = body["rejected"].as_array().unwrap();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["cycle_name"], "Broken");
}

#[tokio::test]
async fn test_current_phase_mid_base() {
    let app = common::TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/v1/training-cycles/current",
            &json!({"cycles": [marathon_block()], "today": "2024-01-15"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["today"], "2024-01-15");
    assert_eq!(body["current"]["phase"]["phase_type"], "base");
    assert_eq!(body["current"]["week_number"], 3);
    assert_eq!(body["current"]["total_weeks"], 4);
    assert_eq!(body["next"]["phase_type"], "build");
}

#[tokio::test]
async fn test_current_phase_before_cycle_start() {
    let app = common::TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/v1/training-cycles/current",
            &json!({"cycles": [marathon_block()], "today": "2023-12-31"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["current"].is_null());
    assert_eq!(body["next"]["phase_type"], "base");
}

#[tokio::test]
async fn test_current_phase_defaults_today() {
    let app = common::TestApp::new();

    let (status, body) = app
        .post_json("/api/v1/training-cycles/current", &json!({"cycles": []}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["today"].is_string());
    assert!(body["current"].is_null());
    assert!(body["next"].is_null());
}
