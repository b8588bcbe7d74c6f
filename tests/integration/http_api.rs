//! End-to-end tests driving the router in-process
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use habit_tracker_api::*;
use serde_json::{json, Value};
use tower::ServiceExt;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn state_on(date: NaiveDate) -> AppState {
    AppState::new(SqliteStorage::in_memory().unwrap(), Clock::Fixed(date))
}

/// Same store, different "today"
fn later(state: &AppState, date: NaiveDate) -> Router {
    let mut state = state.clone();
    state.clock = Clock::Fixed(date);
    router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn only_habit_id(app: &Router) -> String {
    let (status, habits) = send_json(app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let habits = habits.as_array().unwrap();
    assert_eq!(habits.len(), 1);
    habits[0]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_run_habit_walkthrough() {
    // Monday 2024-01-01
    let state = state_on(ymd(2024, 1, 1));
    let app = router(state.clone());

    let (status, body) = send(
        &app,
        Method::POST,
        "/habit",
        Some(json!({ "title": "Run", "weekDays": [1, 3, 5] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let id = only_habit_id(&app).await;

    // Monday 2024-01-08
    let app = later(&state, ymd(2024, 1, 8));
    let (status, day) = send_json(&app, Method::GET, "/day?date=2024-01-08", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["possibleHabit"][0]["title"], "Run");
    assert_eq!(day["possibleHabit"][0]["createdAt"], "2024-01-01T00:00:00Z");
    assert!(day.get("completedHabits").is_none());

    let toggle_uri = format!("/habit/{id}/toggle");
    let (status, body) = send(&app, Method::PATCH, &toggle_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let (_, day) = send_json(&app, Method::GET, "/day?date=2024-01-08", None).await;
    assert_eq!(day["completedHabits"], json!([id]));

    let (status, _) = send(&app, Method::PATCH, &toggle_uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, day) = send_json(&app, Method::GET, "/day?date=2024-01-08", None).await;
    assert_eq!(day["completedHabits"], json!([]));
}

#[tokio::test]
async fn test_day_query_respects_recurrence_and_creation() {
    let state = state_on(ymd(2024, 1, 3));
    let app = router(state);

    send(
        &app,
        Method::POST,
        "/habit",
        Some(json!({ "title": "Read", "weekDays": [1, 3] })),
    )
    .await;

    // Created Wednesday, so the Monday before has nothing
    let (_, day) = send_json(&app, Method::GET, "/day?date=2024-01-01", None).await;
    assert_eq!(day["possibleHabit"], json!([]));

    // Creation day counts, and a timestamp later that day works too
    let (_, day) = send_json(&app, Method::GET, "/day?date=2024-01-03T18:30:00Z", None).await;
    assert_eq!(day["possibleHabit"].as_array().unwrap().len(), 1);

    // Thursday isn't a recurrence day
    let (_, day) = send_json(&app, Method::GET, "/day?date=2024-01-04", None).await;
    assert_eq!(day["possibleHabit"], json!([]));

    // Epoch milliseconds for Monday 2024-01-08 12:00 UTC
    let (status, day) = send_json(&app, Method::GET, "/day?date=1704715200000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["possibleHabit"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_summary_endpoint() {
    let state = state_on(ymd(2024, 1, 1));
    let app = router(state.clone());

    send(&app, Method::POST, "/habit", Some(json!({ "title": "Run", "weekDays": [1, 3, 5] }))).await;
    send(&app, Method::POST, "/habit", Some(json!({ "title": "Stretch", "weekDays": [1] }))).await;
    let (_, habits) = send_json(&app, Method::GET, "/", None).await;
    let run_id = habits
        .as_array()
        .unwrap()
        .iter()
        .find(|h| h["title"] == "Run")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let app = later(&state, ymd(2024, 1, 8));
    send(&app, Method::PATCH, &format!("/habit/{run_id}/toggle"), None).await;

    let (status, summary) = send_json(&app, Method::GET, "/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = summary.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["date"], "2024-01-08T00:00:00Z");
    assert_eq!(rows[0]["completed"], json!(1.0));
    assert_eq!(rows[0]["amount"], json!(2.0));
    assert!(rows[0]["id"].is_string());
}

#[tokio::test]
async fn test_validation_errors() {
    let app = router(state_on(ymd(2024, 1, 1)));

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/habit",
        Some(json!({ "title": "Run", "weekDays": [1, 9] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation error");
    assert_eq!(body["issues"][0]["path"], "weekDays[1]");

    let (status, body) = send_json(&app, Method::POST, "/habit", Some(json!({ "weekDays": "1" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["issues"].as_array().unwrap().len(), 2);

    let (status, _) = send_json(&app, Method::GET, "/day", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(&app, Method::GET, "/day?date=not-a-date", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["issues"][0]["path"], "date");

    let (status, body) = send_json(&app, Method::PATCH, "/habit/123/toggle", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["issues"][0]["path"], "id");

    // Nothing was stored along the way
    let (_, habits) = send_json(&app, Method::GET, "/", None).await;
    assert_eq!(habits, json!([]));
}

#[tokio::test]
async fn test_toggle_unknown_habit_is_not_found() {
    let app = router(state_on(ymd(2024, 1, 8)));
    let uri = format!("/habit/{}/toggle", HabitId::new());

    let (status, body) = send_json(&app, Method::PATCH, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("Habit not found"));

    let (_, summary) = send_json(&app, Method::GET, "/summary", None).await;
    assert_eq!(summary, json!([]));
}

#[tokio::test]
async fn test_cors_preflight_allows_patch() {
    let app = router(state_on(ymd(2024, 1, 8)));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/habit/00000000-0000-0000-0000-000000000000/toggle")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap();
    assert!(methods.contains("PATCH"));
}
