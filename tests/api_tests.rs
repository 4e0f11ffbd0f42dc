use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use debug_challenge::{
    bank::ProblemBank,
    build_router,
    clock::ManualClock,
    config::{GameSettings, Prompts},
    hints::LocalHints,
    seeds::seed_problems,
    AppState,
};

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
    bank: Arc<ProblemBank>,
}

/// App whose bank holds only `problem_id`, so every draw is known.
fn create_test_app(problem_id: &str) -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let problems = seed_problems().into_iter().filter(|p| p.id == problem_id).collect();
    let bank = Arc::new(ProblemBank::new(problems).expect("test bank"));
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()));
    let state = AppState::with_parts(
        bank.clone(),
        Arc::new(LocalHints::new(bank.clone())),
        clock.clone(),
        Prompts::default(),
        GameSettings { seed: Some(1), ..GameSettings::default() },
    );
    TestApp { router: build_router(Arc::new(state)), clock, bank }
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

async fn started_session(app: &TestApp) -> String {
    let (status, created) = call(&app.router, "POST", "/api/v1/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["phase"], "not_started");
    let id = created["sessionId"].as_str().unwrap().to_string();

    let (status, view) = call(&app.router, "POST", &format!("/api/v1/sessions/{}/start", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["phase"], "active");
    id
}

#[tokio::test]
async fn test_health_reports_bank_and_assistant() {
    let app = create_test_app("Binary Search");
    let (status, body) = call(&app.router, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["problems"], 1);
    assert_eq!(body["assistant"], "local");
}

#[tokio::test]
async fn test_unmodified_even_odd_code_is_rejected() {
    let app = create_test_app("Even-Odd Checker");
    let id = started_session(&app).await;

    let (_, view) = call(&app.router, "GET", &format!("/api/v1/sessions/{}", id), None).await;
    assert_eq!(view["problem"]["id"], "Even-Odd Checker");
    assert!(view.get("solution").is_none());
    let buggy = view["problem"]["buggyCode"].as_str().unwrap().to_string();
    assert_eq!(view["code"], buggy.as_str());

    let (status, result) = call(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{}/submit", id),
        Some(json!({ "code": buggy })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["status"], "mismatch");
    assert_eq!(result["correct"], false);
    assert_eq!(result["phase"], "active");
}

#[tokio::test]
async fn test_fibonacci_solution_solves_and_new_challenge_resets() {
    let app = create_test_app("Fibonacci Sequence");
    let id = started_session(&app).await;
    let solution = app.bank.get("Fibonacci Sequence").unwrap().solution.trim().to_string();

    let (_, hint) = call(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{}/hint", id),
        Some(json!({ "message": "what should I look at?" })),
    )
    .await;
    assert_eq!(hint["status"], "replied");
    assert_eq!(hint["tier"], 1);
    assert_eq!(hint["text"], "Hint 1: Check the loop condition");

    app.clock.advance(Duration::seconds(30));
    let (_, result) = call(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{}/submit", id),
        Some(json!({ "code": format!("\n\n{}\n   ", solution) })),
    )
    .await;
    assert_eq!(result["status"], "solved");
    assert_eq!(result["correct"], true);
    assert_eq!(result["phase"], "solved");

    let (_, tick) = call(&app.router, "GET", &format!("/api/v1/sessions/{}/tick", id), None).await;
    assert_eq!(tick["phase"], "solved");
    assert_eq!(tick["timeUp"], false);

    let (_, view) = call(&app.router, "POST", &format!("/api/v1/sessions/{}/start", id), None).await;
    assert_eq!(view["phase"], "active");
    assert_eq!(view["round"], 2);
    assert_eq!(view["attemptCount"], 0);
    assert_eq!(view["transcript"].as_array().unwrap().len(), 0);
    assert_eq!(view["remaining"], "03:00");
}

#[tokio::test]
async fn test_timer_counts_down_and_expires_once() {
    let app = create_test_app("List Reversal");
    let id = started_session(&app).await;
    let tick_uri = format!("/api/v1/sessions/{}/tick", id);

    app.clock.advance(Duration::milliseconds(61_500));
    let (_, first) = call(&app.router, "GET", &tick_uri, None).await;
    let (_, second) = call(&app.router, "GET", &tick_uri, None).await;
    assert_eq!(first, second);
    assert_eq!(first["remaining"], "01:58");
    assert_eq!(first["remainingSecs"], 118);

    app.clock.advance(Duration::seconds(120));
    let (_, expired) = call(&app.router, "GET", &tick_uri, None).await;
    assert_eq!(expired["timeUp"], true);
    assert_eq!(expired["phase"], "expired");

    let (_, after) = call(&app.router, "GET", &tick_uri, None).await;
    assert_eq!(after["timeUp"], false);
    assert_eq!(after["phase"], "expired");

    let solution = app.bank.get("List Reversal").unwrap().solution.clone();
    let (_, late) = call(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{}/submit", id),
        Some(json!({ "code": solution })),
    )
    .await;
    assert_eq!(late["status"], "not_active");
    assert_eq!(late["phase"], "expired");
}

#[tokio::test]
async fn test_fourth_hint_reveals_solution() {
    let app = create_test_app("Palindrome Check");
    let id = started_session(&app).await;
    let uri = format!("/api/v1/sessions/{}/hint", id);

    let mut tiers = vec![];
    let mut last = Value::Null;
    for _ in 0..4 {
        let (_, hint) = call(&app.router, "POST", &uri, Some(json!({ "message": "more please" }))).await;
        tiers.push(hint["tier"].as_u64().unwrap());
        last = hint;
    }
    assert_eq!(tiers, vec![1, 2, 3, 4]);
    assert!(last["text"].as_str().unwrap().contains("if char.isalnum()"));

    let (_, view) = call(&app.router, "GET", &format!("/api/v1/sessions/{}", id), None).await;
    assert_eq!(view["attemptCount"], 4);
    let transcript = view["transcript"].as_array().unwrap();
    assert_eq!(transcript.len(), 8);
    assert_eq!(transcript[0]["role"], "user");
    assert_eq!(transcript[1]["role"], "assistant");
}

#[tokio::test]
async fn test_unknown_and_deleted_sessions_return_not_found() {
    let app = create_test_app("Binary Search");
    let (status, body) = call(
        &app.router,
        "GET",
        "/api/v1/sessions/4c0b1a57-3d32-4c9d-9d1e-2f1c8f4b2a10",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("unknown session"));

    let id = started_session(&app).await;
    let (status, _) = call(&app.router, "DELETE", &format!("/api/v1/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app.router, "GET", &format!("/api/v1/sessions/{}/tick", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_hint_before_start_is_refused() {
    let app = create_test_app("Binary Search");
    let (_, created) = call(&app.router, "POST", "/api/v1/sessions", None).await;
    let id = created["sessionId"].as_str().unwrap();

    let (status, hint) = call(
        &app.router,
        "POST",
        &format!("/api/v1/sessions/{}/hint", id),
        Some(json!({ "message": "hello?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hint["status"], "not_active");
    assert_eq!(hint["phase"], "not_started");
}
