//! Session-backed flows: register, login, study tests, logout.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use studyquest::config::Config;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.server.session_secret = Some("integration-test-secret".to_string());
    config.observability.metrics_enabled = false;

    let state = studyquest::api::create_app_state_from_config(config, None).await;
    studyquest::api::router(state)
}

struct TestResponse {
    status: StatusCode,
    cookie: Option<String>,
    body: Value,
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    // Keep only the `name=value` pair of the session cookie.
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        cookie,
        body,
    }
}

async fn register(app: &Router, username: &str, password: &str) -> TestResponse {
    send(
        app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "username": username,
            "password": password,
            "firstName": "Alice",
            "lastName": "Liddell",
        })),
    )
    .await
}

fn algebra_test_body() -> Value {
    json!({
        "title": "Algebra midterm",
        "subject_id": 1,
        "grade_id": 1,
        "textbook_id": 1,
        "pages_from": 10,
        "pages_to": 60,
        "question_count": 20,
        "exam_date": "2999-01-15",
    })
}

#[tokio::test]
async fn test_register_hides_password() {
    let app = spawn_app().await;

    let response = register(&app, "alice", "pw123").await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.cookie.is_some());

    let body = response.body;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["firstName"], "Alice");
    assert_eq!(body["lastName"], "Liddell");
    assert_eq!(body["streak"], 0);
    assert_eq!(body["xp"], 0);
    assert_eq!(body["level"], 1);
    assert!(body.get("password").is_none());
    assert!(body.get("credential").is_none());
}

#[tokio::test]
async fn test_duplicate_username() {
    let app = spawn_app().await;

    assert_eq!(register(&app, "alice", "pw123").await.status, StatusCode::CREATED);

    let response = register(&app, "alice", "another").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({ "message": "Username already exists" }));
}

#[tokio::test]
async fn test_login() {
    let app = spawn_app().await;
    register(&app, "alice", "pw123").await;

    let response = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "alice", "password": "wrongpw" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, json!({ "message": "Invalid credentials" }));

    let response = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "nobody", "password": "pw123" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "alice", "password": "pw123" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "alice");
    assert!(response.body.get("password").is_none());

    let cookie = response.cookie.expect("login should set a session cookie");
    let me = send(&app, "GET", "/api/user", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "alice");
}

#[tokio::test]
async fn test_login_with_padded_username() {
    let app = spawn_app().await;

    let response = register(&app, " alice ", "pw123").await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["username"], "alice");

    let response = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": " alice ", "password": "pw123" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "alice");
}

#[tokio::test]
async fn test_bad_test_id_is_json_error() {
    let app = spawn_app().await;
    let cookie = register(&app, "alice", "pw123").await.cookie.unwrap();

    let response = send(&app, "GET", "/api/tests/abc", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["message"].is_string());

    let response = send(
        &app,
        "PATCH",
        "/api/tests/abc",
        Some(&cookie),
        Some(json!({ "is_completed": true })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["message"].is_string());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());

    let response = send(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({ "username": "alice" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_study_test_lifecycle() {
    let app = spawn_app().await;
    let cookie = register(&app, "alice", "pw123").await.cookie.unwrap();

    let response = send(&app, "GET", "/api/tests", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));

    let created = send(&app, "POST", "/api/tests", Some(&cookie), Some(algebra_test_body())).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["title"], "Algebra midterm");
    assert_eq!(created.body["is_completed"], false);
    assert_eq!(created.body["score"], Value::Null);
    assert_eq!(created.body["scheduled_reminders"], true);
    let test_id = created.body["id"].as_i64().unwrap();

    let upcoming = send(&app, "GET", "/api/tests/upcoming", Some(&cookie), None).await;
    assert_eq!(upcoming.body.as_array().unwrap().len(), 1);

    let completed = send(
        &app,
        "PATCH",
        &format!("/api/tests/{test_id}"),
        Some(&cookie),
        Some(json!({ "is_completed": true, "score": 85 })),
    )
    .await;
    assert_eq!(completed.status, StatusCode::OK);
    assert_eq!(completed.body["is_completed"], true);
    assert_eq!(completed.body["score"], 85);

    let me = send(&app, "GET", "/api/user", Some(&cookie), None).await;
    assert_eq!(me.body["xp"], 85);
    assert_eq!(me.body["level"], 1);

    let upcoming = send(&app, "GET", "/api/tests/upcoming", Some(&cookie), None).await;
    assert_eq!(upcoming.body, json!([]));

    let invalid = send(
        &app,
        "PATCH",
        &format!("/api/tests/{test_id}"),
        Some(&cookie),
        Some(json!({ "score": 150 })),
    )
    .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tests_are_private_to_owner() {
    let app = spawn_app().await;
    let alice = register(&app, "alice", "pw123").await.cookie.unwrap();
    let bob = register(&app, "bob", "hunter2").await.cookie.unwrap();

    let created = send(&app, "POST", "/api/tests", Some(&alice), Some(algebra_test_body())).await;
    let test_id = created.body["id"].as_i64().unwrap();

    let response = send(&app, "GET", "/api/tests", Some(&bob), None).await;
    assert_eq!(response.body, json!([]));

    let response = send(&app, "GET", &format!("/api/tests/{test_id}"), Some(&bob), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body, json!({ "message": "Forbidden" }));

    let response = send(&app, "GET", "/api/tests/999", Some(&bob), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({ "message": "Test not found" }));
}

#[tokio::test]
async fn test_create_test_validation() {
    let app = spawn_app().await;
    let cookie = register(&app, "alice", "pw123").await.cookie.unwrap();

    let mut body = algebra_test_body();
    body["textbook_id"] = json!(404);
    let response = send(&app, "POST", "/api/tests", Some(&cookie), Some(body)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Unknown textbook: 404");

    let mut body = algebra_test_body();
    body["title"] = json!("");
    let response = send(&app, "POST", "/api/tests", Some(&cookie), Some(body)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_streak_and_leaderboard() {
    let app = spawn_app().await;
    let cookie = register(&app, "alice", "pw123").await.cookie.unwrap();

    let response = send(&app, "POST", "/api/streak", Some(&cookie), Some(json!({ "streak": 5 }))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["streak"], 5);

    let response = send(&app, "POST", "/api/streak", Some(&cookie), Some(json!({ "streak": -2 }))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let board = send(&app, "GET", "/api/leaderboard", None, None).await;
    assert_eq!(board.status, StatusCode::OK);
    assert_eq!(board.body[0]["username"], "alice");
    assert_eq!(board.body[0]["rank"], 1);
    assert_eq!(board.body[0]["streak"], 5);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = spawn_app().await;
    let cookie = register(&app, "alice", "pw123").await.cookie.unwrap();

    assert_eq!(
        send(&app, "GET", "/api/tests", Some(&cookie), None).await.status,
        StatusCode::OK
    );

    let response = send(&app, "POST", "/api/logout", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "message": "Logged out" }));

    let response = send(&app, "GET", "/api/tests", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
