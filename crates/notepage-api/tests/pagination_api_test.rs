//! HTTP-level tests for the pagination endpoints, driven through the router.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use notepage_api::{build_router, AppState, ServerConfig};
use notepage_core::{encode_cursor, InMemoryNoteRepository};

fn test_config() -> ServerConfig {
    ServerConfig {
        in_memory: true,
        ..ServerConfig::default()
    }
}

fn app(repo: InMemoryNoteRepository) -> Router {
    build_router(AppState::new(Arc::new(repo)), &test_config())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).method("GET").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn notes_of(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["note"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// CURSOR
// =============================================================================

#[tokio::test]
async fn test_cursor_defaults() {
    let (status, body) = get(app(InMemoryNoteRepository::with_demo_data(5)), "/cursor").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
    assert_eq!(body["metadata"]["limit"], 30);
    assert_eq!(body["metadata"]["has_more"], false);
    assert!(body["metadata"]["next_cursor"].is_null());
}

#[tokio::test]
async fn test_cursor_item_shape() {
    let (_, body) = get(app(InMemoryNoteRepository::with_demo_data(1)), "/cursor").await;
    let item = &body["items"][0];

    assert!(item["id"].as_str().unwrap().parse::<Uuid>().is_ok());
    assert!(item["user_id"].is_string());
    assert_eq!(item["note"], "Demo note #1");
    assert_eq!(item["note_date"], "2025-01-01");
}

#[tokio::test]
async fn test_cursor_walk_over_five_notes() {
    let repo = InMemoryNoteRepository::with_demo_data(5);

    let (_, first) = get(app(repo.clone()), "/cursor?limit=2").await;
    assert_eq!(notes_of(&first), vec!["Demo note #5", "Demo note #4"]);
    assert_eq!(first["metadata"]["has_more"], true);
    let token = first["metadata"]["next_cursor"].as_str().unwrap().to_string();

    let (_, second) = get(app(repo.clone()), &format!("/cursor?limit=2&cursor={token}")).await;
    assert_eq!(notes_of(&second), vec!["Demo note #3", "Demo note #2"]);
    let token = second["metadata"]["next_cursor"].as_str().unwrap().to_string();

    let (_, third) = get(app(repo), &format!("/cursor?limit=2&cursor={token}")).await;
    assert_eq!(notes_of(&third), vec!["Demo note #1"]);
    assert_eq!(third["metadata"]["has_more"], false);
    assert!(third["metadata"]["next_cursor"].is_null());
}

#[tokio::test]
async fn test_cursor_limit_bounds() {
    let repo = InMemoryNoteRepository::with_demo_data(3);

    let (status, body) = get(app(repo.clone()), "/cursor?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Limit must be greater than 0");

    let (status, body) = get(app(repo.clone()), "/cursor?limit=101").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Limit must be less than or equal to 100");

    let (status, body) = get(app(repo.clone()), "/cursor?limit=100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);

    assert_eq!(repo.query_count(), 1);
}

#[tokio::test]
async fn test_cursor_non_integer_limit_rejected() {
    let (status, _) = get(app(InMemoryNoteRepository::new()), "/cursor?limit=ten").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cursor_unsupported_version() {
    let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let token = encode_cursor(date, Uuid::nil(), 2).unwrap();

    let (status, body) = get(
        app(InMemoryNoteRepository::with_demo_data(3)),
        &format!("/cursor?cursor={token}"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unsupported cursor version: 2. Expected version 1.");
}

#[tokio::test]
async fn test_cursor_malformed_token_restarts_from_newest() {
    let repo = InMemoryNoteRepository::with_demo_data(4);

    let (_, fresh) = get(app(repo.clone()), "/cursor?limit=2").await;
    let (status, garbled) = get(app(repo), "/cursor?limit=2&cursor=garbage").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(notes_of(&garbled), notes_of(&fresh));
}

#[tokio::test]
async fn test_cursor_empty_store() {
    let (status, body) = get(app(InMemoryNoteRepository::new()), "/cursor?limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(body["metadata"]["has_more"], false);
}

// =============================================================================
// OFFSET
// =============================================================================

#[tokio::test]
async fn test_offset_middle_page() {
    let (status, body) = get(
        app(InMemoryNoteRepository::with_demo_data(5)),
        "/offset?page=2&page_size=2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(notes_of(&body), vec!["Demo note #3", "Demo note #2"]);
    let meta = &body["metadata"];
    assert_eq!(meta["page"], 2);
    assert_eq!(meta["page_size"], 2);
    assert_eq!(meta["total_count"], 5);
    assert_eq!(meta["total_pages"], 3);
    assert_eq!(meta["has_previous_page"], true);
    assert_eq!(meta["has_next_page"], true);
}

#[tokio::test]
async fn test_offset_defaults() {
    let (_, body) = get(app(InMemoryNoteRepository::with_demo_data(5)), "/offset").await;
    let meta = &body["metadata"];
    assert_eq!(meta["page"], 1);
    assert_eq!(meta["page_size"], 30);
    assert_eq!(meta["total_pages"], 1);
    assert_eq!(meta["has_previous_page"], false);
    assert_eq!(meta["has_next_page"], false);
}

#[tokio::test]
async fn test_offset_validation_messages() {
    let repo = InMemoryNoteRepository::with_demo_data(2);

    let (status, body) = get(app(repo.clone()), "/offset?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Page must be greater than 0");

    let (_, body) = get(app(repo.clone()), "/offset?page_size=0").await;
    assert_eq!(body["error"], "Page size must be greater than 0");

    let (_, body) = get(app(repo.clone()), "/offset?page_size=101").await;
    assert_eq!(body["error"], "Page size must be less than or equal to 100");

    assert_eq!(repo.query_count(), 0);
}

#[tokio::test]
async fn test_offset_past_end_is_empty() {
    let (status, body) = get(
        app(InMemoryNoteRepository::with_demo_data(3)),
        "/offset?page=7&page_size=2",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(body["metadata"]["has_next_page"], false);
    assert_eq!(body["metadata"]["has_previous_page"], true);
}

// =============================================================================
// FAILURES
// =============================================================================

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let repo = InMemoryNoteRepository::with_demo_data(3).with_failure("connection refused");

    for uri in ["/cursor", "/offset", "/noteitems"] {
        let (status, body) = get(app(repo.clone()), uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Database error:"));
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_store_times_out() {
    let repo = InMemoryNoteRepository::with_demo_data(3).with_latency(Duration::from_secs(60));
    let config = ServerConfig {
        request_timeout: Duration::from_secs(1),
        ..test_config()
    };
    let app = build_router(AppState::new(Arc::new(repo)), &config);

    let (status, _) = get(app, "/cursor").await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
}
