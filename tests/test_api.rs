mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use cohort::infrastructure::stores::memory::InMemoryEmbeddingStore;
use cohort::presentation::{create_router, AppState};
use common::random_embeddings;

fn app(users: usize) -> (Router, Arc<InMemoryEmbeddingStore>) {
    let (cohort, store) = common::setup(random_embeddings(users, 4, 10));
    (create_router(AppState::new(cohort)), store)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_root_endpoint() {
    let (app, _) = app(3);
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User grouping API is running");
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, store) = app(3);
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "user-groups-api");
    assert!(body["timestamp"].is_string());
    // Health never touches the store.
    assert_eq!(store.fetch_count(), 0);
}

#[tokio::test]
async fn test_users_endpoint() {
    let (app, _) = app(5);
    let response = app.oneshot(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total_users"], 5);
    assert_eq!(body["user_ids"], json!(["u000", "u001", "u002", "u003", "u004"]));
}

#[tokio::test]
async fn test_refresh_cache_endpoint() {
    let (app, store) = app(3);
    let response = app.oneshot(get("/api/refresh-cache")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Cache refreshed successfully");
    assert_eq!(store.fetch_count(), 1);
}

#[tokio::test]
async fn test_refresh_cache_failure_is_server_error() {
    let (app, store) = app(3);
    store.set_failing(true);
    let response = app.oneshot(get("/api/refresh-cache")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to load user embeddings"));
}

#[tokio::test]
async fn test_create_groups_endpoint() {
    let (app, _) = app(7);
    let response = app
        .oneshot(post_json(
            "/api/groups",
            json!({"group_size": 3, "strategy": "greedy", "seed": 5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total_users"], 7);
    assert_eq!(body["strategy_used"], "greedy");
    assert_eq!(body["seed"], 5);
    let groups = body["groups"].as_array().unwrap();
    assert_eq!(body["num_groups"], groups.len());
    let members: usize = groups.iter().map(|g| g.as_array().unwrap().len()).sum();
    assert_eq!(members, 7);
    assert!(body["execution_time_ms"].as_f64().unwrap() >= 0.0);
    assert!(body["request_time"].is_string());

    let sizes = body["group_sizes"].as_object().unwrap();
    let counted: u64 = sizes
        .iter()
        .map(|(size, count)| size.parse::<u64>().unwrap() * count.as_u64().unwrap())
        .sum();
    assert_eq!(counted, 7);
}

#[tokio::test]
async fn test_create_groups_defaults() {
    let (app, _) = app(9);
    let response = app.oneshot(post_json("/api/groups", json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["strategy_used"], "maximal_cohesion");
    assert_eq!(body["total_users"], 9);
}

#[tokio::test]
async fn test_create_groups_accepts_numeric_user_ids() {
    let map = common::embeddings(&[
        ("1", &[1.0, 0.0]),
        ("2", &[0.9, 0.1]),
        ("3", &[0.0, 1.0]),
        ("4", &[0.1, 0.9]),
    ]);
    let (cohort, _) = common::setup(map);
    let app = create_router(AppState::new(cohort));
    let response = app
        .oneshot(post_json(
            "/api/groups",
            json!({"group_size": 2, "strategy": "greedy", "user_ids": [1, "2", 3, 4]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["groups"], json!([["1", "2"], ["3", "4"]]));
}

#[tokio::test]
async fn test_invalid_group_size_is_bad_request() {
    let (app, _) = app(5);
    let response = app
        .oneshot(post_json("/api/groups", json!({"group_size": 1})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_invalid_strategy_is_bad_request() {
    let (app, _) = app(5);
    let response = app
        .oneshot(post_json("/api/groups", json!({"strategy": "random"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid strategy: random"));
}

#[tokio::test]
async fn test_uppercase_strategy_is_bad_request() {
    let (app, store) = app(5);
    let response = app
        .oneshot(post_json("/api/groups", json!({"group_size": 3, "strategy": "GREEDY"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid strategy: GREEDY"));
    assert_eq!(store.fetch_count(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (app, _) = app(5);
    let request = Request::builder()
        .method("POST")
        .uri("/api/groups")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_users_is_not_found() {
    let (app, _) = app(5);
    let response = app
        .oneshot(post_json("/api/groups", json!({"user_ids": ["ghost"]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "None of the requested users have embeddings"
    );
}

#[tokio::test]
async fn test_store_failure_is_server_error() {
    let (app, store) = app(5);
    store.set_failing(true);
    let response = app.oneshot(post_json("/api/groups", json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_pairs_endpoint() {
    let (app, _) = app(6);
    let response = app.oneshot(get("/api/pairs?top_k=3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let pairs = body["pairs"].as_array().unwrap();
    assert_eq!(pairs.len(), 3);
    let first = pairs[0]["similarity"].as_f64().unwrap();
    let last = pairs[2]["similarity"].as_f64().unwrap();
    assert!(first >= last);
}

#[tokio::test]
async fn test_pairs_zero_top_k_is_bad_request() {
    let (app, _) = app(6);
    let response = app.oneshot(get("/api/pairs?top_k=0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (app, _) = app(2);
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "test-request-123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "test-request-123"
    );
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let (app, _) = app(2);
    let response = app.oneshot(get("/health")).await.unwrap();
    let id = response.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(id.len(), 36);
}
