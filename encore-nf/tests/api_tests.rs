//! HTTP API tests over the full router
//!
//! Uses `tower::ServiceExt::oneshot` against an in-memory database; no
//! network calls (catalog-backed endpoints are exercised elsewhere).

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use encore_nf::AppState;

async fn test_app() -> axum::Router {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    encore_common::db::create_schema(&pool).await.unwrap();

    let state = AppState::new(pool, encore_common::Config::default()).unwrap();
    encore_nf::build_router(state)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app().await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "encore-nf");
}

#[tokio::test]
async fn empty_artist_list_answers_204() {
    let app = test_app().await;

    let response = app
        .oneshot(Request::get("/artist").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn add_then_list_artists() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/artist",
            json!({"artist_id": "A1", "artist_name": "Anita Baker"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["artist_id"], "A1");
    assert_eq!(body["name"], "Anita Baker");

    let response = app
        .oneshot(Request::get("/artist").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["artists"].as_array().unwrap().len(), 1);
    assert_eq!(body["artists"][0]["artist_id"], "A1");
}

#[tokio::test]
async fn add_rejects_missing_fields() {
    let app = test_app().await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/artist",
            json!({"artist_id": "", "artist_name": ""}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn remove_unknown_artist_answers_404() {
    let app = test_app().await;

    let response = app
        .oneshot(json_request(
            Method::DELETE,
            "/artist",
            json!({"artist_id": "missing", "artist_name": "Nobody"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn remove_existing_artist_then_list_is_empty() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/artist",
            json!({"artist_id": "A1", "artist_name": "Sade"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::DELETE,
            "/artist",
            json!({"artist_id": "A1", "artist_name": "Sade"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/artist").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn search_without_name_answers_400() {
    let app = test_app().await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/artist/id",
            json!({"artist_name": ""}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
