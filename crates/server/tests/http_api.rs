//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use std::fs;
use std::path::Path;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use schema_server::{router, AppState};
use serde_json::{json, Value};
use tempfile::tempdir;
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::default())
}

fn write_pair(dir: &Path, seq: u32, name: &str, ref_key: &str, back_ref: Option<&str>) {
    for direction in ["up", "down"] {
        let mut header = format!("-- ref: {ref_key}\n");
        if let Some(back) = back_ref {
            header.push_str(&format!("-- backref: {back}\n"));
        }
        header.push_str(&format!("-- direction: {direction}\n\nSELECT 1;\n"));
        fs::write(dir.join(format!("{seq}-{name}-{direction}.sql")), header).unwrap();
    }
}

fn json_request(uri: &str, method: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(uri: &str, method: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_responds_ok() {
    let response = app().oneshot(empty_request("/health", "GET")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn empty_schema_roundtrip() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "/schema",
            "POST",
            json!({ "directory": "/does/not/matter", "empty": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(empty_request(&format!("/schema/{id}"), "GET"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["id"], id.as_str());
    assert_eq!(fetched["empty"], true);

    let response = app
        .clone()
        .oneshot(empty_request("/schema", "GET"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(empty_request(&format!("/schema/{id}"), "DELETE"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(empty_request(&format!("/schema/{id}"), "DELETE"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn valid_directory_is_admitted() {
    let temp = tempdir().unwrap();
    write_pair(temp.path(), 100, "init", "aaaa", None);
    write_pair(temp.path(), 200, "users", "bbbb", Some("aaaa"));

    let response = app()
        .oneshot(json_request(
            "/schema",
            "POST",
            json!({ "directory": temp.path() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["id"].is_string());
}

#[tokio::test]
async fn missing_directory_is_a_user_error() {
    let response = app()
        .oneshot(json_request(
            "/schema",
            "POST",
            json!({ "directory": "/no/such/path" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error_code"], "INVALID_DIRECTORY");
    assert_eq!(body["error_type"], "USER");
}

#[tokio::test]
async fn broken_chain_is_rejected_as_invalid_schema() {
    let temp = tempdir().unwrap();
    write_pair(temp.path(), 100, "init", "aaaa", None);
    write_pair(temp.path(), 200, "left", "bbbb", Some("aaaa"));
    write_pair(temp.path(), 300, "right", "cccc", Some("aaaa"));

    let response = app()
        .oneshot(json_request(
            "/schema",
            "POST",
            json!({ "directory": temp.path() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error_code"], "INVALID_SCHEMA");
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/schema")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_code"], "MALFORMED_REQUEST");
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let response = app()
        .oneshot(empty_request(
            "/schema/00000000-0000-0000-0000-000000000000",
            "GET",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error_code"], "NOT_FOUND");
}
