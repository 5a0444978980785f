/// Tests for the HTTP form API
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use ledgerline_api::{router, AppState};
use ledgerline_core::{Settings, ENTRY_POINTS};

const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

fn app(settings: Settings) -> Router {
    router(AppState::new(settings, None))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(Settings::default()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_entries_schema() {
    let request = Request::builder().uri("/api/entries").body(Body::empty()).unwrap();
    let (status, body) = send(app(Settings::default()), request).await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), ENTRY_POINTS.len());

    let get_card = entries
        .iter()
        .find(|e| e["product"] == "card" && e["command"] == "get-card")
        .unwrap();
    assert_eq!(get_card["method"], "getCard");
    assert_eq!(get_card["requires_signer"], false);
    assert_eq!(get_card["args"][0]["name"], "card_id");
    assert_eq!(get_card["args"][0]["kind"], "uint");
    assert_eq!(get_card["output"]["type"], "record");
}

#[tokio::test]
async fn test_unknown_entry_is_not_found() {
    let (status, body) = send(app(Settings::default()), post("/api/card/explode", json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], false);
    assert_eq!(body["kind"], "not_found");

    let (status, _) = send(app(Settings::default()), post("/api/loan/get-card", json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_argument_is_a_validation_error() {
    let request = post("/api/token/transfer", json!({ "args": { "to": CONTRACT } }));
    let (status, body) = send(app(Settings::default()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert_eq!(body["kind"], "validation");
    assert!(body["message"].as_str().unwrap().contains("amount"));
}

#[tokio::test]
async fn test_bad_request_body_is_a_validation_error() {
    let malformed = Request::builder()
        .method("POST")
        .uri("/api/token/name")
        .header("content-type", "application/json")
        .body(Body::from("{\"args\":"))
        .unwrap();
    let (status, body) = send(app(Settings::default()), malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert_eq!(body["kind"], "validation");

    let no_content_type = Request::builder()
        .method("POST")
        .uri("/api/token/name")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(Settings::default()), no_content_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_missing_configuration_is_a_server_error() {
    let (status, body) = send(app(Settings::default()), post("/api/deposit/total-deposits", json!({}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "configuration");
    assert!(body["message"].as_str().unwrap().contains("LEDGERLINE_RPC_URL"));
}

#[tokio::test]
async fn test_unreachable_node_is_a_bad_gateway() {
    let mut settings = Settings::default();
    settings.rpc_url = Some("http://127.0.0.1:1".to_string());
    settings.contracts.insert("token".to_string(), CONTRACT.to_string());

    let (status, body) = send(app(settings), post("/api/token/name", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "network");
}
