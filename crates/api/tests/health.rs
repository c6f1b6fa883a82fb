//! Integration tests for the health check, site info and general HTTP
//! behaviour.

mod common;

use axum::http::StatusCode;
use common::{assert_status, body_json, TestApp};

#[tokio::test]
async fn health_check_reports_store_status() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    assert_status(&response, StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["store_healthy"], true);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = TestApp::new();
    let response = app.get("/this-route-does-not-exist").await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = TestApp::new();
    let response = app.get("/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn contact_info_exposes_whatsapp_link() {
    let app = TestApp::new();
    let response = app.get("/api/v1/site/contact-info").await;
    assert_status(&response, StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["business_name"], "Royal Teckel Home");
    assert_eq!(data["email"], "contact@royal-teckel.example");
    assert_eq!(data["whatsapp_url"], "https://wa.me/33612345678");
}

#[tokio::test]
async fn unknown_dog_id_is_not_found_envelope() {
    let app = TestApp::new();
    let response = app
        .get(&format!("/api/v1/dogs/{}", uuid::Uuid::now_v7()))
        .await;
    assert_status(&response, StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].is_string());
}
