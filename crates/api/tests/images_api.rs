//! Integration tests for the admin image slot endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{assert_status, body_bytes, body_json, dog_body, TestApp, BUCKET, MEDIA_BASE_URL};
use serde_json::json;

const PNG: &str = "image/png";
const JPEG: &str = "image/jpeg";
const MIB: usize = 1024 * 1024;

#[tokio::test]
async fn image_routes_require_admin() {
    let app = TestApp::new();
    let user = app.token("visitor", "user");

    let response = app
        .upload("/api/v1/admin/images/stage", &user, "a.png", PNG, &[1, 2, 3])
        .await;
    assert_status(&response, StatusCode::UNAUTHORIZED);

    let response = app.get("/api/v1/admin/images/slot").await;
    assert_status(&response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn stage_validates_type_and_size() {
    let app = TestApp::new();
    let token = app.admin_token();

    let response = app
        .upload("/api/v1/admin/images/stage", &token, "big.png", PNG, &vec![0; 3 * MIB])
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "IMAGE_TOO_LARGE");

    let response = app
        .upload("/api/v1/admin/images/stage", &token, "anim.gif", "image/gif", &vec![0; MIB])
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "UNSUPPORTED_IMAGE_TYPE");

    let response = app
        .upload("/api/v1/admin/images/stage", &token, "oscar.jpg", JPEG, &vec![9; 500 * 1024])
        .await;
    assert_status(&response, StatusCode::OK);
    let staged = body_json(response).await["data"].clone();
    assert_eq!(staged["file_name"], "oscar.jpg");
    assert_eq!(staged["size_bytes"], 500 * 1024);
    assert_eq!(staged["preview"].as_str().unwrap().len(), 16);
}

#[tokio::test]
async fn upload_over_body_limit_is_too_large_and_recorded() {
    let app = TestApp::new();
    let token = app.admin_token();

    app.upload("/api/v1/admin/images/stage", &token, "a.png", PNG, &[1, 2, 3])
        .await;
    let response = app
        .upload("/api/v1/admin/images/stage", &token, "huge.png", PNG, &vec![0; 5 * MIB])
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "IMAGE_TOO_LARGE");

    let response = app.get_as("/api/v1/admin/images/slot", &token).await;
    let slot = body_json(response).await["data"].clone();
    assert_eq!(slot["error"], "too_large");
    assert_eq!(slot["staged"]["file_name"], "a.png");
}

#[tokio::test]
async fn rejected_upload_keeps_previous_staged_image() {
    let app = TestApp::new();
    let token = app.admin_token();

    app.upload("/api/v1/admin/images/stage", &token, "a.png", PNG, &[1, 2, 3])
        .await;
    let response = app
        .upload("/api/v1/admin/images/stage", &token, "b.gif", "image/gif", &[4])
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);

    let response = app.get_as("/api/v1/admin/images/slot", &token).await;
    let slot = body_json(response).await["data"].clone();
    assert_eq!(slot["staged"]["file_name"], "a.png");
    assert_eq!(slot["error"], "unsupported_type");

    let response = app.get_as("/api/v1/admin/images/staged", &token).await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(response.headers()["content-type"], PNG);
    assert_eq!(body_bytes(response).await, vec![1, 2, 3]);
}

#[tokio::test]
async fn publish_stores_file_and_returns_public_url() {
    let app = TestApp::new();
    let token = app.admin_token();

    app.upload("/api/v1/admin/images/stage", &token, "oscar.png", PNG, &[7; 64])
        .await;
    let response = app
        .json(Method::POST, "/api/v1/admin/images/publish", Some(&token), json!({}))
        .await;
    assert_status(&response, StatusCode::OK);
    let url = body_json(response).await["data"]["url"]
        .as_str()
        .unwrap()
        .to_string();

    let prefix = format!("{MEDIA_BASE_URL}/{BUCKET}/");
    assert!(url.starts_with(&prefix), "{url}");
    assert!(url.ends_with(".png"), "{url}");

    let key = url.trim_start_matches(&prefix);
    let stored = std::fs::read(app.media.path().join(BUCKET).join(key)).unwrap();
    assert_eq!(stored, vec![7; 64]);

    // Served back under /media.
    let response = app.get(&format!("/media/{BUCKET}/{key}")).await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(body_bytes(response).await, vec![7; 64]);

    // The slot now holds the URL and nothing staged.
    let slot = body_json(app.get_as("/api/v1/admin/images/slot", &token).await).await["data"].clone();
    assert_eq!(slot["image_url"], url.as_str());
    assert!(slot["staged"].is_null());

    // The URL can be saved on a record.
    let mut body = dog_body("Oscar");
    body["image_url"] = json!(url.clone());
    let response = app
        .json(Method::POST, "/api/v1/admin/dogs", Some(&token), body)
        .await;
    assert_status(&response, StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["image_url"], url.as_str());
}

#[tokio::test]
async fn publish_without_staged_image_is_a_validation_error() {
    let app = TestApp::new();
    let response = app
        .json(
            Method::POST,
            "/api/v1/admin/images/publish",
            Some(&app.admin_token()),
            json!({}),
        )
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn remove_clears_staged_image_and_url() {
    let app = TestApp::new();
    let token = app.admin_token();

    let response = app
        .json(
            Method::PUT,
            "/api/v1/admin/images/slot",
            Some(&token),
            json!({ "image_url": "https://cdn.example.com/dogs/old.png" }),
        )
        .await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["image_url"],
        "https://cdn.example.com/dogs/old.png"
    );

    app.upload("/api/v1/admin/images/stage", &token, "a.png", PNG, &[1])
        .await;
    let response = app.delete("/api/v1/admin/images/staged", Some(&token)).await;
    assert_status(&response, StatusCode::NO_CONTENT);

    let slot = body_json(app.get_as("/api/v1/admin/images/slot", &token).await).await["data"].clone();
    assert!(slot["staged"].is_null());
    assert!(slot["image_url"].is_null());

    let response = app.get_as("/api/v1/admin/images/staged", &token).await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn slots_are_per_admin() {
    let app = TestApp::new();
    let alice = app.token("alice", "admin");
    let bob = app.token("bob", "admin");

    app.upload("/api/v1/admin/images/stage", &alice, "a.png", PNG, &[1])
        .await;
    let response = app.get_as("/api/v1/admin/images/staged", &bob).await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_file_field_is_a_bad_request() {
    let app = TestApp::new();
    let token = app.admin_token();
    let (content_type, body) = common::multipart_body("other", "a.png", PNG, &[1]);
    let mut request = common::request(
        Method::POST,
        "/api/v1/admin/images/stage",
        Some(&token),
        axum::body::Body::from(body),
    );
    request
        .headers_mut()
        .insert("content-type", content_type.parse().unwrap());
    let response = app.send(request).await;
    assert_status(&response, StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
