//! Contact form endpoint.
//!
//! Keeps the response shape the public site already consumes:
//! `{success, message}` for relay outcomes and `{error}` for rejected input.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use teckel_core::contact::ContactInquiry;
use teckel_relay::RelayError;

use crate::state::AppState;

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    body: Result<Json<ContactInquiry>, JsonRejection>,
) -> Response {
    let Json(inquiry) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable contact body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid request body" })),
            )
                .into_response();
        }
    };

    match state.relay.submit(&inquiry).await {
        Ok(message) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": message })),
        )
            .into_response(),
        Err(err) => relay_error_response(&err),
    }
}

fn relay_error_response(err: &RelayError) -> Response {
    if err.is_rejection() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response();
    }

    let status = match err {
        RelayError::NoSender => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(json!({ "success": false, "message": err.to_string() })),
    )
        .into_response()
}
