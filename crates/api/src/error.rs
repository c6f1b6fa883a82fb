use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use teckel_core::error::CoreError;
use teckel_core::image::PublishError;
use teckel_core::validation::ImageErrorKind;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `teckel_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A rejected image upload.
    #[error(transparent)]
    Image(#[from] ImageErrorKind),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<PublishError> for AppError {
    fn from(err: PublishError) -> Self {
        AppError::Core(err.into())
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Image(kind) => {
                let code = match kind {
                    ImageErrorKind::UnsupportedType => "UNSUPPORTED_IMAGE_TYPE",
                    ImageErrorKind::TooLarge => "IMAGE_TOO_LARGE",
                };
                (StatusCode::BAD_REQUEST, code, kind.to_string())
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a domain error to an HTTP status, error code, and public message.
///
/// Infrastructure and configuration details are logged, never returned.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Transport(msg) => {
            tracing::error!(error = %msg, "Upstream service failure");
            (
                StatusCode::BAD_GATEWAY,
                "TRANSPORT_ERROR",
                "An upstream service is unavailable".to_string(),
            )
        }
        CoreError::Configuration(msg) => {
            tracing::error!(error = %msg, "Configuration error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}
