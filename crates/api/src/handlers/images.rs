//! Handlers for the admin image slot: stage, preview, remove, publish.
//!
//! Each admin has one slot keyed by session subject. Nothing reaches object
//! storage until `publish`.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use teckel_core::error::CoreError;
use teckel_core::image::ImageUpload;
use teckel_core::validation::{validate_image_url, ImageErrorKind};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the picture.
const FILE_FIELD: &str = "file";

/// Body of `PUT /admin/images/slot`.
#[derive(Debug, Deserialize)]
pub struct OpenSlot {
    /// Current picture of the record being edited, if any.
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublishedImage {
    pub url: String,
}

/// PUT /api/v1/admin/images/slot
///
/// Reset the admin's slot for a form, seeded with the record's current URL.
pub async fn open_slot(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<OpenSlot>,
) -> AppResult<impl IntoResponse> {
    let image_url = validate_image_url(input.image_url.as_deref())?;
    let slot = state.staging.open(admin.subject(), image_url).await;
    Ok(Json(DataResponse { data: slot }))
}

/// GET /api/v1/admin/images/slot
pub async fn get_slot(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let slot = state.staging.slot(admin.subject()).await;
    Ok(Json(DataResponse { data: slot }))
}

/// POST /api/v1/admin/images/stage
///
/// Accepts a multipart form with a `file` field. Validation failures leave
/// any previously staged image in place. A body cut off by the upload limit
/// counts as [`ImageErrorKind::TooLarge`].
pub async fn stage_image(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let owner = admin.subject();
    let mut upload = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(reject_upload(&state, owner, e, "Invalid multipart body").await),
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Err(reject_upload(&state, owner, e, "Failed to read upload").await),
        };
        upload = Some(ImageUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let upload = upload
        .ok_or_else(|| AppError::BadRequest(format!("Missing `{FILE_FIELD}` field")))?;
    let staged = state
        .staging
        .stage(owner, upload, chrono::Utc::now())
        .await?;

    tracing::info!(
        subject = owner,
        file_name = %staged.file_name,
        size_bytes = staged.size_bytes,
        "Image staged",
    );
    Ok(Json(DataResponse { data: staged }))
}

/// Map a multipart read failure. Hitting the body limit is an oversized
/// image and is recorded in the slot; anything else is a malformed request.
async fn reject_upload(
    state: &AppState,
    owner: &str,
    err: MultipartError,
    context: &str,
) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::info!(subject = owner, "Upload exceeded the body limit");
        state.staging.reject(owner, ImageErrorKind::TooLarge).await;
        return AppError::Image(ImageErrorKind::TooLarge);
    }
    AppError::BadRequest(format!("{context}: {err}"))
}

/// GET /api/v1/admin/images/staged
///
/// Raw bytes of the staged image, for the form preview.
pub async fn staged_preview(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let staged = state
        .staging
        .staged(admin.subject())
        .await
        .ok_or_else(|| CoreError::NotFound {
            entity: "StagedImage",
            id: admin.subject().to_string(),
        })?;

    Ok((
        [
            (CONTENT_TYPE, staged.content_type.clone()),
            (CACHE_CONTROL, "no-store".to_string()),
        ],
        staged.bytes.as_ref().clone(),
    ))
}

/// DELETE /api/v1/admin/images/staged
///
/// Discard the staged image and the confirmed URL.
pub async fn remove_staged(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> StatusCode {
    state.staging.remove(admin.subject()).await;
    StatusCode::NO_CONTENT
}

/// POST /api/v1/admin/images/publish
///
/// Upload the staged image and return its public URL. On failure the slot is
/// unchanged and the admin can retry.
pub async fn publish_image(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let url = state
        .staging
        .publish(
            admin.subject(),
            state.storage.as_ref(),
            &state.bucket,
            chrono::Utc::now(),
        )
        .await?;

    Ok(Json(DataResponse {
        data: PublishedImage { url },
    }))
}
