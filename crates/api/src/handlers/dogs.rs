//! Handlers for the dog inventory.
//!
//! Reads are public. Mutations resolve the caller's role from the session and
//! pass it to the gateway, which refuses anything but `admin`. Body and path
//! rejections are held back until the role is known, so a non-admin always
//! sees `UNAUTHORIZED`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use teckel_core::dog::DogInsert;
use teckel_core::roles::require_admin;
use teckel_core::types::DogId;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::Caller;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Public endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/dogs
pub async fn list_dogs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let dogs = state.inventory.list().await?;
    Ok(Json(DataResponse { data: dogs }))
}

/// GET /api/v1/dogs/featured
pub async fn list_featured_dogs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let dogs = state.inventory.list_featured().await?;
    Ok(Json(DataResponse { data: dogs }))
}

/// GET /api/v1/dogs/{id}
pub async fn get_dog(
    State(state): State<AppState>,
    Path(id): Path<DogId>,
) -> AppResult<impl IntoResponse> {
    let dog = state.inventory.get(id).await?;
    Ok(Json(DataResponse { data: dog }))
}

// ---------------------------------------------------------------------------
// Admin endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/dogs
pub async fn create_dog(
    caller: Caller,
    State(state): State<AppState>,
    body: Result<Json<DogInsert>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    require_admin(caller.role)?;
    let input = json_body(body)?;
    let dog = state.inventory.create(caller.role, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: dog })))
}

/// PUT /api/v1/admin/dogs/{id}
///
/// Full replace of every editable field.
pub async fn update_dog(
    caller: Caller,
    State(state): State<AppState>,
    id: Result<Path<DogId>, PathRejection>,
    body: Result<Json<DogInsert>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    require_admin(caller.role)?;
    let id = dog_id(id)?;
    let input = json_body(body)?;
    let dog = state.inventory.update(caller.role, id, &input).await?;
    Ok(Json(DataResponse { data: dog }))
}

/// DELETE /api/v1/admin/dogs/{id}
pub async fn delete_dog(
    caller: Caller,
    State(state): State<AppState>,
    id: Result<Path<DogId>, PathRejection>,
) -> AppResult<StatusCode> {
    require_admin(caller.role)?;
    let id = dog_id(id)?;
    state.inventory.delete(caller.role, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn json_body(body: Result<Json<DogInsert>, JsonRejection>) -> AppResult<DogInsert> {
    body.map(|Json(input)| input)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

fn dog_id(id: Result<Path<DogId>, PathRejection>) -> AppResult<DogId> {
    id.map(|Path(id)| id)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}
