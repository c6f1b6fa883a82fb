//! Admin console routes. Every handler here requires the `admin` role.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{dogs, images};
use crate::state::AppState;

/// Inventory mutation routes mounted at `/admin/dogs`.
///
/// ```text
/// POST   /       -> create_dog
/// PUT    /{id}   -> update_dog
/// DELETE /{id}   -> delete_dog
/// ```
pub fn dogs_router() -> Router<AppState> {
    Router::new()
        .route("/", post(dogs::create_dog))
        .route("/{id}", put(dogs::update_dog).delete(dogs::delete_dog))
}

/// Image slot routes mounted at `/admin/images`.
///
/// ```text
/// GET    /slot      -> get_slot
/// PUT    /slot      -> open_slot
/// POST   /stage     -> stage_image
/// GET    /staged    -> staged_preview
/// DELETE /staged    -> remove_staged
/// POST   /publish   -> publish_image
/// ```
pub fn images_router() -> Router<AppState> {
    Router::new()
        .route("/slot", get(images::get_slot).put(images::open_slot))
        .route("/stage", post(images::stage_image))
        .route(
            "/staged",
            get(images::staged_preview).delete(images::remove_staged),
        )
        .route("/publish", post(images::publish_image))
}
