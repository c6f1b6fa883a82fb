use axum::routing::get;
use axum::Router;

use crate::handlers::dogs;
use crate::state::AppState;

/// Public inventory routes mounted at `/dogs`.
///
/// ```text
/// GET /           -> list_dogs
/// GET /featured   -> list_featured_dogs
/// GET /{id}       -> get_dog
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dogs::list_dogs))
        .route("/featured", get(dogs::list_featured_dogs))
        .route("/{id}", get(dogs::get_dog))
}
