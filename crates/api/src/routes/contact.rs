use axum::routing::post;
use axum::Router;

use crate::handlers::contact;
use crate::state::AppState;

/// Contact form relay, mounted at the root (`/api/contact`) where the public
/// site posts it.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/contact", post(contact::submit_contact))
}
