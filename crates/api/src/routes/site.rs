use axum::routing::get;
use axum::Router;

use crate::handlers::site;
use crate::state::AppState;

/// Site metadata routes mounted at `/site`.
pub fn router() -> Router<AppState> {
    Router::new().route("/contact-info", get(site::contact_info))
}
