pub mod admin;
pub mod contact;
pub mod dogs;
pub mod health;
pub mod site;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /dogs                          list (public)
/// /dogs/featured                 featured subset (public)
/// /dogs/{id}                     get (public)
///
/// /site/contact-info             public contact details
///
/// /admin/dogs                    create
/// /admin/dogs/{id}               update, delete
///
/// /admin/images/slot             get, open (reset with current URL)
/// /admin/images/stage            stage upload (multipart)
/// /admin/images/staged           preview bytes, remove
/// /admin/images/publish          publish staged image
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/dogs", dogs::router())
        .nest("/site", site::router())
        .nest("/admin/dogs", admin::dogs_router())
        .nest("/admin/images", admin::images_router())
}
