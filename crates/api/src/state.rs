use std::path::PathBuf;
use std::sync::Arc;

use teckel_core::image::ImageStaging;
use teckel_core::inventory::InventoryGateway;
use teckel_core::storage::ObjectStorage;
use teckel_relay::ContactRelay;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Role-checked dog inventory with its cached list view.
    pub inventory: Arc<InventoryGateway>,
    /// Per-admin image slots awaiting publication.
    pub staging: Arc<ImageStaging>,
    /// Object storage receiving published pictures.
    pub storage: Arc<dyn ObjectStorage>,
    /// Bucket pictures are published to.
    pub bucket: Arc<str>,
    /// Contact form relay.
    pub relay: Arc<ContactRelay>,
    /// Directory served under `/media` when pictures are stored locally.
    pub media_root: Option<PathBuf>,
    pub config: Arc<ServerConfig>,
}
