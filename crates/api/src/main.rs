use std::net::SocketAddr;
use std::sync::Arc;

use teckel_cloud::{StorageBackend, StorageConfig};
use teckel_core::image::ImageStaging;
use teckel_core::inventory::{DogStore, InventoryGateway, MemoryDogStore};
use teckel_relay::{ContactRelay, MailConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teckel_api::config::ServerConfig;
use teckel_api::router::build_app_router;
use teckel_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teckel_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Inventory store ---
    let store = connect_store().await;
    let inventory = Arc::new(InventoryGateway::with_cache_ttl(store, config.list_cache_ttl));

    // --- Object storage ---
    let storage_config = StorageConfig::from_env();
    let storage = teckel_cloud::build_storage(&storage_config).await;
    let media_root = (storage_config.backend == StorageBackend::Local)
        .then(|| storage_config.local_root.clone());

    // --- Contact relay ---
    let mail_config = MailConfig::from_env();
    let relay = ContactRelay::from_config(&mail_config).expect("Invalid mail configuration");

    // --- App state ---
    let state = AppState {
        inventory,
        staging: Arc::new(ImageStaging::new()),
        storage,
        bucket: storage_config.bucket.as_str().into(),
        relay: Arc::new(relay),
        media_root,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Postgres when `DATABASE_URL` is set, otherwise a process-local store.
async fn connect_store() -> Arc<dyn DogStore> {
    let Some(database_url) = std::env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()) else {
        tracing::warn!("DATABASE_URL not set, using in-memory inventory (data is lost on restart)");
        return Arc::new(MemoryDogStore::new());
    };

    let pool = teckel_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    teckel_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    teckel_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    Arc::new(teckel_db::PgDogStore::new(pool))
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
