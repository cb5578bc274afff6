//! footprint-server library - couple footprint map backend
//!
//! Thin CRUD service over couples and their visited places, keyed by the
//! shareable couple code.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod api;
pub mod db;
pub mod error;
pub mod identity;

use db::RecordStore;

/// Photos travel inline as data URLs, so bodies get large
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

/// Server settings after CLI/env/TOML resolution
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// CORS: any origin, the verbs the client uses, JSON content type
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build application router
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    let api = Router::new()
        .route("/api/couple/create", post(api::create_couple))
        .route("/api/couple/join", post(api::join_couple))
        .route("/api/couple/:code", get(api::get_couple))
        .route("/api/restaurants", post(api::create_restaurant))
        .route("/api/restaurants/:key", get(api::list_restaurants))
        .route("/api/restaurants/:key", delete(api::delete_restaurant));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C
pub async fn run(config: ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state, config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("footprint-server listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("footprint-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
