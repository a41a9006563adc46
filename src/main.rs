//! SpoilSense Server
//!
//! Ingestion and spoilage-risk inference server for environmental sensor
//! units.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      SPOILSENSE                         │
//! ├─────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌────────────────┐   ┌──────────────┐  │
//! │  │  API     │   │ Risk Inference │   │  Dashboard   │  │
//! │  │  (Axum)  │──▶│ model ▸ rule   │   │  (static)    │  │
//! │  └────┬─────┘   └────────────────┘   └──────────────┘  │
//! │       ▼                                                 │
//! │  ┌──────────────┐                                       │
//! │  │ Readings log │  append-only CSV, training corpus     │
//! │  └──────────────┘                                       │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod inference;
mod models;
mod store;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};
use inference::{ModelAdapter, RiskClassifier};
use store::ReadingStore;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spoilsense=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("SpoilSense server starting...");

    // Open the readings log (created with a header when missing)
    let store = ReadingStore::open(&config.data_file).expect("Failed to open readings log");

    // The classifier artifact is optional; absence downgrades to rule mode
    let adapter = ModelAdapter::load(&config.model_file);
    let model_loaded = adapter.is_loaded();
    tracing::info!(
        "Inference mode: {}",
        if model_loaded { "model" } else { "rule-based" }
    );

    // One long-lived predictor, injected into the request state
    let predictor = RiskClassifier::new(adapter);

    let state = AppState {
        store: Arc::new(store),
        predictor: Arc::new(predictor),
        model_loaded,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server (0.0.0.0 so field units on the LAN can reach it)
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app).await.expect("Server error");
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReadingStore>,
    pub predictor: Arc<RiskClassifier>,
    pub model_loaded: bool,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let index = ServeFile::new(Path::new(&static_dir).join("index.html"));

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/data", post(handlers::readings::ingest))
        .route("/api/latest", get(handlers::readings::latest))
        .route("/api/history", get(handlers::readings::history))
        .route_service("/", index)
        .nest_service("/static", ServeDir::new(&static_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
