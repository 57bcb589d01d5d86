//! Intel Response Server
//!
//! HTTP API over the intelligence validation and response orchestration
//! engine, consumed by the dashboard UI.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    INTEL RESPONSE SERVER                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  API      │  │  API key  │  │  Engine                 │ │
//! │  │  Gateway  │  │  Guard    │  │  validate → plan → run  │ │
//! │  │  (Axum)   │  │           │  │                         │ │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘ │
//! │        └──────────────┼──────────────────────┘              │
//! │                       ▼                                     │
//! │                ┌─────────────┐                             │
//! │                │ Persistence │                             │
//! │                └─────────────┘                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod middleware;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use intel_response_core::{Engine, JsonlAuditLog, MemoryPersistence};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intel_response_server=debug,intel_response_core=info,tower_http=debug".into()),
        )
        .with(config.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!config.log_json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Intel Response Server starting...");
    if config.api_key.is_none() && config.is_production() {
        tracing::warn!("INTEL_API_KEY is not set; the API is open");
    }

    // Build engine
    let engine_config = config.engine_config()?;
    let mut store = MemoryPersistence::new();
    if let Some(path) = &config.audit_log_path {
        store = store.with_validation_store(Arc::new(JsonlAuditLog::open(path)?));
    }
    let engine = Engine::new(engine_config, Arc::new(store));

    // Build application state
    let state = AppState {
        engine: Arc::new(engine),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new().route("/health", get(handlers::health::check));

    // Engine routes (API key when configured)
    let api_routes = Router::new()
        // Signals
        .route("/api/v1/signals/validate", post(handlers::signals::validate))
        .route("/api/v1/signals/classify", post(handlers::signals::classify))
        .route("/api/v1/validation/stats", get(handlers::signals::stats))

        // Entities
        .route("/api/v1/entities/:entity/patterns", post(handlers::entities::patterns))
        .route("/api/v1/entities/:entity/recommendation", post(handlers::entities::recommendation))
        .route("/api/v1/entities/:entity/strategies", post(handlers::entities::generate))
        .route("/api/v1/entities/:entity/strategies/best", get(handlers::entities::best))
        .route("/api/v1/entities/:entity/cycle", post(handlers::entities::cycle))

        // Strategies
        .route("/api/v1/strategies/:id", get(handlers::strategies::get))
        .route("/api/v1/strategies/:id/prediction", get(handlers::strategies::prediction))
        .route("/api/v1/strategies/:id/optimize", post(handlers::strategies::optimize))
        .route("/api/v1/strategies/:id/execute", post(handlers::strategies::execute))

        // Plans
        .route("/api/v1/plans", post(handlers::plans::create))
        .route("/api/v1/plans/:id", get(handlers::plans::get))
        .route("/api/v1/plans/:id/metrics", get(handlers::plans::metrics))
        .route("/api/v1/plans/:id/execute", post(handlers::plans::execute))

        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_api_key,
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(api_routes)
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
