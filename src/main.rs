//! Lagos Travel Time Prediction API
//!
//! Predicts inter-city travel time in Nigeria from road and environmental
//! features, using a regression model and feature scaler fitted offline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  TRAVEL TIME API (Axum)                  │
//! ├──────────────────────────────────────────────────────────┤
//! │  POST /predict-time ─► ValidatedJson<TravelInput>        │
//! │                              │                           │
//! │                              ▼                           │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │ Predictor (Arc, read-only after startup)           │  │
//! │  │   FeatureRow ─► Scaler ─► Regressor ─► round(2)    │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │                              ▲                           │
//! │             models/scaler.json, models/best_model.*      │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod inference;
mod middleware;
mod models;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, LogFormat};
use inference::Predictor;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    init_tracing(&config);

    tracing::info!("{} v{} starting...", models::SERVICE_TITLE, env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.environment);

    // Load artifacts
    let predictor = Predictor::load(&config.model_path, &config.scaler_path)
        .with_context(|| {
            format!(
                "Failed to load model {} / scaler {}",
                config.model_path.display(),
                config.scaler_path.display()
            )
        })?;

    let meta = predictor.metadata();
    tracing::info!(
        model = %meta.model_path,
        model_kind = %meta.model_kind,
        scaler = %meta.scaler_path,
        scaler_kind = %meta.scaler_kind,
        "Artifacts ready"
    );

    // Build application state
    let state = AppState {
        predictor: Arc::new(predictor),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing(config: &Config) {
    let default_filter = if config.is_production() {
        "travel_time_api=info,tower_http=info"
    } else {
        "travel_time_api=debug,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub config: Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::info::index))
        .route("/health", get(handlers::health::check))
        .route("/predict-time", post(handlers::predict::predict_time))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        // Any origin, method and header, with credentials. Browsers reject a
        // literal `*` alongside credentials, so the request origin is mirrored.
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
