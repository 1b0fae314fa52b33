// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Furnish Server - floor-plan furniture enrichment.
//!
//! This server enriches floor-plan detection documents with furniture
//! placements and renders depth-conditioned previews. It supports:
//!
//! - Generative-model enrichment (free-text JSON replies, recovered and
//!   sanitized by `furnish-core`)
//! - Object-detector enrichment with floor-plan preprocessing
//! - Depth-conditioned generation with a graphical fallback
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `POST /api/v1/furnish` - Model-based furniture enrichment
//! - `POST /api/v1/furnish/detector` - Detector-based furniture enrichment
//! - `POST /api/v1/generate` - Depth-conditioned image generation

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;
use services::{DetectorClient, DiffusionClient, ModelClient};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub model: Option<Arc<ModelClient>>,
    pub detector: Option<Arc<DetectorClient>>,
    pub diffusion: Option<Arc<DiffusionClient>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,furnish_server=debug".into()),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        max_image_mb = config.max_image_mb,
        model = %config.model_name,
        "Starting Furnish Server"
    );

    let model = ModelClient::from_config(&config).map(Arc::new);
    if model.is_none() {
        tracing::warn!("MODEL_API_KEY not set; /api/v1/furnish will return 503");
    }
    let detector = DetectorClient::from_config(&config).map(Arc::new);
    if detector.is_none() {
        tracing::warn!("DETECTOR_URL not set; /api/v1/furnish/detector will return 503");
    }
    let diffusion = DiffusionClient::from_config(&config).map(Arc::new);
    if diffusion.is_none() {
        tracing::info!("DIFFUSION_URL not set; /api/v1/generate serves previews only");
    }

    let state = AppState {
        config: Arc::new(config.clone()),
        model,
        detector,
        diffusion,
    };

    // Build router
    let app = Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        // Health check
        .route("/api/v1/health", get(routes::health::check))
        // Enrichment endpoints
        .route("/api/v1/furnish", post(routes::furnish::furnish_model))
        .route("/api/v1/furnish/detector", post(routes::furnish::furnish_detector))
        // Generation endpoint
        .route("/api/v1/generate", post(routes::generate::generate))
        // Middleware; body limit leaves headroom over max_image_mb for the
        // baseline JSON field and multipart framing
        .layer(DefaultBodyLimit::max((state.config.max_image_mb + 1) * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
