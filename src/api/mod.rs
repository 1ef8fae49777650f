//! REST API
//!
//! A small axum server exposing the loaded dataset and the trained power
//! regressor:
//!
//! - `GET /api/characters` — all cleaned character records
//! - `GET /api/status` — liveness and dataset summary
//! - `POST /api/predict-power` — power score from attributes or legacy form
//!
//! All state is read-only after startup, so [`AppState`] is a pair of `Arc`s
//! and handlers never lock anything.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::predictor::PowerPredictor;

pub mod error;
pub mod handlers;

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub predictor: Arc<PowerPredictor>,
}

impl AppState {
    pub fn new(dataset: Dataset, predictor: PowerPredictor) -> Self {
        Self {
            dataset: Arc::new(dataset),
            predictor: Arc::new(predictor),
        }
    }
}

/// Build the application router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/characters", get(handlers::characters))
        .route("/api/status", get(handlers::status))
        .route("/api/predict-power", post(handlers::predict_power))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
