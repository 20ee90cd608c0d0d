//! # sjx-server: HTTP Service for Semi-Join Selection
//!
//! Exposes the greedy semi-join selection engine over HTTP. A client posts a
//! configuration (domains, relations, round bound) and receives the resulting
//! semi-join program with every round's candidates and working set.
//!
//! ## Endpoints
//!
//! - `GET  /health`                - Health check
//! - `GET  /datasets`              - List built-in datasets
//! - `GET  /datasets/{name}`       - Configuration of a built-in dataset
//! - `POST /datasets/{name}/run`   - Run a built-in dataset (JSON response)
//! - `POST /semi-join`             - Run a posted configuration (JSON response)
//! - `POST /semi-join/text`        - Run a posted configuration (plain-text tables)
//!
//! ## Configuration
//!
//! The server listens on `0.0.0.0:3000`. Logging is controlled by the `RUST_LOG`
//! environment variable (defaults to `sjx=debug`).

mod routes;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

const BIND_ADDR: &str = "0.0.0.0:3000";

fn app(state: Arc<state::AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/datasets", get(routes::list_datasets))
        .route("/datasets/{name}", get(routes::get_dataset))
        .route("/datasets/{name}/run", post(routes::run_dataset))
        .route("/semi-join", post(routes::run_json))
        .route("/semi-join/text", post(routes::run_text))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sjx=debug".parse()?))
        .init();

    let state = Arc::new(state::AppState::new());

    let listener = tokio::net::TcpListener::bind(BIND_ADDR).await?;
    tracing::info!("sjx-server listening on http://{}", BIND_ADDR);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
