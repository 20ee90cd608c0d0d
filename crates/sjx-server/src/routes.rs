//! # HTTP Route Handlers
//!
//! ## Pipeline
//!
//! Every run endpoint shares `execute`:
//!
//! 1. **Check**: reject configurations beyond the server limits.
//! 2. **Build**: validate the configuration into a catalog.
//! 3. **Search**: run the greedy selection for the configured number of rounds.
//!
//! ## Error Handling
//!
//! - 400 Bad Request: invalid configuration (duplicate relation, zero domain, ...)
//! - 404 Not Found: unknown built-in dataset
//! - 422 Unprocessable Entity: the engine could not complete (no candidates in a round)

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use sjx_core::catalog::SemiJoinConfig;
use sjx_core::datasets::{self, DATASET_NAMES};
use sjx_core::display::render_program;
use sjx_core::domain::DomainRegistry;
use sjx_core::search::{SemiJoinProgram, SemiJoinSearch};
use sjx_core::SemiJoinError;

use crate::state::AppState;

type ApiError = (StatusCode, String);

fn error_response(err: SemiJoinError) -> ApiError {
    let status = match err {
        SemiJoinError::UnknownDataset { .. } => StatusCode::NOT_FOUND,
        ref e if e.is_config_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, err.to_string())
}

/// Check limits, build the catalog and run the search.
fn execute(state: &AppState, config: &SemiJoinConfig) -> Result<(DomainRegistry, SemiJoinProgram), ApiError> {
    if config.max_rounds > state.config.max_rounds_limit {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "maxRounds {} exceeds the server limit of {}",
                config.max_rounds, state.config.max_rounds_limit
            ),
        ));
    }
    if config.relations.len() > state.config.max_relations {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "{} relations exceed the server limit of {}",
                config.relations.len(),
                state.config.max_relations
            ),
        ));
    }

    let catalog = config.build().map_err(error_response)?;
    let mut search = SemiJoinSearch::new(catalog);
    let program = search.run().map_err(error_response)?;

    info!(
        "Semi-join program built: relations={}, rounds={}",
        config.relations.len(),
        program.rounds.len()
    );
    Ok((search.registry().clone(), program))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /datasets — names of the built-in datasets.
pub async fn list_datasets() -> impl IntoResponse {
    Json(DatasetsResponse {
        datasets: DATASET_NAMES.iter().map(|n| n.to_string()).collect(),
    })
}

#[derive(Serialize)]
pub struct DatasetsResponse {
    pub datasets: Vec<String>,
}

/// GET /datasets/{name} — configuration of a built-in dataset.
pub async fn get_dataset(Path(name): Path<String>) -> Result<Json<SemiJoinConfig>, ApiError> {
    datasets::dataset(&name).map(Json).map_err(error_response)
}

/// POST /datasets/{name}/run — run a built-in dataset.
pub async fn run_dataset(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<SemiJoinProgram>, ApiError> {
    let config = datasets::dataset(&name).map_err(error_response)?;
    let (_, program) = execute(&state, &config)?;
    Ok(Json(program))
}

/// POST /semi-join — run a posted configuration, JSON response.
pub async fn run_json(
    State(state): State<Arc<AppState>>,
    Json(config): Json<SemiJoinConfig>,
) -> Result<Json<SemiJoinProgram>, ApiError> {
    let (_, program) = execute(&state, &config)?;
    Ok(Json(program))
}

/// POST /semi-join/text — run a posted configuration, rendered as text tables.
pub async fn run_text(
    State(state): State<Arc<AppState>>,
    Json(config): Json<SemiJoinConfig>,
) -> Result<String, ApiError> {
    let (registry, program) = execute(&state, &config)?;
    Ok(render_program(&registry, &program))
}
