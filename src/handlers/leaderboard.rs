// src/handlers/leaderboard.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    config::LEADERBOARD_LIMIT,
    error::AppError,
    models::score::build_leaderboard,
    store::Store,
};

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Module to filter on. Missing, empty or "All" means every module.
    pub module: Option<String>,
}

/// Returns the top scores, best percentage first.
pub async fn get_leaderboard(
    State(store): State<Arc<dyn Store>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let records = store.load_scores().await.map_err(|e| {
        tracing::error!("Failed to fetch leaderboard: {:?}", e);
        AppError::from(e)
    })?;

    let module = query
        .module
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty() && *m != "All");

    Ok(Json(build_leaderboard(records, module, LEADERBOARD_LIMIT)))
}
