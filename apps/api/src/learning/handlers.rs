use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::learning::leaderboard::{LeaderboardEntry, DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT};
use crate::learning::service::{
    complete_module_for_user, gap_report, leaderboard, recommendations, GapReport,
    ModuleCompletionResponse, RecommendationsResponse,
};
use crate::profile::service::require_profile;
use crate::skills::benchmark::RoleBenchmark;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct CompleteModuleRequest {
    pub user_id: Uuid,
    pub module_name: String,
}

/// GET /api/v1/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<Vec<RoleBenchmark>> {
    Json(state.catalog.roles().to_vec())
}

/// GET /api/v1/gaps
pub async fn handle_get_gaps(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<GapReport>, AppError> {
    let Query(params) = query?;
    let profile = require_profile(state.store.as_ref(), params.user_id).await?;
    Ok(Json(gap_report(&state.catalog, &profile)?))
}

/// GET /api/v1/recommendations
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let Query(params) = query?;
    let profile = require_profile(state.store.as_ref(), params.user_id).await?;
    Ok(Json(recommendations(&state.catalog, &profile)?))
}

/// POST /api/v1/modules/complete
pub async fn handle_complete_module(
    State(state): State<AppState>,
    body: Result<Json<CompleteModuleRequest>, JsonRejection>,
) -> Result<Json<ModuleCompletionResponse>, AppError> {
    let Json(req) = body?;
    let module_name = req.module_name.trim();
    if module_name.is_empty() {
        return Err(AppError::Validation("module_name is required".to_string()));
    }
    let response =
        complete_module_for_user(state.store.as_ref(), &state.catalog, req.user_id, module_name)
            .await?;
    Ok(Json(response))
}

/// GET /api/v1/leaderboard
pub async fn handle_leaderboard(
    State(state): State<AppState>,
    query: Result<Query<LeaderboardQuery>, QueryRejection>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let Query(params) = query?;
    let limit = match params.limit {
        None => DEFAULT_LEADERBOARD_LIMIT,
        Some(0) => return Err(AppError::Validation("limit must be at least 1".to_string())),
        Some(n) => n.min(MAX_LEADERBOARD_LIMIT),
    };
    Ok(Json(leaderboard(state.store.as_ref(), limit).await?))
}
