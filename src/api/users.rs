use axum::{
    Extension, Json,
    extract::State,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, AppJson, AppQuery, AppState, UserDto};
use crate::models::LeaderboardEntry;

#[derive(Deserialize)]
pub struct StreakRequest {
    pub streak: i32,
}

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

/// POST /api/streak
pub async fn update_streak(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    AppJson(payload): AppJson<StreakRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let user = state
        .study_service
        .update_streak(user.id, payload.streak)
        .await?;
    Ok(Json(UserDto::from(user)))
}

/// GET /api/leaderboard
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let entries = state.study_service.leaderboard(query.limit).await?;
    Ok(Json(entries))
}
