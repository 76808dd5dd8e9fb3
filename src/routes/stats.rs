use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::stats::{LeaderboardEntry, UserStats},
    error::AppError,
    identity::CurrentUser,
    services::stats_service,
    state::SharedState,
};

/// Cross-room statistics.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/leaderboard", get(leaderboard))
        .route("/stats", get(user_stats))
}

/// Best players of finished games.
#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "stats",
    responses((status = 200, description = "Top players", body = [LeaderboardEntry]))
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    Ok(Json(stats_service::leaderboard(&state).await?))
}

/// Totals of the caller across every room.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    params(("x-user-id" = String, Header, description = "Authenticated user id")),
    responses(
        (status = 200, description = "Caller statistics", body = UserStats),
        (status = 401, description = "Missing identity")
    )
)]
pub async fn user_stats(
    State(state): State<SharedState>,
    user: CurrentUser,
) -> Result<Json<UserStats>, AppError> {
    Ok(Json(stats_service::user_stats(&state, &user).await?))
}
