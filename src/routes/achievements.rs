use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::achievement::AchievementView,
    error::AppError,
    identity::CurrentUser,
    services::achievement_service,
    state::SharedState,
};

/// Achievements earned by winning games.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/achievements", get(list_achievements))
        .route("/achievements/{id}", get(get_achievement))
}

/// Achievements of the caller, newest first.
#[utoipa::path(
    get,
    path = "/achievements",
    tag = "achievements",
    params(("x-user-id" = String, Header, description = "Authenticated user id")),
    responses(
        (status = 200, description = "Caller achievements", body = [AchievementView]),
        (status = 401, description = "Missing identity")
    )
)]
pub async fn list_achievements(
    State(state): State<SharedState>,
    user: CurrentUser,
) -> Result<Json<Vec<AchievementView>>, AppError> {
    Ok(Json(achievement_service::list_achievements(&state, &user).await?))
}

/// One achievement of any user.
#[utoipa::path(
    get,
    path = "/achievements/{id}",
    tag = "achievements",
    params(
        ("id" = Uuid, Path, description = "Achievement identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Achievement", body = AchievementView),
        (status = 401, description = "Missing identity"),
        (status = 404, description = "Achievement not found")
    )
)]
pub async fn get_achievement(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AchievementView>, AppError> {
    Ok(Json(achievement_service::get_achievement(&state, id).await?))
}
