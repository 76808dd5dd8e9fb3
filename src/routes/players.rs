use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::room::{ActionResponse, PlayerView},
    error::AppError,
    identity::CurrentUser,
    services::room_service,
    state::SharedState,
};

/// Per-player actions inside a waiting room.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/players/{id}/ready", post(toggle_ready))
        .route("/players/{id}/kick", post(kick_player))
}

/// Flip the caller's readiness.
#[utoipa::path(
    post,
    path = "/players/{id}/ready",
    tag = "players",
    params(
        ("id" = Uuid, Path, description = "Player identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Readiness toggled", body = PlayerView),
        (status = 404, description = "Player not found or owned by someone else"),
        (status = 409, description = "Room is not waiting")
    )
)]
pub async fn toggle_ready(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerView>, AppError> {
    Ok(Json(room_service::toggle_ready(&state, &user, id).await?))
}

/// Remove a player from the host's room.
#[utoipa::path(
    post,
    path = "/players/{id}/kick",
    tag = "players",
    params(
        ("id" = Uuid, Path, description = "Player identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Player removed", body = ActionResponse),
        (status = 400, description = "Host tried to kick themselves"),
        (status = 403, description = "Caller is not the host"),
        (status = 404, description = "Player not found or room not waiting")
    )
)]
pub async fn kick_player(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(room_service::kick_player(&state, &user, id).await?))
}
