use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{dto::game::GameSummary, error::AppError, services::game_service, state::SharedState};

/// Read-only access to the game catalog.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games))
        .route("/games/{slug}", get(get_game))
}

/// List the games that can host rooms.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    responses((status = 200, description = "Active games", body = [GameSummary]))
)]
pub async fn list_games(State(state): State<SharedState>) -> Json<Vec<GameSummary>> {
    Json(game_service::list_games(&state))
}

/// Describe one game of the catalog.
#[utoipa::path(
    get,
    path = "/games/{slug}",
    tag = "games",
    params(("slug" = String, Path, description = "Game slug")),
    responses(
        (status = 200, description = "Game definition", body = GameSummary),
        (status = 404, description = "Unknown or inactive game")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::get_game(&state, &slug)?))
}
