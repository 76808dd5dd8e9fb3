use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        room::ActionResponse,
        round::{DrawingRequest, GuessRequest, GuessResponse},
    },
    error::AppError,
    identity::CurrentUser,
    services::round_service,
    state::SharedState,
};

/// REST fallback for in-round actions normally sent over the room socket.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rounds/{id}/guess", post(submit_guess))
        .route("/rounds/{id}/drawing", post(submit_drawing))
}

/// Guess the secret word of an active round.
#[utoipa::path(
    post,
    path = "/rounds/{id}/guess",
    tag = "rounds",
    request_body = GuessRequest,
    params(
        ("id" = Uuid, Path, description = "Round identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Guess recorded", body = GuessResponse),
        (status = 400, description = "Drawer guessing or round no longer active"),
        (status = 403, description = "Caller is not a member"),
        (status = 404, description = "Round not found")
    )
)]
pub async fn submit_guess(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<GuessRequest>>,
) -> Result<Json<GuessResponse>, AppError> {
    Ok(Json(round_service::guess_round(&state, &user, id, &payload.guess).await?))
}

/// Replace the drawing of the caller's round.
#[utoipa::path(
    post,
    path = "/rounds/{id}/drawing",
    tag = "rounds",
    request_body = DrawingRequest,
    params(
        ("id" = Uuid, Path, description = "Round identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Drawing stored", body = ActionResponse),
        (status = 403, description = "Caller is not the drawer"),
        (status = 404, description = "Round not found")
    )
)]
pub async fn submit_drawing(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DrawingRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    round_service::draw_round(&state, &user, id, payload.drawing_data).await?;
    Ok(Json(ActionResponse::new("drawing updated")))
}
