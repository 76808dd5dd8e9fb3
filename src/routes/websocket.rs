use axum::{
    Router,
    extract::{Path, State, WebSocketUpgrade},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::AppError, identity::CurrentUser, services::websocket_service, state::SharedState,
};

#[utoipa::path(
    get,
    path = "/ws/rooms/{room_id}",
    tag = "realtime",
    params(
        ("room_id" = Uuid, Path, description = "Room identifier"),
        ("user_id" = Option<String>, Query, description = "User id when headers cannot be set"),
        ("username" = Option<String>, Query, description = "Username when headers cannot be set")
    ),
    responses(
        (status = 101, description = "Switching protocols to WebSocket"),
        (status = 401, description = "Missing identity"),
        (status = 403, description = "Caller is not a member of the room"),
        (status = 404, description = "Room not found")
    )
)]
/// Upgrade the HTTP connection into a room session once the caller is known to be a member.
///
/// Refusals carry only a status code.
pub async fn ws_handler(
    State(state): State<SharedState>,
    Path(room_id): Path<Uuid>,
    user: Result<CurrentUser, AppError>,
    ws: WebSocketUpgrade,
) -> Response {
    let user = match user {
        Ok(user) => user,
        Err(err) => return err.status_code().into_response(),
    };

    let player = match websocket_service::authorize(&state, room_id, &user).await {
        Ok(player) => player,
        Err(err) => {
            debug!(%room_id, user = %user.id, error = %err, "room session refused");
            return AppError::from(err).status_code().into_response();
        }
    };

    ws.on_upgrade(move |socket| websocket_service::handle_socket(state, socket, room_id, player))
}

/// Configure the room WebSocket endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/ws/rooms/{room_id}", get(ws_handler))
}
