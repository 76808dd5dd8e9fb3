use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        chat::{ChatMessageView, ChatRequest},
        room::{
            ActionResponse, CreateRoomRequest, GameResultResponse, JoinRoomRequest, PlayerView,
            RoomDetail, RoomSummary,
        },
        round::RoundView,
    },
    error::AppError,
    identity::CurrentUser,
    services::{chat_service, room_service, round_service},
    state::SharedState,
};

/// Room lifecycle, membership and per-room reads.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/{id}", get(get_room))
        .route("/rooms/{id}/join", post(join_room))
        .route("/rooms/{id}/leave", post(leave_room))
        .route("/rooms/{id}/start", post(start_game))
        .route("/rooms/{id}/end", post(end_game))
        .route("/rooms/{id}/players", get(list_players))
        .route("/rooms/{id}/rounds", get(list_rounds))
        .route("/rooms/{id}/rounds/current", get(current_round))
        .route("/rooms/{id}/chat", get(chat_history).post(send_chat))
}

/// List rooms that are still waiting for players.
#[utoipa::path(
    get,
    path = "/rooms",
    tag = "rooms",
    responses((status = 200, description = "Open rooms", body = [RoomSummary]))
)]
pub async fn list_rooms(
    State(state): State<SharedState>,
) -> Result<Json<Vec<RoomSummary>>, AppError> {
    Ok(Json(room_service::list_open_rooms(&state).await?))
}

/// Open a new room hosted by the caller.
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "rooms",
    request_body = CreateRoomRequest,
    params(
        ("x-user-id" = String, Header, description = "Authenticated user id"),
        ("x-username" = String, Header, description = "Authenticated username")
    ),
    responses(
        (status = 201, description = "Room created", body = RoomDetail),
        (status = 400, description = "Invalid payload or unknown game"),
        (status = 401, description = "Missing identity")
    )
)]
pub async fn create_room(
    State(state): State<SharedState>,
    user: CurrentUser,
    Valid(Json(payload)): Valid<Json<CreateRoomRequest>>,
) -> Result<(StatusCode, Json<RoomDetail>), AppError> {
    let detail = room_service::create_room(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Room detail with its players and current drawer.
#[utoipa::path(
    get,
    path = "/rooms/{id}",
    tag = "rooms",
    params(("id" = Uuid, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Room detail", body = RoomDetail),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_room(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoomDetail>, AppError> {
    Ok(Json(room_service::room_detail(&state, id).await?))
}

/// Join a waiting room.
#[utoipa::path(
    post,
    path = "/rooms/{id}/join",
    tag = "rooms",
    request_body(content = JoinRoomRequest, description = "Password of private rooms"),
    params(
        ("id" = Uuid, Path, description = "Room identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id"),
        ("x-username" = String, Header, description = "Authenticated username")
    ),
    responses(
        (status = 200, description = "Joined", body = RoomDetail),
        (status = 400, description = "Room full or wrong password"),
        (status = 404, description = "Room not found or not waiting"),
        (status = 409, description = "Already a member")
    )
)]
pub async fn join_room(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<JoinRoomRequest>>,
) -> Result<Json<RoomDetail>, AppError> {
    let password = payload.and_then(|Json(request)| request.password);
    let detail = room_service::join_room(&state, &user, id, password.as_deref()).await?;
    Ok(Json(detail))
}

/// Leave a room. The host leaving closes it.
#[utoipa::path(
    post,
    path = "/rooms/{id}/leave",
    tag = "rooms",
    params(
        ("id" = Uuid, Path, description = "Room identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Left the room", body = ActionResponse),
        (status = 404, description = "Room not found or caller not a member")
    )
)]
pub async fn leave_room(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(room_service::leave_room(&state, &user, id).await?))
}

/// Start the game and open the first round.
#[utoipa::path(
    post,
    path = "/rooms/{id}/start",
    tag = "rooms",
    params(
        ("id" = Uuid, Path, description = "Room identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Game started", body = RoomDetail),
        (status = 400, description = "Not enough players or players not ready"),
        (status = 403, description = "Caller is not the host"),
        (status = 409, description = "Room is not waiting")
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RoomDetail>, AppError> {
    Ok(Json(room_service::start_game(&state, &user, id).await?))
}

/// End the game and report the winner.
#[utoipa::path(
    post,
    path = "/rooms/{id}/end",
    tag = "rooms",
    params(
        ("id" = Uuid, Path, description = "Room identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Game ended", body = GameResultResponse),
        (status = 403, description = "Caller is not the host"),
        (status = 409, description = "Room is not playing")
    )
)]
pub async fn end_game(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<GameResultResponse>, AppError> {
    Ok(Json(room_service::end_game(&state, &user, id).await?))
}

/// Players of a room, best score first.
#[utoipa::path(
    get,
    path = "/rooms/{id}/players",
    tag = "rooms",
    params(
        ("id" = Uuid, Path, description = "Room identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Players", body = [PlayerView]),
        (status = 403, description = "Caller is not a member")
    )
)]
pub async fn list_players(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PlayerView>>, AppError> {
    Ok(Json(room_service::list_players(&state, &user, id).await?))
}

/// Rounds of a room in play order.
#[utoipa::path(
    get,
    path = "/rooms/{id}/rounds",
    tag = "rounds",
    params(
        ("id" = Uuid, Path, description = "Room identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Rounds", body = [RoundView]),
        (status = 403, description = "Caller is not a member")
    )
)]
pub async fn list_rounds(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RoundView>>, AppError> {
    Ok(Json(round_service::list_rounds(&state, &user, id).await?))
}

/// The round currently being played.
#[utoipa::path(
    get,
    path = "/rooms/{id}/rounds/current",
    tag = "rounds",
    params(
        ("id" = Uuid, Path, description = "Room identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Active round", body = RoundView),
        (status = 404, description = "No active round")
    )
)]
pub async fn current_round(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RoundView>, AppError> {
    Ok(Json(round_service::current_round(&state, &user, id).await?))
}

/// Latest chat lines, newest first.
#[utoipa::path(
    get,
    path = "/rooms/{id}/chat",
    tag = "chat",
    params(
        ("id" = Uuid, Path, description = "Room identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Chat history", body = [ChatMessageView]),
        (status = 403, description = "Caller is not a member")
    )
)]
pub async fn chat_history(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessageView>>, AppError> {
    Ok(Json(chat_service::history(&state, &user, id).await?))
}

/// Post a chat line and relay it to connected members.
#[utoipa::path(
    post,
    path = "/rooms/{id}/chat",
    tag = "chat",
    request_body = ChatRequest,
    params(
        ("id" = Uuid, Path, description = "Room identifier"),
        ("x-user-id" = String, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 201, description = "Message stored", body = ChatMessageView),
        (status = 403, description = "Caller is not a member")
    )
)]
pub async fn send_chat(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<ChatRequest>>,
) -> Result<(StatusCode, Json<ChatMessageView>), AppError> {
    let message = chat_service::send_message(&state, &user, id, &payload.message).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
