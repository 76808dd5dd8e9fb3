use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification of the game room backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::games::list_games,
        crate::routes::games::get_game,
        crate::routes::rooms::list_rooms,
        crate::routes::rooms::create_room,
        crate::routes::rooms::get_room,
        crate::routes::rooms::join_room,
        crate::routes::rooms::leave_room,
        crate::routes::rooms::start_game,
        crate::routes::rooms::end_game,
        crate::routes::rooms::list_players,
        crate::routes::rooms::list_rounds,
        crate::routes::rooms::current_round,
        crate::routes::rooms::chat_history,
        crate::routes::rooms::send_chat,
        crate::routes::rounds::submit_guess,
        crate::routes::rounds::submit_drawing,
        crate::routes::players::toggle_ready,
        crate::routes::players::kick_player,
        crate::routes::stats::leaderboard,
        crate::routes::stats::user_stats,
        crate::routes::achievements::list_achievements,
        crate::routes::achievements::get_achievement,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::game::GameSummary,
            crate::dto::room::CreateRoomRequest,
            crate::dto::room::JoinRoomRequest,
            crate::dto::room::RoomSummary,
            crate::dto::room::RoomDetail,
            crate::dto::room::PlayerView,
            crate::dto::room::ActionResponse,
            crate::dto::room::GameResultResponse,
            crate::dto::round::GuessRequest,
            crate::dto::round::DrawingRequest,
            crate::dto::round::GuessView,
            crate::dto::round::RoundView,
            crate::dto::round::GuessResponse,
            crate::dto::chat::ChatRequest,
            crate::dto::chat::ChatMessageView,
            crate::dto::stats::LeaderboardEntry,
            crate::dto::stats::UserStats,
            crate::dto::achievement::AchievementView,
            crate::dto::ws::ClientMessage,
            crate::dto::ws::RoomEvent,
            crate::dao::models::RoomStatus,
            crate::config::GameType,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "games", description = "Game catalog"),
        (name = "rooms", description = "Room lifecycle and membership"),
        (name = "rounds", description = "Rounds, guesses and drawings"),
        (name = "players", description = "Readiness and moderation"),
        (name = "chat", description = "Room chat history"),
        (name = "stats", description = "Leaderboard and personal statistics"),
        (name = "achievements", description = "Achievements earned by winning games"),
        (name = "realtime", description = "Room WebSocket sessions"),
    )
)]
pub struct ApiDoc;
