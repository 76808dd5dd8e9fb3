//! Business logic shared by the REST handlers and the room WebSocket sessions.

/// Achievements earned by finishing games.
pub mod achievement_service;
/// Chat persistence and relay.
pub mod chat_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Read access to the configured game catalog.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Typed constructors for the events published to room subscribers.
pub mod room_events;
/// Room creation, membership and game lifecycle.
pub mod room_service;
/// Guess adjudication, drawing updates and round advancement.
pub mod round_service;
/// Leaderboard and per-user statistics.
pub mod stats_service;
/// Storage connection supervisor toggling degraded mode.
pub mod storage_supervisor;
/// WebSocket connection and message handling service.
pub mod websocket_service;

#[cfg(test)]
mod test_support;
