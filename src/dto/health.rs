use serde::Serialize;
use utoipa::ToSchema;

/// Coarse service state reported by `/healthcheck`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Storage answers and room requests are served.
    Ok,
    /// Storage is unreachable; room requests fail with 503.
    Degraded,
}

/// Body of the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Rooms with at least one live WebSocket session on this node.
    pub live_rooms: usize,
}
