use tracing::warn;

use crate::{
    dto::health::{HealthResponse, HealthStatus},
    state::SharedState,
};

/// Check the storage backend and describe the node's state.
///
/// A failed health check reports `degraded` right away; the storage supervisor decides when to
/// actually drop the backend.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let status = match state.room_store().await {
        Some(store) => match store.health_check().await {
            Ok(()) => HealthStatus::Ok,
            Err(err) => {
                warn!(error = %err, "storage health check failed");
                HealthStatus::Degraded
            }
        },
        None => HealthStatus::Degraded,
    };

    HealthResponse {
        status,
        live_rooms: state.hub().room_count(),
    }
}
