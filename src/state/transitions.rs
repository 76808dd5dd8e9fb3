use std::{future::Future, time::SystemTime};

use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::models::RoomEntity,
    error::ServiceError,
    state::{
        SharedState,
        lifecycle::{LifecycleEvent, Transition},
    },
};

/// Move a room through a lifecycle transition.
///
/// Holds the room gate for the whole call. `work` runs after the transition is
/// validated and before it is persisted; if it fails or times out the room keeps
/// its current status. Returns the work output and the updated room.
pub async fn run_room_transition<F, Fut, T>(
    state: &SharedState,
    room_id: Uuid,
    event: LifecycleEvent,
    work: F,
) -> Result<(T, RoomEntity), ServiceError>
where
    F: FnOnce(RoomEntity) -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    let _gate = state.lock_room(room_id).await;
    let store = state.require_room_store().await?;
    let mut room = store
        .find_room(room_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("room {room_id} not found")))?;

    let transition = Transition::plan(room.status, event)?;

    let work_future = work(room.clone());
    let value = match state.transition_timeout() {
        Some(limit) => match timeout(limit, work_future).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%room_id, ?event, "room transition timed out");
                return Err(ServiceError::Timeout);
            }
        },
        None => work_future.await,
    }?;

    transition.apply(&mut room, SystemTime::now());
    store.save_room(room.clone()).await?;
    info!(
        %room_id,
        from = transition.from.as_str(),
        to = transition.to.as_str(),
        "room status changed"
    );

    Ok((value, room))
}
