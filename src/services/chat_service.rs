use std::time::SystemTime;

use uuid::Uuid;

use crate::{
    dao::models::ChatMessageEntity,
    dto::chat::ChatMessageView,
    error::ServiceError,
    identity::CurrentUser,
    services::{
        room_events,
        room_service::{load_room, require_member},
    },
    state::SharedState,
};

/// Number of messages returned by the history endpoint.
pub const CHAT_HISTORY_LIMIT: usize = 50;

/// Persist a chat line from an active member and broadcast it.
pub async fn post_message(
    state: &SharedState,
    room_id: Uuid,
    player_id: Uuid,
    text: &str,
) -> Result<ChatMessageEntity, ServiceError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ServiceError::InvalidInput("message must not be empty".into()));
    }

    let store = state.require_room_store().await?;
    let player = store
        .find_player(player_id)
        .await?
        .filter(|player| player.room_id == room_id && player.is_active)
        .ok_or_else(|| {
            ServiceError::PreconditionFailed("player is not active in this room".into())
        })?;

    let message = ChatMessageEntity {
        id: Uuid::new_v4(),
        room_id,
        player_id: player.id,
        message: text.to_owned(),
        created_at: SystemTime::now(),
        is_system_message: false,
    };
    store.insert_chat_message(message.clone()).await?;

    room_events::broadcast_chat_message(state, room_id, &player.username, &message.message);
    Ok(message)
}

/// REST chat endpoint: members only.
pub async fn send_message(
    state: &SharedState,
    user: &CurrentUser,
    room_id: Uuid,
    text: &str,
) -> Result<ChatMessageView, ServiceError> {
    let store = state.require_room_store().await?;
    load_room(store.as_ref(), room_id).await?;
    let member = require_member(store.as_ref(), room_id, user.id).await?;

    let message = post_message(state, room_id, member.id, text).await?;
    Ok(ChatMessageView::new(&message, std::slice::from_ref(&member)))
}

/// Latest messages of a room, newest first.
pub async fn history(
    state: &SharedState,
    user: &CurrentUser,
    room_id: Uuid,
) -> Result<Vec<ChatMessageView>, ServiceError> {
    let store = state.require_room_store().await?;
    load_room(store.as_ref(), room_id).await?;
    require_member(store.as_ref(), room_id, user.id).await?;

    let players = store.list_players(room_id).await?;
    let messages = store
        .list_chat_messages(room_id, CHAT_HISTORY_LIMIT)
        .await?;
    Ok(messages
        .iter()
        .map(|message| ChatMessageView::new(message, &players))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        dao::{models::RoomStatus, room_store::MemoryRoomStore},
        dto::ws::RoomEvent,
        services::test_support::{seeded_room, word_config},
        state::AppState,
    };

    #[tokio::test]
    async fn messages_are_trimmed_persisted_and_broadcast() {
        let state = AppState::with_store(word_config("cat"), Arc::new(MemoryRoomStore::new()));
        let fixture = seeded_room(&state, &["host", "alice"], RoomStatus::Waiting).await;
        let mut receiver = state.hub().subscribe(fixture.room.id, Uuid::new_v4());
        let alice = CurrentUser {
            id: fixture.players[1].user_id,
            username: "alice".into(),
        };

        let view = send_message(&state, &alice, fixture.room.id, "  hello  ")
            .await
            .unwrap();
        assert_eq!(view.message, "hello");
        assert_eq!(view.player, "alice");
        assert_eq!(
            receiver.recv().await.unwrap(),
            RoomEvent::ChatMessage {
                player: "alice".into(),
                message: "hello".into(),
            }
        );

        let history = history(&state, &alice, fixture.room.id).await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn outsiders_and_blank_messages_are_rejected() {
        let state = AppState::with_store(word_config("cat"), Arc::new(MemoryRoomStore::new()));
        let fixture = seeded_room(&state, &["host"], RoomStatus::Waiting).await;
        let outsider = CurrentUser {
            id: Uuid::new_v4(),
            username: "eve".into(),
        };

        assert!(matches!(
            send_message(&state, &outsider, fixture.room.id, "hi").await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            post_message(&state, fixture.room.id, fixture.players[0].id, "   ").await,
            Err(ServiceError::InvalidInput(_))
        ));
    }
}
