use std::collections::HashSet;

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::dto::ws::RoomEvent;

/// Identifier of a single WebSocket connection.
pub type ConnectionId = Uuid;

/// Default number of events buffered per room before slow receivers lag.
pub const DEFAULT_ROOM_CAPACITY: usize = 64;

struct RoomGroup {
    sender: broadcast::Sender<RoomEvent>,
    members: HashSet<ConnectionId>,
}

/// In-process publish/subscribe registry keyed by room.
///
/// Each room owns one broadcast channel. Groups are created on first
/// subscription and dropped when their last connection unsubscribes.
pub struct RoomHub {
    groups: DashMap<Uuid, RoomGroup>,
    capacity: usize,
}

impl Default for RoomHub {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_CAPACITY)
    }
}

impl RoomHub {
    /// Construct an empty hub whose room channels buffer `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            groups: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Register `connection` in the room's group and return its event receiver.
    pub fn subscribe(
        &self,
        room_id: Uuid,
        connection: ConnectionId,
    ) -> broadcast::Receiver<RoomEvent> {
        let mut group = self.groups.entry(room_id).or_insert_with(|| RoomGroup {
            sender: broadcast::channel(self.capacity).0,
            members: HashSet::new(),
        });
        group.members.insert(connection);
        group.sender.subscribe()
    }

    /// Send an event to every connection of the room. Returns how many receivers got it.
    pub fn publish(&self, room_id: Uuid, event: RoomEvent) -> usize {
        let Some(group) = self.groups.get(&room_id) else {
            debug!(%room_id, "no subscribers for room event");
            return 0;
        };
        group.sender.send(event).unwrap_or(0)
    }

    /// Remove `connection` from the room's group, dropping the group once empty.
    pub fn unsubscribe(&self, room_id: Uuid, connection: ConnectionId) {
        let empty = match self.groups.get_mut(&room_id) {
            Some(mut group) => {
                group.members.remove(&connection);
                group.members.is_empty()
            }
            None => return,
        };

        if empty {
            self.groups
                .remove_if(&room_id, |_, group| group.members.is_empty());
        }
    }

    /// Number of rooms with at least one subscribed connection.
    pub fn room_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of connections currently subscribed to the room.
    pub fn subscriber_count(&self, room_id: Uuid) -> usize {
        self.groups
            .get(&room_id)
            .map(|group| group.members.len())
            .unwrap_or(0)
    }
}
