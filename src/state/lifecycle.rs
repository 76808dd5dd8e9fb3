use std::time::SystemTime;

use thiserror::Error;

use crate::dao::models::{RoomEntity, RoomStatus};

/// Events that move a room through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Host starts the game from the waiting room.
    StartGame,
    /// Host ends a running game.
    EndGame,
}

/// Error returned when an event cannot be applied to a room in its current status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while the room is {}", from.as_str())]
pub struct InvalidTransition {
    /// Status the room was in when the event was received.
    pub from: RoomStatus,
    /// The rejected event.
    pub event: LifecycleEvent,
}

/// A validated status change that has not been written to the room yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Status before the transition.
    pub from: RoomStatus,
    /// Status after the transition.
    pub to: RoomStatus,
    /// Event that triggered it.
    pub event: LifecycleEvent,
}

impl Transition {
    /// Plan the transition for `event` from the room's current status.
    pub fn plan(from: RoomStatus, event: LifecycleEvent) -> Result<Self, InvalidTransition> {
        let to = match (from, event) {
            (RoomStatus::Waiting, LifecycleEvent::StartGame) => RoomStatus::Playing,
            (RoomStatus::Playing, LifecycleEvent::EndGame) => RoomStatus::Finished,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(Self { from, to, event })
    }

    /// Write the new status and its timestamp onto the room.
    pub fn apply(&self, room: &mut RoomEntity, at: SystemTime) {
        room.status = self.to;
        match self.to {
            RoomStatus::Playing => room.started_at = Some(at),
            RoomStatus::Finished => room.finished_at = Some(at),
            RoomStatus::Waiting => {}
        }
    }
}
