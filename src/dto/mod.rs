//! Request and response payloads of the REST API and the room WebSocket.

use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod achievement;
pub mod chat;
pub mod game;
pub mod health;
pub mod room;
pub mod round;
pub mod stats;
pub mod validation;
pub mod ws;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
