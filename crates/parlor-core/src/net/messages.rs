use serde::{Deserialize, Serialize};

use crate::seat::SeatId;

/// Messages a client may send over the socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Absolute paddle target for the sender's seat. Out-of-range values
    /// are clamped on apply, never rejected.
    PaddleMove { y: f32 },
    /// Request a full match reset. Honored only while the match is in a
    /// terminal state; a no-op otherwise.
    RestartGame,
}

/// Messages the server pushes to clients.
///
/// Generic over the state payload so the protocol layer stays independent
/// of any one game's state shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage<S> {
    /// Sent once on admission to a seated participant.
    PlayerAssigned { player_id: SeatId },
    /// Sent once on admission to a read-only observer.
    Spectator,
    /// Full authoritative state snapshot, fanned out after every tick.
    GameState { state: S },
}
