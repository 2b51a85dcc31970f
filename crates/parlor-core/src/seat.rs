use serde::{Deserialize, Serialize};

/// Identifier for one of the two authoritative paddle seats (1 or 2).
pub type SeatId = u8;

/// Number of authoritative seats in a match.
pub const SEAT_COUNT: usize = 2;

/// Role assigned to a connection when it is admitted.
///
/// The first two connections are bound to seats; every later connection
/// is a read-only observer that receives state but cannot act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Seat(SeatId),
    Observer,
}

impl Role {
    /// The seat bound to this role, if any.
    pub fn seat(self) -> Option<SeatId> {
        match self {
            Role::Seat(id) => Some(id),
            Role::Observer => None,
        }
    }

    pub fn is_seated(self) -> bool {
        matches!(self, Role::Seat(_))
    }
}
