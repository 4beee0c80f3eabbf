//! Published store state and mutation events

use crate::ClientError;
use shared::Room;

/// Observable state of the room list
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RoomsState {
    /// Nothing fetched yet
    #[default]
    Idle,
    /// First fetch in flight, no data to show
    Loading,
    /// Data available; `revalidating` while a refetch is in flight
    Ready { rooms: Vec<Room>, revalidating: bool },
    /// Last fetch failed; previous data was discarded
    Error(ClientError),
}

impl RoomsState {
    /// Rooms to render (empty unless `Ready`)
    pub fn rooms(&self) -> &[Room] {
        match self {
            RoomsState::Ready { rooms, .. } => rooms,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RoomsState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, RoomsState::Ready { .. })
    }

    pub fn is_revalidating(&self) -> bool {
        matches!(self, RoomsState::Ready { revalidating: true, .. })
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            RoomsState::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Kind of write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

/// Outcome of a write, published to every `events()` subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    Created(Room),
    Updated(Room),
    Deleted(i64),
    Failed { kind: MutationKind, error: ClientError },
}

impl RoomEvent {
    pub fn is_success(&self) -> bool {
        !matches!(self, RoomEvent::Failed { .. })
    }

    /// User-facing notification text
    pub fn message(&self) -> String {
        match self {
            RoomEvent::Created(_) => "Habitación registrada exitosamente".to_string(),
            RoomEvent::Updated(_) => "Habitación actualizada exitosamente".to_string(),
            RoomEvent::Deleted(_) => "Habitación eliminada exitosamente".to_string(),
            RoomEvent::Failed { error, .. } => error.to_string(),
        }
    }
}
