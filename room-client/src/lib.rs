//! Room Client - data access for the hotel rooms API
//!
//! - [`RoomClient`]: typed HTTP calls with normalized errors
//! - [`RoomStore`]: cached room list, point lookups and mutations
//! - [`shared::validation`]: the creation schema applied before submitting

pub mod config;
pub mod error;
pub mod http;
pub mod store;

pub use config::{ClientConfig, StoreConfig};
pub use error::{ClientError, ClientResult, SubmitError};
pub use http::{RoomApi, RoomClient};
pub use store::{MutationKind, RoomEvent, RoomStore, RoomsState};

// Re-export shared types for convenience
pub use shared::{
    CreateRoomRequest, Room, RoomField, RoomType, ValidationErrors, sanitize_room_number,
    validate_create_room,
};
