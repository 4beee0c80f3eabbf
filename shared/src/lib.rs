//! Shared types for the rooms client
//!
//! Wire models, API error bodies and the room creation schema.
//! Nothing in this crate performs I/O.

pub mod models;
pub mod response;
pub mod validation;

// Re-exports
pub use models::{CreateRoomRequest, Room, RoomType};
pub use response::ApiErrorBody;
pub use serde::{Deserialize, Serialize};
pub use validation::{RoomField, ValidationErrors, sanitize_room_number, validate_create_room};
