//! Data models
//!
//! Wire types of the rooms API, shared by the client and its tests.
//! All IDs are `i64` (server-assigned).

pub mod room;

// Re-exports
pub use room::*;
