//! Room Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Room category offered by the hotel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    Standard,
    Superior,
    Suite,
}

impl RoomType {
    /// All room types, in display order
    pub const ALL: [RoomType; 3] = [RoomType::Standard, RoomType::Superior, RoomType::Suite];

    /// Wire representation (`STANDARD`, `SUPERIOR`, `SUITE`)
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Standard => "STANDARD",
            RoomType::Superior => "SUPERIOR",
            RoomType::Suite => "SUITE",
        }
    }

    /// Parse the exact wire representation. Case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            RoomType::Standard => "Estándar",
            RoomType::Superior => "Superior",
            RoomType::Suite => "Suite",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RoomType::Standard => "Habitación básica con comodidades estándar",
            RoomType::Superior => "Habitación con amenidades adicionales y mejor vista",
            RoomType::Suite => "Suite de lujo con sala de estar separada",
        }
    }

    /// Suggested nightly price range `(min, max)` for this type
    pub fn suggested_price_range(&self) -> (Decimal, Decimal) {
        match self {
            RoomType::Standard => (Decimal::from(50), Decimal::from(150)),
            RoomType::Superior => (Decimal::from(100), Decimal::from(250)),
            RoomType::Suite => (Decimal::from(200), Decimal::from(500)),
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Room entity (server-owned)
///
/// `id` and `is_available` are assigned by the server and never set by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    pub room_number: String,
    pub room_type: RoomType,
    pub capacity: i32,
    pub price_per_night: Decimal,
    pub is_available: bool,
}

impl Room {
    /// Price rendered with exactly two decimals (e.g. `150.50`)
    pub fn formatted_price(&self) -> String {
        format!("{:.2}", self.price_per_night)
    }
}

/// Create room payload
///
/// Also used as the body of `PUT /rooms/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_number: String,
    pub room_type: RoomType,
    pub capacity: i32,
    pub price_per_night: Decimal,
}
