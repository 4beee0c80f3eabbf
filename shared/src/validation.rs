//! Room creation schema
//!
//! Client-side mirror of the server's room rules. Every field is checked,
//! and within a field the first failing rule wins. Uniqueness of the room
//! number can only be enforced by the server.

use crate::models::{CreateRoomRequest, RoomType};
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ── Limits ──────────────────────────────────────────────────────────

pub const MAX_ROOM_NUMBER_LEN: usize = 10;
pub const MIN_CAPACITY: i32 = 1;
pub const MAX_CAPACITY: i32 = 10;
/// Currency scale for prices
pub const MAX_PRICE_DECIMALS: u32 = 2;

// ── Messages (same wording as the server) ───────────────────────────

pub mod messages {
    pub const ROOM_NUMBER_REQUIRED: &str = "El número de habitación es obligatorio";
    pub const ROOM_NUMBER_NOT_BLANK: &str = "El número de habitación no puede estar vacío";
    pub const ROOM_NUMBER_TOO_LONG: &str =
        "El número de habitación no puede exceder 10 caracteres";
    pub const ROOM_TYPE_REQUIRED: &str = "El tipo de habitación es obligatorio";
    pub const CAPACITY_REQUIRED: &str = "La capacidad es obligatoria";
    pub const CAPACITY_NOT_INTEGER: &str = "La capacidad debe ser un número entero";
    pub const CAPACITY_MIN: &str = "La capacidad debe ser al menos 1 persona";
    pub const CAPACITY_MAX: &str = "La capacidad no puede exceder 10 personas";
    pub const PRICE_REQUIRED: &str = "El precio por noche es obligatorio";
    pub const PRICE_MIN: &str = "El precio debe ser mayor a 0";
    pub const PRICE_DECIMALS: &str = "El precio debe tener máximo 2 decimales";
    pub const PRICE_OUT_OF_RANGE: &str = "El precio está fuera del rango permitido";
}

/// Fields of a room creation payload, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoomField {
    RoomNumber,
    RoomType,
    Capacity,
    PricePerNight,
}

impl RoomField {
    pub const ALL: [RoomField; 4] = [
        RoomField::RoomNumber,
        RoomField::RoomType,
        RoomField::Capacity,
        RoomField::PricePerNight,
    ];

    /// JSON field name
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomField::RoomNumber => "roomNumber",
            RoomField::RoomType => "roomType",
            RoomField::Capacity => "capacity",
            RoomField::PricePerNight => "pricePerNight",
        }
    }
}

impl fmt::Display for RoomField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: RoomField,
    pub message: &'static str,
}

/// All rejected fields of one payload, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.joined())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Message for `field`, if it was rejected
    pub fn get(&self, field: RoomField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    pub fn contains(&self, field: RoomField) -> bool {
        self.get(field).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = RoomField> + '_ {
        self.errors.iter().map(|e| e.field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn joined(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

type Check<T> = Result<T, &'static str>;

/// Validate an arbitrary JSON payload into a [`CreateRoomRequest`].
///
/// Missing and wrong-typed fields are reported like any other rule
/// violation. The returned request carries the trimmed room number.
pub fn validate_create_room(input: &Value) -> Result<CreateRoomRequest, ValidationErrors> {
    let field = |name: RoomField| input.get(name.as_str());

    let room_number = check_room_number(field(RoomField::RoomNumber));
    let room_type = check_room_type(field(RoomField::RoomType));
    let capacity = check_capacity(field(RoomField::Capacity));
    let price = check_price(field(RoomField::PricePerNight));

    match (room_number, room_type, capacity, price) {
        (Ok(room_number), Ok(room_type), Ok(capacity), Ok(price_per_night)) => {
            Ok(CreateRoomRequest {
                room_number,
                room_type,
                capacity,
                price_per_night,
            })
        }
        (room_number, room_type, capacity, price) => {
            let errors = [
                (RoomField::RoomNumber, room_number.err()),
                (RoomField::RoomType, room_type.err()),
                (RoomField::Capacity, capacity.err()),
                (RoomField::PricePerNight, price.err()),
            ]
            .into_iter()
            .filter_map(|(field, message)| message.map(|message| FieldError { field, message }))
            .collect();
            Err(ValidationErrors { errors })
        }
    }
}

impl CreateRoomRequest {
    /// Re-run the creation schema over an already typed request.
    pub fn validate(&self) -> Result<CreateRoomRequest, ValidationErrors> {
        let value = serde_json::to_value(self).unwrap_or(Value::Null);
        validate_create_room(&value)
    }
}

/// Strip markup-significant characters (`<`, `>`, `"`, `'`) from a room
/// number typed by a user, then trim it.
pub fn sanitize_room_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\''))
        .collect::<String>()
        .trim()
        .to_string()
}

fn check_room_number(value: Option<&Value>) -> Check<String> {
    let raw = value
        .and_then(Value::as_str)
        .ok_or(messages::ROOM_NUMBER_REQUIRED)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(messages::ROOM_NUMBER_NOT_BLANK);
    }
    if trimmed.chars().count() > MAX_ROOM_NUMBER_LEN {
        return Err(messages::ROOM_NUMBER_TOO_LONG);
    }
    Ok(trimmed.to_string())
}

fn check_room_type(value: Option<&Value>) -> Check<RoomType> {
    value
        .and_then(Value::as_str)
        .and_then(RoomType::parse)
        .ok_or(messages::ROOM_TYPE_REQUIRED)
}

fn check_capacity(value: Option<&Value>) -> Check<i32> {
    let number = value
        .and_then(Value::as_number)
        .ok_or(messages::CAPACITY_REQUIRED)?;
    let capacity = integral(number).ok_or(messages::CAPACITY_NOT_INTEGER)?;
    if capacity < i64::from(MIN_CAPACITY) {
        return Err(messages::CAPACITY_MIN);
    }
    if capacity > i64::from(MAX_CAPACITY) {
        return Err(messages::CAPACITY_MAX);
    }
    // Bounded by MAX_CAPACITY above
    Ok(capacity as i32)
}

fn check_price(value: Option<&Value>) -> Check<Decimal> {
    let number = value
        .and_then(Value::as_number)
        .ok_or(messages::PRICE_REQUIRED)?;
    let price = decimal(number).ok_or_else(|| unrepresentable_price(number))?;
    if price <= Decimal::ZERO {
        return Err(messages::PRICE_MIN);
    }
    if price.normalize().scale() > MAX_PRICE_DECIMALS {
        return Err(messages::PRICE_DECIMALS);
    }
    Ok(price.normalize())
}

/// Rule broken by a number too large or too precise for `Decimal`
fn unrepresentable_price(number: &Number) -> &'static str {
    match number.as_f64() {
        Some(f) if f <= 0.0 => messages::PRICE_MIN,
        Some(f) if f < 1.0 => messages::PRICE_DECIMALS,
        _ => messages::PRICE_OUT_OF_RANGE,
    }
}

/// Integer value of a JSON number; `4.0` counts as integral.
fn integral(number: &Number) -> Option<i64> {
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    if number.is_u64() {
        // Larger than i64::MAX, out of any range we accept
        return Some(i64::MAX);
    }
    let f = number.as_f64()?;
    if f.fract() != 0.0 {
        return None;
    }
    Some(f.clamp(i64::MIN as f64, i64::MAX as f64) as i64)
}

/// Exact decimal value of a JSON number, using its shortest textual form
/// so that `10.005` keeps three decimals.
fn decimal(number: &Number) -> Option<Decimal> {
    if let Some(n) = number.as_i64() {
        return Some(Decimal::from(n));
    }
    Decimal::from_str(&number.to_string())
        .or_else(|_| Decimal::from_scientific(&number.to_string()))
        .ok()
}
