// room-client/tests/common/mod.rs
// In-process rooms API for integration tests

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use room_client::{ClientConfig, CreateRoomRequest, Room, RoomClient, RoomType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use shared::ApiErrorBody;
use shared::validation::messages;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const DUPLICATE_MESSAGE: &str = "Ya existe una habitación con este número";
pub const DATE_RANGE_MESSAGE: &str = "La fecha de entrada debe ser anterior a la fecha de salida";

pub fn room(id: i64, number: &str, room_type: RoomType, capacity: i32, price: &str) -> Room {
    Room {
        id,
        room_number: number.to_string(),
        room_type,
        capacity,
        price_per_night: Decimal::from_str(price).unwrap(),
        is_available: true,
    }
}

pub fn seed_rooms() -> Vec<Room> {
    let mut occupied = room(2, "201", RoomType::Superior, 3, "150.00");
    occupied.is_available = false;
    vec![room(1, "101", RoomType::Standard, 2, "100.00"), occupied]
}

pub fn suite_request() -> CreateRoomRequest {
    CreateRoomRequest {
        room_number: "301".to_string(),
        room_type: RoomType::Suite,
        capacity: 4,
        price_per_night: Decimal::from_str("250.00").unwrap(),
    }
}

/// Backend state behind the mock routes
#[derive(Clone, Default)]
pub struct MockBackend {
    pub rooms: Arc<Mutex<Vec<Room>>>,
    pub list_calls: Arc<AtomicUsize>,
    /// Raw JSON of the last create/update body
    pub last_body: Arc<Mutex<Option<Value>>>,
}

impl MockBackend {
    pub fn with_rooms(rooms: Vec<Room>) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(rooms)),
            ..Default::default()
        }
    }

    pub fn last_body(&self) -> Option<Value> {
        self.last_body.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/rooms", get(list_rooms).post(create_room))
            .route("/api/rooms/available", get(available_rooms))
            .route(
                "/api/rooms/{id}",
                get(get_room).put(update_room).delete(delete_room),
            )
            .route("/api/rooms/number/{number}", get(get_room_by_number))
            .with_state(self.clone())
    }
}

fn error(status: StatusCode, title: &str, message: &str) -> Response {
    (
        status,
        Json(ApiErrorBody::message(status.as_u16(), title, message)),
    )
        .into_response()
}

fn not_found(id: i64) -> Response {
    error(
        StatusCode::NOT_FOUND,
        "Habitación no encontrada",
        &format!("Habitación con ID {id} no encontrada"),
    )
}

fn check(request: &CreateRoomRequest) -> Option<Response> {
    let mut errors = BTreeMap::new();
    if request.capacity > 10 {
        errors.insert("capacity".to_string(), messages::CAPACITY_MAX.to_string());
    }
    if request.price_per_night <= Decimal::ZERO {
        errors.insert("pricePerNight".to_string(), messages::PRICE_MIN.to_string());
    }
    if errors.is_empty() {
        return None;
    }
    Some(
        (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorBody::validation(400, errors)),
        )
            .into_response(),
    )
}

/// Decode a room payload the way a strict server does: the price must be
/// a JSON number.
fn decode(backend: &MockBackend, body: Value) -> Result<CreateRoomRequest, Response> {
    *backend.last_body.lock().unwrap() = Some(body.clone());
    if !body["pricePerNight"].is_number() {
        let mut errors = BTreeMap::new();
        errors.insert("pricePerNight".to_string(), messages::PRICE_REQUIRED.to_string());
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiErrorBody::validation(400, errors)),
        )
            .into_response());
    }
    serde_json::from_value(body)
        .map_err(|e| error(StatusCode::BAD_REQUEST, "Solicitud inválida", &e.to_string()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityQuery {
    check_in: NaiveDate,
    check_out: NaiveDate,
    room_type: Option<RoomType>,
}

async fn available_rooms(
    State(backend): State<MockBackend>,
    Query(query): Query<AvailabilityQuery>,
) -> Response {
    if query.check_in >= query.check_out {
        return error(
            StatusCode::BAD_REQUEST,
            "Rango de fechas inválido",
            DATE_RANGE_MESSAGE,
        );
    }
    let rooms = backend.rooms.lock().unwrap();
    let free: Vec<Room> = rooms
        .iter()
        .filter(|r| r.is_available && query.room_type.is_none_or(|t| r.room_type == t))
        .cloned()
        .collect();
    Json(free).into_response()
}

async fn list_rooms(State(backend): State<MockBackend>) -> Json<Vec<Room>> {
    backend.list_calls.fetch_add(1, Ordering::SeqCst);
    Json(backend.rooms.lock().unwrap().clone())
}

async fn create_room(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let request = match decode(&backend, body) {
        Ok(request) => request,
        Err(rejection) => return rejection,
    };
    if let Some(rejection) = check(&request) {
        return rejection;
    }
    let mut rooms = backend.rooms.lock().unwrap();
    if rooms.iter().any(|r| r.room_number == request.room_number) {
        return error(
            StatusCode::CONFLICT,
            "Número de habitación duplicado",
            DUPLICATE_MESSAGE,
        );
    }
    let id = rooms.iter().map(|r| r.id).max().unwrap_or(0) + 1;
    let created = Room {
        id,
        room_number: request.room_number,
        room_type: request.room_type,
        capacity: request.capacity,
        price_per_night: request.price_per_night,
        is_available: true,
    };
    rooms.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn get_room(State(backend): State<MockBackend>, Path(id): Path<i64>) -> Response {
    let rooms = backend.rooms.lock().unwrap();
    match rooms.iter().find(|r| r.id == id) {
        Some(room) => Json(room.clone()).into_response(),
        None => not_found(id),
    }
}

async fn get_room_by_number(
    State(backend): State<MockBackend>,
    Path(number): Path<String>,
) -> Response {
    let rooms = backend.rooms.lock().unwrap();
    match rooms.iter().find(|r| r.room_number == number) {
        Some(room) => Json(room.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn update_room(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let request = match decode(&backend, body) {
        Ok(request) => request,
        Err(rejection) => return rejection,
    };
    if let Some(rejection) = check(&request) {
        return rejection;
    }
    let mut rooms = backend.rooms.lock().unwrap();
    let Some(slot) = rooms.iter_mut().find(|r| r.id == id) else {
        return not_found(id);
    };
    slot.room_number = request.room_number;
    slot.room_type = request.room_type;
    slot.capacity = request.capacity;
    slot.price_per_night = request.price_per_night;
    Json(slot.clone()).into_response()
}

async fn delete_room(State(backend): State<MockBackend>, Path(id): Path<i64>) -> Response {
    let mut rooms = backend.rooms.lock().unwrap();
    let before = rooms.len();
    rooms.retain(|r| r.id != id);
    if rooms.len() == before {
        return not_found(id);
    }
    StatusCode::NO_CONTENT.into_response()
}

/// Serve `app` on an ephemeral port, returning the API base URL
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

pub async fn client_for(app: Router) -> RoomClient {
    let base_url = serve(app).await;
    RoomClient::new(&ClientConfig::new(base_url)).unwrap()
}
