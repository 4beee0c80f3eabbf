// room-client/examples/rooms.rs
// List rooms, optionally creating one first
//
// Usage:
//   cargo run -p room-client --example rooms
//   cargo run -p room-client --example rooms -- '{"roomNumber":"301","roomType":"SUITE","capacity":4,"pricePerNight":250.00}'

use room_client::{ClientConfig, RoomStore, RoomType, SubmitError, sanitize_room_number};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(base_url = %config.base_url, "Connecting to rooms API");
    let store = RoomStore::new(config.build_client()?);

    if let Some(raw) = std::env::args().nth(1) {
        let mut input: serde_json::Value = serde_json::from_str(&raw)?;
        let sanitized = input["roomNumber"].as_str().map(sanitize_room_number);
        if let Some(number) = sanitized {
            input["roomNumber"] = number.into();
        }
        match store.submit(&input).await {
            Ok(room) => println!("Habitación {} creada (id {})", room.room_number, room.id),
            Err(SubmitError::Invalid(errors)) => {
                for error in errors.iter() {
                    println!("  {}: {}", error.field.as_str(), error.message);
                }
                return Ok(());
            }
            Err(SubmitError::Client(err)) => {
                println!("Error: {err}");
                return Ok(());
            }
        }
    }

    let rooms = store.read().await?;
    if rooms.is_empty() {
        println!("No hay habitaciones registradas");
    }
    for room in &rooms {
        let status = if room.is_available { "disponible" } else { "ocupada" };
        println!(
            "{:>6}  {:<10} {:>2} pers.  {:>10}  {}",
            room.room_number,
            room.room_type.label(),
            room.capacity,
            room.formatted_price(),
            status
        );
    }

    println!();
    for room_type in RoomType::ALL {
        let (low, high) = room_type.suggested_price_range();
        println!("{}: {} ({low} - {high})", room_type.label(), room_type.description());
    }

    store.shutdown();
    Ok(())
}
