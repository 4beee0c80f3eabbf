//! HTTP client for the rooms API

use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use shared::{ApiErrorBody, CreateRoomRequest, Room, RoomType};

/// Rooms API operations
///
/// [`RoomClient`] is the network implementation; the store only depends on
/// this trait so it can be driven by any source of rooms.
#[async_trait]
pub trait RoomApi: Send + Sync {
    /// `POST /rooms`
    async fn create_room(&self, request: &CreateRoomRequest) -> ClientResult<Room>;

    /// `GET /rooms`
    async fn list_rooms(&self) -> ClientResult<Vec<Room>>;

    /// `GET /rooms/{id}`; a miss is [`ClientError::NotFound`]
    async fn get_room_by_id(&self, id: i64) -> ClientResult<Room>;

    /// `GET /rooms/number/{room_number}`; a miss is `Ok(None)`
    async fn get_room_by_number(&self, room_number: &str) -> ClientResult<Option<Room>>;

    /// `PUT /rooms/{id}`
    async fn update_room(&self, id: i64, request: &CreateRoomRequest) -> ClientResult<Room>;

    /// `DELETE /rooms/{id}`
    async fn delete_room(&self, id: i64) -> ClientResult<()>;

    /// `GET /rooms/available?checkIn&checkOut[&roomType]`
    ///
    /// The server checks the date range; a rejected range is
    /// [`ClientError::Business`].
    async fn available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        room_type: Option<RoomType>,
    ) -> ClientResult<Vec<Room>>;
}

/// Network rooms client
#[derive(Debug, Clone)]
pub struct RoomClient {
    client: Client,
    base_url: Url,
}

impl RoomClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::Config(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await?;
        tracing::debug!(
            status = response.status().as_u16(),
            url = %response.url(),
            "Rooms API response"
        );
        Ok(response)
    }

    /// Decode a 2xx body, or normalize the error body
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn error_from(response: Response) -> ClientError {
        let status = response.status();
        match response.text().await {
            Ok(text) => {
                let err = classify_error(status, &text);
                tracing::warn!(status = status.as_u16(), error = %err, "Rooms API call failed");
                err
            }
            Err(e) => e.into(),
        }
    }
}

/// Normalize a non-2xx response body
pub fn classify_error(status: StatusCode, body: &str) -> ClientError {
    let Ok(body) = serde_json::from_str::<ApiErrorBody>(body) else {
        return ClientError::unknown(status.as_u16());
    };
    if let Some(fields) = body.field_errors() {
        return ClientError::validation(fields.clone());
    }
    if let Some(message) = body.business_message() {
        return ClientError::Business(message.to_string());
    }
    ClientError::unknown(status.as_u16())
}

#[async_trait]
impl RoomApi for RoomClient {
    async fn create_room(&self, request: &CreateRoomRequest) -> ClientResult<Room> {
        let url = self.url(&["rooms"]);
        let response = self.send(self.client.post(url).json(request)).await?;
        Self::handle_response(response).await
    }

    async fn list_rooms(&self) -> ClientResult<Vec<Room>> {
        let url = self.url(&["rooms"]);
        let response = self.send(self.client.get(url)).await?;
        Self::handle_response(response).await
    }

    async fn get_room_by_id(&self, id: i64) -> ClientResult<Room> {
        let url = self.url(&["rooms", &id.to_string()]);
        let response = self.send(self.client.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::room_not_found(id));
        }
        Self::handle_response(response).await
    }

    async fn get_room_by_number(&self, room_number: &str) -> ClientResult<Option<Room>> {
        let url = self.url(&["rooms", "number", room_number]);
        let response = self.send(self.client.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::handle_response(response).await.map(Some)
    }

    async fn update_room(&self, id: i64, request: &CreateRoomRequest) -> ClientResult<Room> {
        let url = self.url(&["rooms", &id.to_string()]);
        let response = self.send(self.client.put(url).json(request)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::room_not_found(id));
        }
        Self::handle_response(response).await
    }

    async fn delete_room(&self, id: i64) -> ClientResult<()> {
        let url = self.url(&["rooms", &id.to_string()]);
        let response = self.send(self.client.delete(url)).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ClientError::room_not_found(id)),
            status if status.is_success() => Ok(()),
            _ => Err(Self::error_from(response).await),
        }
    }

    async fn available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        room_type: Option<RoomType>,
    ) -> ClientResult<Vec<Room>> {
        let mut url = self.url(&["rooms", "available"]);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("checkIn", &check_in.to_string())
                .append_pair("checkOut", &check_out.to_string());
            if let Some(room_type) = room_type {
                query.append_pair("roomType", room_type.as_str());
            }
        }
        let response = self.send(self.client.get(url)).await?;
        Self::handle_response(response).await
    }
}
