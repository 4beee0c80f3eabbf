//! Room store - the single owner of cached room data
//!
//! ```text
//! presentation ──read/refresh/create──▶ RoomStore ──▶ RoomApi (network)
//!      ▲                                   │
//!      │  watch<RoomsState>                │ RoomsCache (mutex, never held across .await)
//!      └───────── broadcast<RoomEvent> ◀───┘
//! ```
//!
//! Reads are served from cache while fresh (stale-while-revalidate after
//! that). Creates prepend the server's room and invalidate the list so the
//! next read reconciles with the server.

mod cache;
mod state;

pub use state::{MutationKind, RoomEvent, RoomsState};

use crate::http::RoomApi;
use crate::{ClientError, ClientResult, StoreConfig, SubmitError};
use cache::{FetchOutcome, FetchTicket, ReadPlan, RoomsCache};
use chrono::NaiveDate;
use serde_json::Value;
use shared::{CreateRoomRequest, Room, RoomType, validate_create_room};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Event channel capacity - enough for a burst of form submissions
const EVENT_CAPACITY: usize = 64;

struct Inner<A> {
    api: A,
    config: StoreConfig,
    cache: Mutex<RoomsCache>,
    state_tx: watch::Sender<RoomsState>,
    events_tx: broadcast::Sender<RoomEvent>,
    shutdown: CancellationToken,
}

/// Cache-coherent access to rooms
///
/// Create one per session and hand clones to consumers; clones share state.
pub struct RoomStore<A> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for RoomStore<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: RoomApi + 'static> RoomStore<A> {
    pub fn new(api: A) -> Self {
        Self::with_config(api, StoreConfig::default())
    }

    pub fn with_config(api: A, config: StoreConfig) -> Self {
        let (state_tx, _) = watch::channel(RoomsState::Idle);
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                api,
                config,
                cache: Mutex::new(RoomsCache::default()),
                state_tx,
                events_tx,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// The underlying API
    pub fn api(&self) -> &A {
        &self.inner.api
    }

    // ========== Observation ==========

    /// Current list state, without I/O
    pub fn rooms(&self) -> RoomsState {
        self.inner.state_tx.borrow().clone()
    }

    /// Subscribe to list state changes. Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<RoomsState> {
        self.inner.state_tx.subscribe()
    }

    /// Subscribe to mutation outcomes
    pub fn events(&self) -> broadcast::Receiver<RoomEvent> {
        self.inner.events_tx.subscribe()
    }

    // ========== Read path ==========

    /// Read the room list
    ///
    /// Fresh data is returned without a network call. Stale or invalidated
    /// data is returned immediately while a background refetch runs. Without
    /// data this waits for a fetch (starting one if none is in flight).
    pub async fn read(&self) -> ClientResult<Vec<Room>> {
        let now = Instant::now();
        let stale_time = self.inner.config.stale_time;
        let Some(plan) = self.update(|cache| cache.plan_read(now, stale_time)) else {
            return self.inner.api.list_rooms().await;
        };

        match plan {
            ReadPlan::Fresh(rooms) => {
                tracing::debug!(count = rooms.len(), "Rooms served from cache");
                Ok(rooms)
            }
            ReadPlan::Stale(rooms, ticket) => {
                if let Some(ticket) = ticket {
                    tracing::debug!("Rooms stale, revalidating in background");
                    let store = self.clone();
                    tokio::spawn(async move {
                        let _ = store.run_fetch(ticket).await;
                    });
                }
                Ok(rooms)
            }
            ReadPlan::Fetch(ticket) => self.run_fetch(ticket).await,
            ReadPlan::Wait => self.wait_for_fetch().await,
        }
    }

    /// Fetch the list from the server regardless of freshness
    ///
    /// Cached rooms stay visible (`revalidating`) while the request runs. On
    /// failure the store moves to `Error`; call again to retry.
    pub async fn refresh(&self) -> ClientResult<Vec<Room>> {
        match self.update(RoomsCache::begin_fetch) {
            Some(ticket) => self.run_fetch(ticket).await,
            None => self.inner.api.list_rooms().await,
        }
    }

    /// User-initiated retry after a failed fetch
    pub async fn retry(&self) -> ClientResult<Vec<Room>> {
        self.refresh().await
    }

    /// Mark cached data stale; the next read goes to the network
    pub fn invalidate(&self) {
        self.update(RoomsCache::invalidate);
    }

    /// Look up a room by id, served from cache while fresh
    pub async fn room(&self, id: i64) -> ClientResult<Room> {
        let now = Instant::now();
        let stale_time = self.inner.config.stale_time;
        if let Some(room) = self.inspect(|cache| cache.fresh_room(id, now, stale_time)) {
            tracing::debug!(id, "Room served from cache");
            return Ok(room);
        }

        let result = self.inner.api.get_room_by_id(id).await;
        let now = Instant::now();
        match &result {
            Ok(room) => {
                self.update(|cache| cache.remember(room.clone(), now));
            }
            Err(ClientError::NotFound(_)) => {
                self.update(|cache| cache.forget(id));
            }
            Err(_) => {}
        }
        result
    }

    /// Look up a room by number; `None` when the server has no such room
    pub async fn room_by_number(&self, room_number: &str) -> ClientResult<Option<Room>> {
        let now = Instant::now();
        let stale_time = self.inner.config.stale_time;
        if let Some(cached) =
            self.inspect(|cache| cache.fresh_room_by_number(room_number, now, stale_time))
        {
            tracing::debug!(room_number, "Room lookup served from cache");
            return Ok(cached);
        }

        let result = self.inner.api.get_room_by_number(room_number).await;
        let now = Instant::now();
        match &result {
            Ok(Some(room)) => {
                self.update(|cache| cache.remember(room.clone(), now));
            }
            Ok(None) => {
                self.update(|cache| cache.remember_missing_number(room_number, now));
            }
            Err(_) => {}
        }
        result
    }

    /// Rooms free for a stay, optionally of one type
    ///
    /// Not cached: availability depends on the requested dates.
    pub async fn available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        room_type: Option<RoomType>,
    ) -> ClientResult<Vec<Room>> {
        self.inner
            .api
            .available_rooms(check_in, check_out, room_type)
            .await
    }

    // ========== Write path ==========

    /// Create a room
    ///
    /// Exactly one request, no retry. The cache only changes once the server
    /// confirms; the returned room is the server's record.
    pub async fn create_room(&self, request: &CreateRoomRequest) -> ClientResult<Room> {
        let result = self.inner.api.create_room(request).await;
        let now = Instant::now();
        match &result {
            Ok(room) => {
                tracing::info!(id = room.id, room_number = %room.room_number, "Room created");
                if self
                    .update(|cache| cache.apply_created(room.clone(), now))
                    .is_some()
                {
                    self.emit(RoomEvent::Created(room.clone()));
                }
            }
            Err(err) => self.fail(MutationKind::Create, err),
        }
        result
    }

    /// Validate raw form input, then create the room
    ///
    /// Invalid input never reaches the network.
    pub async fn submit(&self, input: &Value) -> Result<Room, SubmitError> {
        let request = validate_create_room(input)?;
        Ok(self.create_room(&request).await?)
    }

    /// Replace a room's fields
    pub async fn update_room(&self, id: i64, request: &CreateRoomRequest) -> ClientResult<Room> {
        let result = self.inner.api.update_room(id, request).await;
        let now = Instant::now();
        match &result {
            Ok(room) => {
                tracing::info!(id = room.id, "Room updated");
                if self
                    .update(|cache| cache.apply_updated(room.clone(), now))
                    .is_some()
                {
                    self.emit(RoomEvent::Updated(room.clone()));
                }
            }
            Err(err) => self.fail(MutationKind::Update, err),
        }
        result
    }

    pub async fn delete_room(&self, id: i64) -> ClientResult<()> {
        let result = self.inner.api.delete_room(id).await;
        match &result {
            Ok(()) => {
                tracing::info!(id, "Room deleted");
                if self.update(|cache| cache.apply_deleted(id)).is_some() {
                    self.emit(RoomEvent::Deleted(id));
                }
            }
            Err(err) => self.fail(MutationKind::Delete, err),
        }
        result
    }

    // ========== Lifecycle ==========

    /// Tear the store down
    ///
    /// In-flight requests still complete for their callers, but their
    /// results no longer touch the cache or reach subscribers.
    pub fn shutdown(&self) {
        tracing::debug!("Room store shut down");
        self.inner.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    // ========== Internals ==========

    /// Fetch the list until a result lands that no mutation overtook
    async fn run_fetch(&self, mut ticket: FetchTicket) -> ClientResult<Vec<Room>> {
        loop {
            let result = self.inner.api.list_rooms().await;
            if let Err(err) = &result {
                tracing::warn!(error = %err, "Failed to fetch rooms");
            }
            let now = Instant::now();
            match self.update(|cache| cache.finish_fetch(ticket, &result, now)) {
                Some(FetchOutcome::Refetch(next)) => {
                    tracing::debug!("Rooms changed during fetch, fetching again");
                    ticket = next;
                }
                _ => return result,
            }
        }
    }

    /// Wait for the fetch another caller started
    ///
    /// A list seeded by a create while the fetch is out shows as
    /// `revalidating`, so this waits for the server's answer as well.
    async fn wait_for_fetch(&self) -> ClientResult<Vec<Room>> {
        let mut rx = self.subscribe();
        let settled = tokio::select! {
            state = rx.wait_for(|s| !s.is_loading() && !s.is_revalidating()) => {
                state.map(|s| (*s).clone()).ok()
            }
            _ = self.inner.shutdown.cancelled() => None,
        };

        match settled {
            Some(RoomsState::Ready { rooms, .. }) => Ok(rooms),
            Some(RoomsState::Error(err)) => Err(err),
            _ => self.inner.api.list_rooms().await,
        }
    }

    fn fail(&self, kind: MutationKind, err: &ClientError) {
        tracing::warn!(?kind, error = %err, "Room mutation failed");
        self.emit(RoomEvent::Failed {
            kind,
            error: err.clone(),
        });
    }

    fn emit(&self, event: RoomEvent) {
        if self.is_shut_down() {
            return;
        }
        // No subscribers is fine
        let _ = self.inner.events_tx.send(event);
    }

    fn inspect<R>(&self, f: impl FnOnce(&RoomsCache) -> R) -> R {
        let cache = self.inner.cache.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cache)
    }

    /// Mutate the cache and publish the resulting state.
    /// `None` once the store is shut down.
    fn update<R>(&self, f: impl FnOnce(&mut RoomsCache) -> R) -> Option<R> {
        if self.is_shut_down() {
            return None;
        }
        let mut cache = self.inner.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let out = f(&mut cache);
        let next = cache.state();
        self.inner.state_tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
        Some(out)
    }
}
