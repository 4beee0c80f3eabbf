//! In-memory room cache
//!
//! Plain data, no I/O. The store holds it behind a mutex and derives the
//! published [`RoomsState`] from it after every change.

use super::state::RoomsState;
use crate::{ClientError, ClientResult};
use shared::Room;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    fetched_at: Instant,
}

impl<T> Entry<T> {
    fn new(value: T, fetched_at: Instant) -> Self {
        Self { value, fetched_at }
    }

    fn is_fresh(&self, now: Instant, stale_time: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < stale_time
    }
}

/// Identifies one list fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FetchTicket {
    seq: u64,
    /// Mutation epoch when the request was issued
    epoch: u64,
}

/// What the fetcher does once its request resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchOutcome {
    /// Result applied (list replaced, or error recorded)
    Settled,
    /// A newer fetch owns the list
    Superseded,
    /// The list changed while the request was out; fetch again
    Refetch(FetchTicket),
}

/// How a read should be served
#[derive(Debug)]
pub(crate) enum ReadPlan {
    /// Fresh data, no network
    Fresh(Vec<Room>),
    /// Stale data; start a background refetch when a ticket is given
    Stale(Vec<Room>, Option<FetchTicket>),
    /// No data, a fetch is already in flight
    Wait,
    /// No data, fetch now
    Fetch(FetchTicket),
}

#[derive(Debug, Default)]
pub(crate) struct RoomsCache {
    list: Option<Entry<Vec<Room>>>,
    invalidated: bool,
    error: Option<ClientError>,
    /// Latest issued list fetch
    fetch_seq: u64,
    in_flight: bool,
    /// Bumped by every mutation applied to the list
    epoch: u64,
    by_id: HashMap<i64, Entry<Room>>,
    by_number: HashMap<String, Entry<Option<Room>>>,
}

impl RoomsCache {
    pub(crate) fn state(&self) -> RoomsState {
        match (&self.list, &self.error) {
            (Some(entry), _) => RoomsState::Ready {
                rooms: entry.value.clone(),
                revalidating: self.in_flight,
            },
            (None, _) if self.in_flight => RoomsState::Loading,
            (None, Some(err)) => RoomsState::Error(err.clone()),
            (None, None) => RoomsState::Idle,
        }
    }

    pub(crate) fn plan_read(&mut self, now: Instant, stale_time: Duration) -> ReadPlan {
        match &self.list {
            Some(entry) if !self.invalidated && entry.is_fresh(now, stale_time) => {
                ReadPlan::Fresh(entry.value.clone())
            }
            Some(entry) => {
                let rooms = entry.value.clone();
                let ticket = (!self.in_flight).then(|| self.begin_fetch());
                ReadPlan::Stale(rooms, ticket)
            }
            None if self.in_flight => ReadPlan::Wait,
            None => ReadPlan::Fetch(self.begin_fetch()),
        }
    }

    pub(crate) fn begin_fetch(&mut self) -> FetchTicket {
        self.fetch_seq += 1;
        self.in_flight = true;
        FetchTicket {
            seq: self.fetch_seq,
            epoch: self.epoch,
        }
    }

    /// Apply the outcome of a list fetch.
    ///
    /// Results of superseded fetches are dropped. A successful result is
    /// also dropped when a mutation landed after the request was issued;
    /// the fetch then stays in flight under a new ticket so the caller
    /// asks the server again.
    pub(crate) fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: &ClientResult<Vec<Room>>,
        now: Instant,
    ) -> FetchOutcome {
        if ticket.seq != self.fetch_seq {
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(_) if ticket.epoch != self.epoch => {
                self.invalidated = true;
                FetchOutcome::Refetch(self.begin_fetch())
            }
            Ok(rooms) => {
                for room in rooms {
                    self.remember(room.clone(), now);
                }
                self.list = Some(Entry::new(rooms.clone(), now));
                self.in_flight = false;
                self.invalidated = false;
                self.error = None;
                FetchOutcome::Settled
            }
            Err(err) => {
                self.list = None;
                self.in_flight = false;
                self.invalidated = false;
                self.error = Some(err.clone());
                FetchOutcome::Settled
            }
        }
    }

    pub(crate) fn invalidate(&mut self) {
        self.invalidated = true;
        self.by_id.clear();
        self.by_number.clear();
    }

    pub(crate) fn apply_created(&mut self, room: Room, now: Instant) {
        self.epoch += 1;
        self.remember(room.clone(), now);
        match &mut self.list {
            Some(entry) => entry.value.insert(0, room),
            None => self.list = Some(Entry::new(vec![room], now)),
        }
        self.error = None;
        self.invalidated = true;
    }

    pub(crate) fn apply_updated(&mut self, room: Room, now: Instant) {
        self.epoch += 1;
        self.by_number
            .retain(|_, e| e.value.as_ref().is_none_or(|r| r.id != room.id));
        self.remember(room.clone(), now);
        if let Some(entry) = &mut self.list
            && let Some(slot) = entry.value.iter_mut().find(|r| r.id == room.id)
        {
            *slot = room;
        }
        self.invalidated = true;
    }

    pub(crate) fn apply_deleted(&mut self, id: i64) {
        self.epoch += 1;
        self.forget(id);
        if let Some(entry) = &mut self.list {
            entry.value.retain(|r| r.id != id);
        }
        self.invalidated = true;
    }

    pub(crate) fn fresh_room(&self, id: i64, now: Instant, stale_time: Duration) -> Option<Room> {
        self.by_id
            .get(&id)
            .filter(|e| e.is_fresh(now, stale_time))
            .map(|e| e.value.clone())
    }

    /// `Some(None)` is a cached miss
    pub(crate) fn fresh_room_by_number(
        &self,
        room_number: &str,
        now: Instant,
        stale_time: Duration,
    ) -> Option<Option<Room>> {
        self.by_number
            .get(room_number)
            .filter(|e| e.is_fresh(now, stale_time))
            .map(|e| e.value.clone())
    }

    pub(crate) fn remember(&mut self, room: Room, now: Instant) {
        self.by_number
            .insert(room.room_number.clone(), Entry::new(Some(room.clone()), now));
        self.by_id.insert(room.id, Entry::new(room, now));
    }

    pub(crate) fn remember_missing_number(&mut self, room_number: &str, now: Instant) {
        self.by_number
            .insert(room_number.to_string(), Entry::new(None, now));
    }

    pub(crate) fn forget(&mut self, id: i64) {
        self.by_id.remove(&id);
        self.by_number
            .retain(|_, e| e.value.as_ref().is_none_or(|r| r.id != id));
    }
}
