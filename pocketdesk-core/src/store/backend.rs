//! Simulated backend: an event map owned by a single actor task.
//!
//! Callers hold cheap `EventStore` handles. Each call sleeps for the
//! configured latency on the caller's task, then sends a command to the
//! actor, which applies commands one at a time. Concurrent writers are
//! therefore totally ordered and readers never see a half-applied write.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as DateDuration, Local, NaiveDateTime};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::config::{DeskConfig, LatencyConfig};
use crate::constants::STORE_QUEUE_SIZE;
use crate::date_range::DateRange;
use crate::error::{Error, Result};
use crate::event::{CalendarEvent, sort_by_date};
use crate::store::EventRepository;
use crate::store::protocol::StoreCommand;

/// The map itself. Only ever touched by the actor task.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    events: HashMap<Uuid, CalendarEvent>,
}

impl StoreState {
    pub(crate) fn with_events(events: impl IntoIterator<Item = CalendarEvent>) -> Self {
        StoreState {
            events: events.into_iter().map(|e| (e.id, e)).collect(),
        }
    }

    pub(crate) fn events_in(&self, range: &DateRange) -> Vec<CalendarEvent> {
        let mut found: Vec<CalendarEvent> = self
            .events
            .values()
            .filter(|e| range.contains(e.date))
            .cloned()
            .collect();
        sort_by_date(&mut found);
        found
    }

    pub(crate) fn upsert(&mut self, event: CalendarEvent) {
        self.events.insert(event.id, event);
    }

    pub(crate) fn remove(&mut self, id: &Uuid) {
        self.events.remove(id);
    }

    pub(crate) fn set_completed(&mut self, id: &Uuid, is_completed: bool) {
        if let Some(event) = self.events.get_mut(id) {
            event.is_completed = is_completed;
        }
    }

    fn apply(&mut self, command: StoreCommand) {
        trace!(command = command.name(), "store command");

        // A dropped reply receiver means the caller was cancelled; the
        // write still happened, so there is nothing to undo.
        match command {
            StoreCommand::FetchEvents { range, reply } => {
                let _ = reply.send(self.events_in(&range));
            }
            StoreCommand::FetchEvent { id, reply } => {
                let _ = reply.send(self.events.get(&id).cloned());
            }
            StoreCommand::CreateEvent { event, reply }
            | StoreCommand::UpdateEvent { event, reply } => {
                self.upsert(event);
                let _ = reply.send(());
            }
            StoreCommand::DeleteEvent { id, reply } => {
                self.remove(&id);
                let _ = reply.send(());
            }
            StoreCommand::UpdateCompleted {
                id,
                is_completed,
                reply,
            } => {
                self.set_completed(&id, is_completed);
                let _ = reply.send(());
            }
        }
    }
}

/// Handle to the in-memory event backend.
#[derive(Clone, Debug)]
pub struct EventStore {
    commands: mpsc::Sender<StoreCommand>,
    latency: LatencyConfig,
}

impl EventStore {
    /// Spawn the actor on the current Tokio runtime.
    ///
    /// The actor stops once every handle has been dropped.
    pub fn spawn(latency: LatencyConfig, events: impl IntoIterator<Item = CalendarEvent>) -> Self {
        let (commands, mut rx) = mpsc::channel(STORE_QUEUE_SIZE);
        let mut state = StoreState::with_events(events);
        debug!(events = state.events.len(), "starting event store");

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                state.apply(command);
            }
            debug!("event store stopped");
        });

        EventStore { commands, latency }
    }

    /// Spawn a store according to `config`, seeded with the sample events
    /// unless seeding is disabled.
    pub fn from_config(config: &DeskConfig) -> Self {
        let seed = if config.seed_sample_events {
            sample_events(Local::now().naive_local())
        } else {
            Vec::new()
        };
        Self::spawn(config.latency, seed)
    }

    async fn request<T>(
        &self,
        delay: Duration,
        make: impl FnOnce(oneshot::Sender<T>) -> StoreCommand,
    ) -> Result<T> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let (reply, response) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| Error::StoreClosed)?;
        response.await.map_err(|_| Error::StoreClosed)
    }
}

#[async_trait]
impl EventRepository for EventStore {
    async fn fetch_events(&self, range: DateRange) -> Result<Vec<CalendarEvent>> {
        self.request(self.latency.fetch_range(), |reply| {
            StoreCommand::FetchEvents { range, reply }
        })
        .await
    }

    async fn fetch_event(&self, id: Uuid) -> Result<Option<CalendarEvent>> {
        self.request(self.latency.single(), |reply| StoreCommand::FetchEvent {
            id,
            reply,
        })
        .await
    }

    async fn create_event(&self, event: CalendarEvent) -> Result<()> {
        self.request(self.latency.single(), |reply| StoreCommand::CreateEvent {
            event,
            reply,
        })
        .await
    }

    async fn update_event(&self, event: CalendarEvent) -> Result<()> {
        self.request(self.latency.single(), |reply| StoreCommand::UpdateEvent {
            event,
            reply,
        })
        .await
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        self.request(self.latency.single(), |reply| StoreCommand::DeleteEvent {
            id,
            reply,
        })
        .await
    }

    async fn update_completed(&self, is_completed: bool, id: Uuid) -> Result<()> {
        self.request(self.latency.single(), |reply| {
            StoreCommand::UpdateCompleted {
                id,
                is_completed,
                reply,
            }
        })
        .await
    }
}

/// The three example events the app starts with.
pub fn sample_events(now: NaiveDateTime) -> Vec<CalendarEvent> {
    vec![
        CalendarEvent::new("Team meeting", now).with_notes("Weekly progress check"),
        CalendarEvent::new("Project review", now + DateDuration::days(2))
            .with_notes("Go over the Q4 deliverables"),
        CalendarEvent::new("Design meeting", now + DateDuration::days(5))
            .with_notes("UI/UX for the new feature")
            .completed(true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn march() -> DateRange {
        DateRange::month(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
    }

    #[test]
    fn test_state_range_filter_is_inclusive_and_sorted() {
        let state = StoreState::with_events([
            CalendarEvent::new("b", at(20, 15)),
            CalendarEvent::new("a", at(20, 9)),
            CalendarEvent::new("edge", at(21, 0)),
            CalendarEvent::new("out", at(22, 9)),
        ]);
        let range = DateRange::new(at(20, 0), at(21, 0));
        let titles: Vec<_> = state.events_in(&range).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, ["a", "b", "edge"]);
    }

    #[test]
    fn test_state_missing_ids_are_noops() {
        let mut state = StoreState::with_events([CalendarEvent::new("a", at(1, 9))]);
        state.remove(&Uuid::new_v4());
        state.set_completed(&Uuid::new_v4(), true);
        assert_eq!(state.events.len(), 1);
        assert!(!state.events.values().next().unwrap().is_completed);
    }

    #[tokio::test]
    async fn test_create_then_fetch_returns_event_once() {
        let store = EventStore::spawn(LatencyConfig::none(), []);
        let event = CalendarEvent::new("Dentist", at(12, 10)).with_notes("Bring forms");

        store.create_event(event.clone()).await.unwrap();

        let fetched = store.fetch_events(march()).await.unwrap();
        assert_eq!(fetched, vec![event.clone()]);
        assert_eq!(store.fetch_event(event.id).await.unwrap(), Some(event));
    }

    #[tokio::test]
    async fn test_update_is_upsert() {
        let store = EventStore::spawn(LatencyConfig::none(), []);
        let mut event = CalendarEvent::new("Gym", at(3, 7));

        store.update_event(event.clone()).await.unwrap();
        event.title = "Gym (legs)".to_string();
        store.update_event(event.clone()).await.unwrap();

        assert_eq!(store.fetch_events(march()).await.unwrap(), vec![event]);
    }

    #[tokio::test]
    async fn test_delete_and_complete_missing_ids() {
        let event = CalendarEvent::new("Call mom", at(5, 18));
        let store = EventStore::spawn(LatencyConfig::none(), [event.clone()]);

        store.delete_event(Uuid::new_v4()).await.unwrap();
        store.update_completed(true, Uuid::new_v4()).await.unwrap();
        assert_eq!(store.fetch_events(march()).await.unwrap(), vec![event.clone()]);

        store.update_completed(true, event.id).await.unwrap();
        let stored = store.fetch_event(event.id).await.unwrap().unwrap();
        assert!(stored.is_completed);

        store.delete_event(event.id).await.unwrap();
        assert_eq!(store.fetch_event(event.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_writes_are_all_applied() {
        let store = EventStore::spawn(LatencyConfig::none(), []);
        let mut handles = Vec::new();
        for day in 1..=20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create_event(CalendarEvent::new(format!("day {day}"), at(day, 12)))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.fetch_events(march()).await.unwrap().len(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_wait_for_simulated_latency() {
        let store = EventStore::spawn(LatencyConfig::default(), []);
        let started = tokio::time::Instant::now();

        store.fetch_events(march()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(100));

        let started = tokio::time::Instant::now();
        store.delete_event(Uuid::new_v4()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_sample_events() {
        let now = at(10, 14);
        let samples = sample_events(now);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].date, now);
        assert_eq!(samples[1].date, at(12, 14));
        assert_eq!(samples[2].date, at(15, 14));
        assert!(samples[2].is_completed);
        assert!(!samples[0].is_completed && !samples[1].is_completed);
    }
}
