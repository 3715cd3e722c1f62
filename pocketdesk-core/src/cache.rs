//! In-process mirror of the event backend.
//!
//! Every successful backend call is copied into the cache with the same
//! payload, so reads right after a write see that write. Entries are only
//! ever inserted, overwritten, or removed by an explicit delete; nothing is
//! evicted. Views read exclusively from here.
//!
//! The map lives inside a `watch` channel: each committed change bumps the
//! channel version, which is how views learn they need to re-derive.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::date_range::DateRange;
use crate::error::Result;
use crate::event::{CalendarEvent, sort_by_date};
use crate::store::EventRepository;

pub type EventMap = HashMap<Uuid, CalendarEvent>;

pub struct EventCache {
    repository: Arc<dyn EventRepository>,
    events: watch::Sender<EventMap>,
}

impl EventCache {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        let (events, _) = watch::channel(EventMap::new());
        EventCache { repository, events }
    }

    /// Receiver that is marked changed after every committed mutation.
    pub fn subscribe(&self) -> watch::Receiver<EventMap> {
        self.events.subscribe()
    }

    // READS:

    pub fn get(&self, id: &Uuid) -> Option<CalendarEvent> {
        self.events.borrow().get(id).cloned()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.events.borrow().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// All cached events, earliest first.
    pub fn events(&self) -> Vec<CalendarEvent> {
        let mut events: Vec<_> = self.events.borrow().values().cloned().collect();
        sort_by_date(&mut events);
        events
    }

    /// Cached events inside `range`, earliest first.
    pub fn events_in(&self, range: &DateRange) -> Vec<CalendarEvent> {
        let mut events: Vec<_> = self
            .events
            .borrow()
            .values()
            .filter(|e| range.contains(e.date))
            .cloned()
            .collect();
        sort_by_date(&mut events);
        events
    }

    /// Cached events on `day`, earliest first.
    pub fn events_on(&self, day: NaiveDate) -> Vec<CalendarEvent> {
        self.events_in(&DateRange::day(day))
    }

    // BACKEND-BACKED OPERATIONS:

    /// Fetch `range` from the backend and merge the results in.
    pub async fn load_events(&self, range: DateRange) -> Result<()> {
        let fetched = self.repository.fetch_events(range).await?;
        debug!(count = fetched.len(), from = %range.from, to = %range.to, "loaded events");

        if fetched.is_empty() {
            return Ok(());
        }
        self.events.send_modify(|events| {
            for event in fetched {
                events.insert(event.id, event);
            }
        });
        Ok(())
    }

    /// Refresh one event; drop it from the cache if the backend no longer has it.
    pub async fn load_event(&self, id: Uuid) -> Result<()> {
        match self.repository.fetch_event(id).await? {
            Some(event) => self.commit(event),
            None => self.forget(&id),
        }
        Ok(())
    }

    pub async fn create_event(&self, event: CalendarEvent) -> Result<()> {
        self.repository.create_event(event.clone()).await?;
        debug!(id = %event.id, title = %event.title, "created event");
        self.commit(event);
        Ok(())
    }

    pub async fn update_event(&self, event: CalendarEvent) -> Result<()> {
        self.repository.update_event(event.clone()).await?;
        debug!(id = %event.id, "updated event");
        self.commit(event);
        Ok(())
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<()> {
        self.repository.delete_event(id).await?;
        debug!(%id, "deleted event");
        self.forget(&id);
        Ok(())
    }

    pub async fn update_completed(&self, is_completed: bool, id: Uuid) -> Result<()> {
        self.repository.update_completed(is_completed, id).await?;
        debug!(%id, is_completed, "updated completion");
        self.events.send_if_modified(|events| match events.get_mut(&id) {
            Some(event) if event.is_completed != is_completed => {
                event.is_completed = is_completed;
                true
            }
            _ => false,
        });
        Ok(())
    }

    fn commit(&self, event: CalendarEvent) {
        self.events.send_modify(|events| {
            events.insert(event.id, event);
        });
    }

    fn forget(&self, id: &Uuid) {
        self.events
            .send_if_modified(|events| events.remove(id).is_some());
    }
}
