//! Event backend.
//!
//! `EventRepository` is the seam between the cache and whatever actually
//! holds the events. The only implementation shipped is the in-memory
//! `EventStore` actor with simulated latency.

mod backend;
mod protocol;

use async_trait::async_trait;
use uuid::Uuid;

use crate::date_range::DateRange;
use crate::error::Result;
use crate::event::CalendarEvent;

pub use backend::{EventStore, sample_events};

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Events whose `date` lies in `range` (inclusive), earliest first.
    async fn fetch_events(&self, range: DateRange) -> Result<Vec<CalendarEvent>>;

    async fn fetch_event(&self, id: Uuid) -> Result<Option<CalendarEvent>>;

    /// Insert or replace by id.
    async fn create_event(&self, event: CalendarEvent) -> Result<()>;

    /// Insert or replace by id.
    async fn update_event(&self, event: CalendarEvent) -> Result<()>;

    /// Unknown ids are ignored.
    async fn delete_event(&self, id: Uuid) -> Result<()>;

    /// Unknown ids are ignored.
    async fn update_completed(&self, is_completed: bool, id: Uuid) -> Result<()>;
}
