//! Messages exchanged between `EventStore` handles and the actor task
//! that owns the event map.

use std::fmt;

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::date_range::DateRange;
use crate::event::CalendarEvent;

pub(crate) type Reply<T> = oneshot::Sender<T>;

pub(crate) enum StoreCommand {
    FetchEvents {
        range: DateRange,
        reply: Reply<Vec<CalendarEvent>>,
    },
    FetchEvent {
        id: Uuid,
        reply: Reply<Option<CalendarEvent>>,
    },
    CreateEvent {
        event: CalendarEvent,
        reply: Reply<()>,
    },
    UpdateEvent {
        event: CalendarEvent,
        reply: Reply<()>,
    },
    DeleteEvent {
        id: Uuid,
        reply: Reply<()>,
    },
    UpdateCompleted {
        id: Uuid,
        is_completed: bool,
        reply: Reply<()>,
    },
}

impl StoreCommand {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            StoreCommand::FetchEvents { .. } => "fetch_events",
            StoreCommand::FetchEvent { .. } => "fetch_event",
            StoreCommand::CreateEvent { .. } => "create_event",
            StoreCommand::UpdateEvent { .. } => "update_event",
            StoreCommand::DeleteEvent { .. } => "delete_event",
            StoreCommand::UpdateCompleted { .. } => "update_completed",
        }
    }
}

impl fmt::Debug for StoreCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "StoreCommand::{}", self.name())
    }
}
