//! The calendar tab's view model.
//!
//! Everything here is derived from the `EventCache`: the month grid, and the
//! event list for the selected day. The derived state is published through
//! a `watch` channel so the UI can re-render whenever it changes, and a
//! background observer re-derives it whenever the cache commits a change.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Serialize, Serializer};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::EventCache;
use crate::calendar::day_cell::{DayCell, build_month_grid};
use crate::calendar::month::{WeekStart, shift_month};
use crate::date_range::DateRange;
use crate::error::Error;
use crate::event::CalendarEvent;

/// What the calendar tab renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarSnapshot {
    pub current_month: NaiveDate,
    pub selected_date: Option<NaiveDate>,
    pub days_in_month: Vec<DayCell>,
    pub events_for_selected_date: Vec<CalendarEvent>,
    pub shows_only_incomplete: bool,
    /// Most recent backend failure, kept until the next successful action.
    #[serde(serialize_with = "error_message")]
    pub last_error: Option<Error>,
    #[serde(rename = "is_loading", serialize_with = "any_in_flight")]
    loads_in_flight: usize,
}

impl CalendarSnapshot {
    fn new(current_month: NaiveDate) -> Self {
        CalendarSnapshot {
            current_month,
            selected_date: None,
            days_in_month: Vec::new(),
            events_for_selected_date: Vec::new(),
            shows_only_incomplete: false,
            last_error: None,
            loads_in_flight: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loads_in_flight > 0
    }

    fn recompute_grid(&mut self, cache: &EventCache, week_start: WeekStart) {
        self.days_in_month =
            build_month_grid(self.current_month, week_start, |day| cache.events_on(day));
    }

    fn recompute_selection(&mut self, cache: &EventCache) {
        let Some(day) = self.selected_date else {
            self.events_for_selected_date.clear();
            return;
        };

        let only_incomplete = self.shows_only_incomplete;
        self.events_for_selected_date = cache
            .events_on(day)
            .into_iter()
            .filter(|event| !only_incomplete || !event.is_completed)
            .collect();
    }

    fn recompute(&mut self, cache: &EventCache, week_start: WeekStart) {
        self.recompute_grid(cache, week_start);
        self.recompute_selection(cache);
    }
}

fn any_in_flight<S: Serializer>(loads: &usize, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(*loads > 0)
}

fn error_message<S: Serializer>(error: &Option<Error>, serializer: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_some(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

/// State shared between the view and its spawned tasks.
#[derive(Clone)]
struct Shared {
    cache: Arc<EventCache>,
    week_start: WeekStart,
    state: Arc<watch::Sender<CalendarSnapshot>>,
}

impl Shared {
    fn update(&self, f: impl FnOnce(&mut CalendarSnapshot)) {
        self.state.send_modify(f);
    }

    async fn load_current_month(&self) {
        let loading = MonthLoad::start(self);
        let month = loading.month;

        let result = self.cache.load_events(DateRange::month(month)).await;

        self.update(|state| match result {
            Ok(()) => state.recompute(&self.cache, self.week_start),
            Err(err) => {
                warn!(%month, error = %err, "failed to load events");
                state.last_error = Some(err);
            }
        });
    }
}

/// Counts a month load as in flight until dropped, including when the
/// load future is cancelled before it finishes.
struct MonthLoad<'a> {
    shared: &'a Shared,
    month: NaiveDate,
}

impl<'a> MonthLoad<'a> {
    fn start(shared: &'a Shared) -> Self {
        let mut month = NaiveDate::MIN;
        shared.update(|state| {
            state.loads_in_flight += 1;
            month = state.current_month;
        });
        MonthLoad { shared, month }
    }
}

impl Drop for MonthLoad<'_> {
    fn drop(&mut self) {
        self.shared.update(|state| state.loads_in_flight -= 1);
    }
}

pub struct CalendarViewState {
    shared: Shared,
    observer: JoinHandle<()>,
}

impl CalendarViewState {
    /// View of the current month. Must be called inside a Tokio runtime.
    pub fn new(cache: Arc<EventCache>, week_start: WeekStart) -> Self {
        Self::with_month(cache, week_start, Local::now().date_naive())
    }

    /// View starting on the month containing `month`.
    pub fn with_month(cache: Arc<EventCache>, week_start: WeekStart, month: NaiveDate) -> Self {
        let mut initial = CalendarSnapshot::new(month);
        initial.recompute_grid(&cache, week_start);
        let (state, _) = watch::channel(initial);

        let shared = Shared {
            cache,
            week_start,
            state: Arc::new(state),
        };

        let observer = {
            let shared = shared.clone();
            let mut changes = shared.cache.subscribe();
            tokio::spawn(async move {
                while changes.changed().await.is_ok() {
                    debug!("event cache changed, re-deriving calendar view");
                    shared.update(|state| state.recompute(&shared.cache, shared.week_start));
                }
            })
        };

        CalendarViewState { shared, observer }
    }

    // READS:

    pub fn snapshot(&self) -> CalendarSnapshot {
        self.shared.state.borrow().clone()
    }

    /// Receiver marked changed whenever the derived state changes.
    pub fn subscribe(&self) -> watch::Receiver<CalendarSnapshot> {
        self.shared.state.subscribe()
    }

    pub fn current_month(&self) -> NaiveDate {
        self.shared.state.borrow().current_month
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.shared.state.borrow().selected_date
    }

    pub fn days_in_month(&self) -> Vec<DayCell> {
        self.shared.state.borrow().days_in_month.clone()
    }

    pub fn events_for_selected_date(&self) -> Vec<CalendarEvent> {
        self.shared.state.borrow().events_for_selected_date.clone()
    }

    pub fn shows_only_incomplete(&self) -> bool {
        self.shared.state.borrow().shows_only_incomplete
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().is_loading()
    }

    pub fn last_error(&self) -> Option<Error> {
        self.shared.state.borrow().last_error.clone()
    }

    pub fn week_start(&self) -> WeekStart {
        self.shared.week_start
    }

    // ACTIONS:

    /// Load the visible month from the backend (on first appearance).
    pub async fn load_current_month(&self) {
        self.shared.load_current_month().await;
    }

    /// Select a day (or nothing) and show its events.
    pub fn select_date(&self, date: Option<NaiveDate>) {
        let cache = &self.shared.cache;
        self.shared.update(|state| {
            state.selected_date = date;
            state.recompute_selection(cache);
        });
    }

    pub fn set_shows_only_incomplete(&self, only_incomplete: bool) {
        let cache = &self.shared.cache;
        self.shared.update(|state| {
            state.shows_only_incomplete = only_incomplete;
            state.recompute_selection(cache);
        });
    }

    pub fn clear_error(&self) {
        self.shared.update(|state| state.last_error = None);
    }

    /// Show the next month right away and load its events in the background.
    /// The returned handle completes once the load has been applied.
    pub fn move_to_next_month(&self) -> JoinHandle<()> {
        self.move_month(1)
    }

    /// Show the previous month right away and load its events in the background.
    pub fn move_to_previous_month(&self) -> JoinHandle<()> {
        self.move_month(-1)
    }

    fn move_month(&self, delta: i32) -> JoinHandle<()> {
        let week_start = self.shared.week_start;
        let cache = &self.shared.cache;
        self.shared.update(|state| {
            state.current_month = shift_month(state.current_month, delta);
            state.recompute_grid(cache, week_start);
        });

        let shared = self.shared.clone();
        tokio::spawn(async move { shared.load_current_month().await })
    }

    /// Flip an event's completion flag.
    ///
    /// The rendered list changes immediately. If the backend rejects the
    /// change, the list is put back exactly as it was before the flip and the
    /// failure is recorded in `last_error`.
    pub async fn toggle_event_completion(&self, id: Uuid) {
        let cache = &self.shared.cache;
        let Some(event) = cache.get(&id) else {
            debug!(%id, "toggle for unknown event ignored");
            return;
        };
        let is_completed = !event.is_completed;

        let mut previous = Vec::new();
        self.shared.update(|state| {
            previous = state.events_for_selected_date.clone();
            if let Some(shown) = state
                .events_for_selected_date
                .iter_mut()
                .find(|e| e.id == id)
            {
                shown.is_completed = is_completed;
            }
        });

        match cache.update_completed(is_completed, id).await {
            Ok(()) => self.shared.update(|state| {
                state.last_error = None;
                state.recompute_selection(cache);
            }),
            Err(err) => {
                warn!(%id, error = %err, "failed to update event completion");
                self.shared.update(|state| {
                    state.events_for_selected_date = previous;
                    state.last_error = Some(err);
                });
            }
        }
    }

    /// Delete an event. Failures are logged and recorded, never retried.
    pub async fn delete_event(&self, id: Uuid) {
        let cache = &self.shared.cache;
        let week_start = self.shared.week_start;

        match cache.delete_event(id).await {
            Ok(()) => self.shared.update(|state| {
                state.last_error = None;
                state.recompute(cache, week_start);
            }),
            Err(err) => {
                warn!(%id, error = %err, "failed to delete event");
                self.shared.update(|state| state.last_error = Some(err));
            }
        }
    }
}

impl Drop for CalendarViewState {
    fn drop(&mut self) {
        self.observer.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LatencyConfig;
    use crate::error::Result;
    use crate::store::{EventRepository, EventStore};
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: u32, h: u32) -> NaiveDateTime {
        date(2025, 3, d).and_hms_opt(h, 0, 0).unwrap()
    }

    /// Wraps the in-memory store and fails writes while `offline` is set.
    struct FlakyRepository {
        inner: EventStore,
        offline: AtomicBool,
    }

    impl FlakyRepository {
        fn check(&self) -> Result<()> {
            if self.offline.load(Ordering::SeqCst) {
                Err(Error::Backend("offline".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl EventRepository for FlakyRepository {
        async fn fetch_events(&self, range: DateRange) -> Result<Vec<CalendarEvent>> {
            self.check()?;
            self.inner.fetch_events(range).await
        }
        async fn fetch_event(&self, id: Uuid) -> Result<Option<CalendarEvent>> {
            self.check()?;
            self.inner.fetch_event(id).await
        }
        async fn create_event(&self, event: CalendarEvent) -> Result<()> {
            self.check()?;
            self.inner.create_event(event).await
        }
        async fn update_event(&self, event: CalendarEvent) -> Result<()> {
            self.check()?;
            self.inner.update_event(event).await
        }
        async fn delete_event(&self, id: Uuid) -> Result<()> {
            self.check()?;
            self.inner.delete_event(id).await
        }
        async fn update_completed(&self, is_completed: bool, id: Uuid) -> Result<()> {
            self.check()?;
            self.inner.update_completed(is_completed, id).await
        }
    }

    fn flaky(events: Vec<CalendarEvent>) -> Arc<FlakyRepository> {
        Arc::new(FlakyRepository {
            inner: EventStore::spawn(LatencyConfig::none(), events),
            offline: AtomicBool::new(false),
        })
    }

    async fn loaded_view(events: Vec<CalendarEvent>) -> (CalendarViewState, Arc<EventCache>) {
        let cache = Arc::new(EventCache::new(Arc::new(EventStore::spawn(
            LatencyConfig::none(),
            events,
        ))));
        let view = CalendarViewState::with_month(cache.clone(), WeekStart::Sunday, date(2025, 3, 1));
        view.load_current_month().await;
        (view, cache)
    }

    async fn eventually(view: &CalendarViewState, check: impl Fn(&CalendarSnapshot) -> bool) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while !check(&view.snapshot()) {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("view never reached the expected state");
    }

    #[tokio::test]
    async fn test_initial_grid_before_load() {
        let cache = Arc::new(EventCache::new(Arc::new(EventStore::spawn(
            LatencyConfig::none(),
            [],
        ))));
        let view = CalendarViewState::with_month(cache, WeekStart::Sunday, date(2025, 3, 18));

        let days = view.days_in_month();
        assert_eq!(days.len(), 6 + 31);
        assert!(!view.is_loading());
        assert_eq!(view.selected_date(), None);
        assert!(view.events_for_selected_date().is_empty());
    }

    #[tokio::test]
    async fn test_load_populates_grid() {
        let (view, _cache) = loaded_view(vec![
            CalendarEvent::new("Dentist", at(12, 10)),
            CalendarEvent::new("Other month", date(2025, 4, 2).and_hms_opt(9, 0, 0).unwrap()),
        ])
        .await;

        let with_events: Vec<_> = view
            .days_in_month()
            .into_iter()
            .filter(|cell| cell.has_events())
            .collect();
        assert_eq!(with_events.len(), 1);
        assert_eq!(with_events[0].date, Some(date(2025, 3, 12)));
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn test_select_date_and_filter() {
        let (view, _cache) = loaded_view(vec![
            CalendarEvent::new("late", at(12, 18)),
            CalendarEvent::new("early", at(12, 8)).completed(true),
            CalendarEvent::new("next day", at(13, 8)),
        ])
        .await;

        view.select_date(Some(date(2025, 3, 12)));
        let titles: Vec<_> = view
            .events_for_selected_date()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["early", "late"]);

        view.set_shows_only_incomplete(true);
        let titles: Vec<_> = view
            .events_for_selected_date()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["late"]);

        view.select_date(None);
        assert!(view.events_for_selected_date().is_empty());
    }

    #[tokio::test]
    async fn test_month_navigation_round_trip() {
        let (view, _cache) = loaded_view(vec![]).await;
        let start = view.current_month();

        view.move_to_next_month().await.unwrap();
        assert_eq!(view.current_month(), date(2025, 4, 1));
        assert_eq!(view.days_in_month().iter().filter(|c| !c.is_blank()).count(), 30);

        view.move_to_previous_month().await.unwrap();
        assert_eq!(view.current_month(), start);
    }

    #[tokio::test]
    async fn test_next_month_loads_its_events() {
        let april = CalendarEvent::new("April fools", date(2025, 4, 1).and_hms_opt(9, 0, 0).unwrap());
        let (view, cache) = loaded_view(vec![april.clone()]).await;
        assert!(!cache.contains(&april.id));

        view.move_to_next_month().await.unwrap();

        assert!(cache.contains(&april.id));
        let cell = view
            .days_in_month()
            .into_iter()
            .find(|c| c.date == Some(date(2025, 4, 1)))
            .unwrap();
        assert_eq!(cell.events, vec![april]);
    }

    #[tokio::test]
    async fn test_toggle_completion_success() {
        let event = CalendarEvent::new("Stretch", at(20, 7));
        let (view, cache) = loaded_view(vec![event.clone()]).await;
        view.select_date(Some(date(2025, 3, 20)));

        view.toggle_event_completion(event.id).await;

        assert!(cache.get(&event.id).unwrap().is_completed);
        assert!(view.events_for_selected_date()[0].is_completed);
        assert_eq!(view.last_error(), None);
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_is_noop() {
        let event = CalendarEvent::new("Stretch", at(20, 7));
        let (view, cache) = loaded_view(vec![event.clone()]).await;
        view.select_date(Some(date(2025, 3, 20)));
        let before = view.snapshot();

        view.toggle_event_completion(Uuid::new_v4()).await;

        assert_eq!(view.snapshot(), before);
        assert_eq!(cache.events(), vec![event]);
    }

    #[tokio::test]
    async fn test_failed_toggle_restores_previous_list() {
        let event = CalendarEvent::new("Pay rent", at(1, 9));
        let repository = flaky(vec![event.clone()]);
        let cache = Arc::new(EventCache::new(repository.clone()));
        let view = CalendarViewState::with_month(cache.clone(), WeekStart::Monday, date(2025, 3, 1));
        view.load_current_month().await;
        view.select_date(Some(date(2025, 3, 1)));
        let before = view.events_for_selected_date();

        repository.offline.store(true, Ordering::SeqCst);
        view.toggle_event_completion(event.id).await;

        assert_eq!(view.events_for_selected_date(), before);
        assert!(!cache.get(&event.id).unwrap().is_completed);
        assert_eq!(view.last_error(), Some(Error::Backend("offline".into())));

        repository.offline.store(false, Ordering::SeqCst);
        view.toggle_event_completion(event.id).await;
        assert!(view.events_for_selected_date()[0].is_completed);
        assert_eq!(view.last_error(), None);
    }

    #[tokio::test]
    async fn test_delete_event() {
        let keep = CalendarEvent::new("keep", at(8, 9));
        let drop = CalendarEvent::new("drop", at(8, 10));
        let (view, cache) = loaded_view(vec![keep.clone(), drop.clone()]).await;
        view.select_date(Some(date(2025, 3, 8)));

        view.delete_event(drop.id).await;
        assert_eq!(view.events_for_selected_date(), vec![keep.clone()]);
        assert!(!cache.contains(&drop.id));

        view.delete_event(Uuid::new_v4()).await;
        assert_eq!(view.events_for_selected_date(), vec![keep]);
        assert_eq!(view.last_error(), None);
    }

    #[tokio::test]
    async fn test_failed_delete_is_recorded() {
        let event = CalendarEvent::new("Sticky", at(3, 9));
        let repository = flaky(vec![event.clone()]);
        let cache = Arc::new(EventCache::new(repository.clone()));
        let view = CalendarViewState::with_month(cache.clone(), WeekStart::Sunday, date(2025, 3, 1));
        view.load_current_month().await;

        repository.offline.store(true, Ordering::SeqCst);
        view.delete_event(event.id).await;

        assert!(cache.contains(&event.id));
        assert!(view.last_error().is_some());
        view.clear_error();
        assert_eq!(view.last_error(), None);
    }

    #[tokio::test]
    async fn test_failed_load_is_recorded() {
        let repository = flaky(vec![]);
        repository.offline.store(true, Ordering::SeqCst);
        let cache = Arc::new(EventCache::new(repository));
        let view = CalendarViewState::with_month(cache, WeekStart::Sunday, date(2025, 3, 1));

        view.load_current_month().await;

        assert!(!view.is_loading());
        assert!(matches!(view.last_error(), Some(Error::Backend(_))));

        let json = serde_json::to_value(view.snapshot()).unwrap();
        assert!(json["last_error"].as_str().unwrap().contains("offline"));
    }

    #[tokio::test]
    async fn test_cache_changes_propagate_without_refresh() {
        let (view, cache) = loaded_view(vec![]).await;
        view.select_date(Some(date(2025, 3, 15)));
        let event = CalendarEvent::new("Surprise", at(15, 19));

        cache.create_event(event.clone()).await.unwrap();

        eventually(&view, |s| s.events_for_selected_date == vec![event.clone()]).await;
        eventually(&view, |s| {
            s.days_in_month
                .iter()
                .any(|c| c.date == Some(date(2025, 3, 15)) && c.has_events())
        })
        .await;
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let (view, _cache) = loaded_view(vec![]).await;
        let mut rx = view.subscribe();

        view.select_date(Some(date(2025, 3, 2)));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().selected_date, Some(date(2025, 3, 2)));
    }

    fn slow_view() -> CalendarViewState {
        let cache = Arc::new(EventCache::new(Arc::new(EventStore::spawn(
            LatencyConfig::default(),
            [],
        ))));
        CalendarViewState::with_month(cache, WeekStart::Sunday, date(2025, 3, 1))
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_load_clears_loading_flag() {
        let view = slow_view();

        let load = tokio::time::timeout(Duration::from_millis(10), view.load_current_month()).await;

        assert!(load.is_err());
        assert!(!view.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_month_move_clears_loading_flag() {
        let view = slow_view();
        let load = view.move_to_next_month();
        eventually(&view, |s| s.is_loading()).await;

        load.abort();

        assert!(load.await.unwrap_err().is_cancelled());
        assert!(!view.is_loading());
        assert_eq!(view.current_month(), date(2025, 4, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_json_reports_loading() {
        let view = slow_view();
        let load = view.move_to_next_month();
        eventually(&view, |s| s.is_loading()).await;

        let json = serde_json::to_value(view.snapshot()).unwrap();
        assert_eq!(json["is_loading"], true);
        assert!(json["last_error"].is_null());

        load.await.unwrap();
        let json = serde_json::to_value(view.snapshot()).unwrap();
        assert_eq!(json["is_loading"], false);
    }
}
