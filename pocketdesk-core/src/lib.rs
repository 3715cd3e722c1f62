//! Core state engines for pocketdesk.
//!
//! This crate holds everything the two tabs of the app need apart from
//! drawing:
//! - `calculator`: button handling for a left-to-right arithmetic calculator
//! - `store`: the simulated async event backend
//! - `cache`: the in-process event cache every calendar view reads from
//! - `calendar`: the month grid / selected-day view model

pub mod cache;
pub mod calculator;
pub mod calendar;
pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod event;
pub mod store;

pub use error::{Error, Result};
pub use event::CalendarEvent;
