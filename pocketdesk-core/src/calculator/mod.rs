//! The calculator tab: a single-pass, left-to-right arithmetic engine.

mod button;
mod engine;
mod format;
mod operation;
mod view_state;

pub use button::Button;
pub use engine::CalculatorEngine;
pub use format::{format_result, parse_display};
pub use operation::{Operation, resolve};
pub use view_state::CalculatorViewState;
