pub mod calc;
pub mod config;
pub mod events;
pub mod month;
