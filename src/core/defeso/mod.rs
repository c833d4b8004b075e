// src/core/defeso/mod.rs
mod calculator;
mod catalog;
mod types;

pub use calculator::{calculate_window, window_on};
pub use catalog::{DefesoCatalog, DEFAULT_KEY};
pub use types::{
    format_br, DefesoDefinition, DefesoHistoryEntry, DefesoStatus, DefesoWindow, MonthDay,
    PaymentStatus,
};
