//! Utility functions and helpers
//!
//! Timestamps, date formatting and atomic file writes.

pub mod atomic;
pub mod time;

pub use atomic::atomic_write;
pub use time::{current_timestamp, format_date};
