//! Shared utilities for the hashcash workspace.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::{format_duration, format_iso_millis, format_iso_tenths};
