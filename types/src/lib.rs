//! Fundamental types for hashcash stamps.
//!
//! This crate defines the pieces shared by every other crate in the workspace:
//! the error taxonomy, format versions, stamp dates and the clock, and the
//! extension field codec.

pub mod error;
pub mod extensions;
pub mod fields;
pub mod time;
pub mod version;

pub use error::HashcashError;
pub use extensions::Extensions;
pub use fields::split_fields;
pub use time::{format_stamp_date, parse_stamp_date, Clock, DateFormat, SystemClock, DATE_FORMATS};
pub use version::Version;
