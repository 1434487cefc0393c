//! Unit formatters.
//!
//! Pure functions turning raw measurements into display strings.

pub mod bytes;
pub mod time;

pub use bytes::format_byte_size;
pub use time::format_axis_timestamp;
