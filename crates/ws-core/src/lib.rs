//! ws-core: stable foundation for woodsmoke.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - time (timestamp parsing, canonical formatting, hourly ranges)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod time;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{WsError, WsResult};
pub use numeric::*;
pub use time::{Timestamp, format_timestamp, on_hour_grid, parse_timestamp};
pub use units::*;
