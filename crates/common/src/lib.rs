//! Shared types for the campuswalk client core.
//!
//! # Invariants
//! - Entity ids are monotonically increasing and never reused in a session.
//! - All timestamps are expressed in the frame clock (milliseconds of
//!   `Time::total`), never wall time, so logic is testable.

pub mod types;

pub use types::{Entity, Rect, Time, Transform, transform_point};

pub fn crate_info() -> &'static str {
    "campuswalk-common v0.1.0"
}
