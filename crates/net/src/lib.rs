//! Presence-socket plumbing: the JSON wire schema, inbound queueing, and
//! outbound location publishing with chunk-update throttling.
//!
//! # Invariants
//! - Malformed or unknown inbound frames are dropped at the seam with a
//!   warning; the simulation only ever sees decoded updates.
//! - `updateChunk` is set on at most one outbound message per second.
//! - Draining the inbound queue consumes every message, not just the
//!   newest.

pub mod link;
pub mod message;

pub use link::{LocationPublisher, NetLink, CHUNK_SIZE};
pub use message::{Message, NetError, UpdateLocation};

pub fn crate_info() -> &'static str {
    "campuswalk-net v0.1.0"
}
