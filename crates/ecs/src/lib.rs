//! Sparse-storage ECS: typed component storages, multi-component joins,
//! and a two-phase (update/draw) system schedule.
//!
//! # Invariants
//! - Entity ids are allocated monotonically and never reused.
//! - Joins compute a single deterministic id snapshot per call
//!   (BTreeMap key order), never a lazy re-evaluation.
//! - In-place component mutations are visible to every later system in
//!   the same frame; systems re-fetch via joins each frame instead of
//!   caching ids or values.
//! - `create` is atomic: every storage is validated before any write.

pub mod registry;
pub mod storage;

pub use campuswalk_common::Entity;
pub use registry::{Bundle, Component, Ecs, EcsError, Phase, System};
pub use storage::{SparseStorage, Storage};

pub fn crate_info() -> &'static str {
    "campuswalk-ecs v0.1.0"
}
