//! The world: one struct tying the registry, input, draw recorder and
//! socket seam together, plus the per-frame driver.
//!
//! # Invariants
//! - Update order per tick: input edges, overlay sweep, Update systems
//!   in registration order; then frame setup, Draw systems, deferred
//!   flush, post-process.
//! - A failing system aborts only its own invocation; the driver logs
//!   and moves to the next system.
//! - Shutdown is one-way; `frame` returns `false` forever after.

pub mod world;

pub use world::{ModalSink, World};

pub fn crate_info() -> &'static str {
    "campuswalk-world v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("world"));
    }
}
