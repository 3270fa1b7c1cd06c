//! Edge-detected input state: keyboard, pointer, and the inferred input
//! mode, fed by platform callbacks and resolved once per frame.
//!
//! # Invariants
//! - Edges (`pressed`/`released`) are derived exactly once per frame by
//!   `update`, before any system runs.
//! - Disabling input forces held/pressed/pointer-down false but does not
//!   suppress the release edge of a key held at disable time.

pub mod state;

pub use state::{InputMode, InputState, Key, Pointer};

pub fn crate_info() -> &'static str {
    "campuswalk-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
