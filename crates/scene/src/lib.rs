//! The campus itself: avatar movement and presence, interactable props,
//! procedural decoration, screen-space buttons, and the wiring that
//! assembles them into a running scene.
//!
//! # Invariants
//! - Systems run in the order `build_ecs` registers them; interaction
//!   systems observe positions already resolved this frame.
//! - All expiry timestamps compare against the frame clock, never wall
//!   time.

pub mod button;
pub mod decoration;
pub mod player;
pub mod setup;
pub mod simple;
pub mod usable;
pub mod wall;

pub use button::{Button, EmotionButton};
pub use decoration::Tree;
pub use player::{Facing, Player, EMOTION_SPAN_MS, PLAYER_MASK_SIZE, PUBLISH_INTERVAL_MS};
pub use setup::{build_ecs, spawn_campus, spawn_local_player};
pub use simple::{SimpleFlag, SimpleModal, SimpleModel, SimpleMultiModel};
pub use usable::Usable;
pub use wall::Wall;

pub fn crate_info() -> &'static str {
    "campuswalk-scene v0.1.0"
}
