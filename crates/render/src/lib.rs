//! Frame recording for the campus renderer: a matrix-stack draw context,
//! value-captured deferred commands, a DOM-style text overlay, and the
//! backend trait actual GPU implementations plug into.
//!
//! # Invariants
//! - Deferred commands capture all draw state at record time; flushing
//!   sorts by key ascending and preserves submission order on ties.
//! - The matrix stack never pops below depth one.
//! - Draws whose mesh or texture has not finished loading are skipped,
//!   never queued.
//!
//! # Workaround
//! - Text labels render as overlay nodes instead of in-scene glyphs so
//!   the host page can style and hit-test them.

pub mod backend;
pub mod command;
pub mod context;
pub mod overlay;
pub mod resources;

pub use backend::{RecordingBackend, RenderBackend};
pub use command::{BlendMode, DrawCommand, FrameSetup, PostProcessPass, POST_PROCESS};
pub use context::DrawContext;
pub use overlay::{TextMode, TextOverlay, TextPlacement, TextStyle};
pub use resources::{AvatarSkin, MeshHandle, MeshId, ResourceRegistry, TextureHandle, TextureKey};

pub fn crate_info() -> &'static str {
    "campuswalk-render v0.1.0"
}
