use glam::{Mat4, Vec3};

use crate::resources::{MeshId, TextureKey};

/// One recorded draw: everything the backend needs, captured by value at
/// record time. Later uniform changes never leak into earlier commands.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshId,
    pub texture: TextureKey,
    /// Full model matrix, already composed.
    pub matrix: Mat4,
    /// Ambient light factor in [0, 1].
    pub ambient: f32,
    /// View-space pivot of the hider dither effect, if active. Fragments
    /// nearer than its depth are dithered away.
    pub hider_pivot: Option<Vec3>,
}

/// Fixed per-frame pipeline state.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSetup {
    pub width: f32,
    pub height: f32,
    pub clear_color: [f32; 4],
    pub blend: BlendMode,
    /// Back faces are culled; sprite quads are drawn front-facing only.
    pub cull_back_faces: bool,
    /// Dither mask sampled by the hider effect.
    pub alpha_mask: TextureKey,
    /// Mask tile size in pixels.
    pub alpha_mask_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// src * 1 + dst * (1 - src.a), premultiplied source.
    PremultipliedOver,
    /// dst - src, used to darken edges when compositing outlines.
    ReverseSubtract,
}

/// Full-screen passes that run after the scene, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcessPass {
    /// Resolve the scene color buffer into a sampleable texture.
    ColorFetch,
    /// Edge-detect the depth buffer and composite outlines over the scene.
    OutlineComposite { blend: BlendMode },
}

/// The post-process chain is fixed; backends run it verbatim.
pub const POST_PROCESS: [PostProcessPass; 2] = [
    PostProcessPass::ColorFetch,
    PostProcessPass::OutlineComposite {
        blend: BlendMode::ReverseSubtract,
    },
];
