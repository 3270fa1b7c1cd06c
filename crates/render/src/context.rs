use campuswalk_common::transform_point;
use glam::{Mat4, Vec3, Vec4};
use tracing::trace;

use crate::backend::RenderBackend;
use crate::command::{BlendMode, DrawCommand, FrameSetup, POST_PROCESS};
use crate::overlay::{TextMode, TextOverlay, TextPlacement, TextStyle};
use crate::resources::{MeshId, ResourceRegistry, TextureKey};

/// Viewport height the overlay font scale is relative to.
const REFERENCE_HEIGHT: f32 = 768.0;

/// Frame clear color, a muted sky blue.
const CLEAR_COLOR: [f32; 4] = [0.4, 0.6, 0.8, 1.0];

const ALPHA_MASK_SIZE: f32 = 32.0;

/// Records draw state for one frame and hands resolved commands to the
/// backend.
///
/// Draws are either immediate (submitted as issued) or deferred with an
/// explicit sort key. Deferred commands capture matrix, texture, ambient
/// and hider state by value at record time; `flush` submits them in
/// ascending key order with ties kept in submission order.
pub struct DrawContext {
    backend: Box<dyn RenderBackend>,
    pub resources: ResourceRegistry,
    matrix: Vec<Mat4>,
    width: f32,
    height: f32,
    view: Mat4,
    ambient: f32,
    texture: Option<TextureKey>,
    hider_pivot: Option<Vec3>,
    deferred: Vec<(f32, DrawCommand)>,
    warp_plane: Vec4,
    warp_singularity: Vec3,
    warp_radius: f32,
    pub overlay: TextOverlay,
}

impl DrawContext {
    pub fn new(
        backend: Box<dyn RenderBackend>,
        resources: ResourceRegistry,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            backend,
            resources,
            matrix: vec![Mat4::IDENTITY],
            width,
            height,
            view: Mat4::IDENTITY,
            ambient: 1.0,
            texture: None,
            hider_pivot: None,
            deferred: Vec::new(),
            warp_plane: Vec4::new(0.0, 0.0, 1.0, 0.0),
            warp_singularity: Vec3::ZERO,
            warp_radius: 1.0,
            overlay: TextOverlay::new(),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.backend.resize(width as u32, height as u32);
    }

    /// Reset per-frame state and open the frame on the backend.
    pub fn begin_frame(&mut self) {
        self.matrix.clear();
        self.matrix.push(Mat4::IDENTITY);
        self.deferred.clear();
        self.hider_pivot = None;
        self.backend.begin_frame(&FrameSetup {
            width: self.width,
            height: self.height,
            clear_color: CLEAR_COLOR,
            blend: BlendMode::PremultipliedOver,
            cull_back_faces: true,
            alpha_mask: TextureKey::AlphaMask,
            alpha_mask_size: ALPHA_MASK_SIZE,
        });
    }

    // --- matrix stack ---

    pub fn push_matrix(&mut self) {
        let top = *self.matrix.last().unwrap_or(&Mat4::IDENTITY);
        self.matrix.push(top);
    }

    /// Right-multiply the stack top in place.
    pub fn add_matrix(&mut self, m: Mat4) {
        if let Some(top) = self.matrix.last_mut() {
            *top = *top * m;
        }
    }

    pub fn pop_matrix(&mut self) {
        if self.matrix.len() > 1 {
            self.matrix.pop();
        }
    }

    pub fn current_matrix(&self) -> Mat4 {
        *self.matrix.last().unwrap_or(&Mat4::IDENTITY)
    }

    pub fn matrix_depth(&self) -> usize {
        self.matrix.len()
    }

    // --- sticky draw state ---

    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
        self.backend.set_view(&view);
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn set_ambient(&mut self, value: f32) {
        self.ambient = value;
    }

    pub fn set_texture(&mut self, texture: TextureKey) {
        self.texture = Some(texture);
    }

    /// Latch the hider pivot from a model-space position. The pivot is
    /// transformed by view and current model matrix at call time.
    pub fn set_hider_pivot(&mut self, position: Vec3) {
        let m = self.view * self.current_matrix();
        self.hider_pivot = Some(transform_point(&m, position));
    }

    pub fn clear_hider_pivot(&mut self) {
        self.hider_pivot = None;
    }

    pub fn set_warp(&mut self, plane: Vec4, singularity: Vec3, radius: f32) {
        self.warp_plane = plane;
        self.warp_singularity = singularity;
        self.warp_radius = radius;
        self.backend.set_warp(plane, singularity, radius);
    }

    /// Bend a world position onto the warp cylinder around the
    /// singularity. Points along the warp normal are fixed.
    pub fn wrap_position(&self, world: Vec3) -> Vec3 {
        let relative = world - self.warp_singularity;
        let normal = (-self.warp_plane.truncate()).normalize();
        let tangent = normal.cross(Vec3::new(0.0, -1.0, 0.0)).normalize();
        let bitangent = normal.cross(tangent);
        let radius = normal.dot(relative);
        let theta_t = tangent.dot(relative) / self.warp_radius;
        let theta_b = bitangent.dot(relative) / self.warp_radius;
        Vec3::new(
            theta_t.sin() * self.warp_radius,
            theta_b.sin() * self.warp_radius,
            theta_t.cos() * theta_b.cos() * radius,
        ) + self.warp_singularity
    }

    // --- draws ---

    /// Snapshot the current draw state into a command. `None` if no
    /// texture has been set yet.
    pub fn command(&self, mesh: MeshId) -> Option<DrawCommand> {
        Some(DrawCommand {
            mesh,
            texture: self.texture?,
            matrix: self.current_matrix(),
            ambient: self.ambient,
            hider_pivot: self.hider_pivot,
        })
    }

    /// Submit immediately with the current state.
    pub fn draw(&mut self, mesh: MeshId) {
        if let Some(command) = self.command(mesh) {
            self.submit(command);
        }
    }

    /// Queue a command for the sorted flush at frame end.
    pub fn draw_defer(&mut self, order: f32, command: DrawCommand) {
        self.deferred.push((order, command));
    }

    /// Defer with painter's ordering along -Y: smaller world y draws
    /// later, in front.
    pub fn draw_defer_position(&mut self, position: Vec3, command: DrawCommand) {
        self.draw_defer(-position.y, command);
    }

    /// Submit deferred commands in ascending key order. The sort is
    /// stable, so equal keys keep their submission order.
    pub fn flush(&mut self) {
        let mut deferred = std::mem::take(&mut self.deferred);
        deferred.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (_, command) in deferred {
            self.submit(command);
        }
    }

    fn submit(&mut self, command: DrawCommand) {
        // skip until the async asset upload lands
        if self.resources.mesh(command.mesh).is_none() {
            trace!(mesh = ?command.mesh, "mesh not loaded, skipping draw");
            return;
        }
        if self.resources.texture(command.texture).is_none() {
            trace!(texture = ?command.texture, "texture not loaded, skipping draw");
            return;
        }
        self.backend.submit(&command);
    }

    // --- text overlay ---

    pub fn draw_text(
        &mut self,
        key: &str,
        text: &str,
        position: Vec3,
        style: TextStyle,
        mode: TextMode,
    ) {
        let scale = self.height / REFERENCE_HEIGHT;
        let placement = match mode {
            TextMode::Immersive => {
                let vp = transform_point(&self.view, self.wrap_position(position));
                TextPlacement {
                    x_percent: vp.x / vp.z * 50.0 + 50.0,
                    y_percent: -vp.y / vp.z * 50.0 + 50.0,
                    z_index: (-vp.z * 1000.0 + 20000.0).floor() as i32,
                    scale,
                }
            }
            TextMode::Orthographic => TextPlacement {
                x_percent: position.x / self.aspect() * 50.0 + 50.0,
                y_percent: -position.y * 50.0 + 50.0,
                z_index: (-position.z * 1000.0 + 20000.0).floor() as i32,
                scale,
            },
        };
        self.overlay.upsert(key, text, style, placement);
    }

    /// Sweep overlay nodes that were not redrawn this frame.
    pub fn collect_texts(&mut self) {
        self.overlay.collect();
    }

    /// Run the fixed post-process chain. Call after `flush`.
    pub fn post_process(&mut self) {
        self.backend.post_process(&POST_PROCESS);
    }

    /// Release backend resources. The context must not be used afterwards.
    pub fn release(&mut self) {
        self.backend.release();
    }
}
