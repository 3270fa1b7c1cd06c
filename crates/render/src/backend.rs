use glam::{Mat4, Vec3, Vec4};

use crate::command::{DrawCommand, FrameSetup, PostProcessPass};

/// Sink for resolved draw state. The simulation records commands through
/// `DrawContext`; a backend turns them into GPU work, or in tests just
/// remembers them.
pub trait RenderBackend {
    fn begin_frame(&mut self, setup: &FrameSetup);
    fn set_view(&mut self, view: &Mat4);
    /// World-bend parameters, constant for the rest of the frame once set.
    fn set_warp(&mut self, plane: Vec4, singularity: Vec3, radius: f32);
    fn submit(&mut self, command: &DrawCommand);
    fn post_process(&mut self, passes: &[PostProcessPass]);
    fn resize(&mut self, width: u32, height: u32);
    /// Drop device resources. No call is valid afterwards.
    fn release(&mut self);
}

/// Backend that records everything it is handed, for tests and the
/// headless runner.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub frames: usize,
    pub submitted: Vec<DrawCommand>,
    pub last_view: Option<Mat4>,
    pub last_warp: Option<(Vec4, Vec3, f32)>,
    pub post_processed: usize,
    pub released: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_frame(&mut self, _setup: &FrameSetup) {
        self.frames += 1;
        self.submitted.clear();
    }

    fn set_view(&mut self, view: &Mat4) {
        self.last_view = Some(*view);
    }

    fn set_warp(&mut self, plane: Vec4, singularity: Vec3, radius: f32) {
        self.last_warp = Some((plane, singularity, radius));
    }

    fn submit(&mut self, command: &DrawCommand) {
        self.submitted.push(command.clone());
    }

    fn post_process(&mut self, _passes: &[PostProcessPass]) {
        self.post_processed += 1;
    }

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn release(&mut self) {
        self.released = true;
    }
}
