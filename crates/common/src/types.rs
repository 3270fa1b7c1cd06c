use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Unique identifier for an entity in the world.
///
/// Allocated from a monotonic counter and never reused after removal, so a
/// stale id held across frames can never alias a newer entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

/// An axis-aligned rectangle used for collision and interaction-range masks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Rect {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// A square of the given side length centered on the origin.
    pub fn centered(size: f32) -> Self {
        Self {
            x1: -size / 2.0,
            y1: -size / 2.0,
            x2: size / 2.0,
            y2: size / 2.0,
        }
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }

    /// AABB overlap test. Strict inequalities: touching edges do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x1 < other.x2 && self.x2 > other.x1 && self.y1 < other.y2 && self.y2 > other.y1
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.x1 <= x && self.x2 > x && self.y1 <= y && self.y2 > y
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }
}

/// Spatial pose as a 4x4 matrix.
///
/// Rotation and scale apply to rendering only; movement math treats the
/// matrix's translation column as the 2D world position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform(pub Mat4);

impl Transform {
    pub fn from_translation(v: Vec3) -> Self {
        Self(Mat4::from_translation(v))
    }

    pub fn translation(&self) -> Vec3 {
        self.0.w_axis.truncate()
    }

    /// Right-multiply a translation onto the pose.
    pub fn translate(&mut self, v: Vec3) {
        self.0 *= Mat4::from_translation(v);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self(Mat4::IDENTITY)
    }
}

/// Frame clock sample, in milliseconds.
///
/// `total` is time since the driver started; `delta` is the elapsed time
/// since the previous frame. All expiry timestamps in the simulation are
/// compared against `total`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Time {
    pub total: f64,
    pub delta: f64,
}

impl Time {
    pub fn new(total: f64, delta: f64) -> Self {
        Self { total, delta }
    }
}

/// Apply a matrix to a point with perspective divide.
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    let v = *m * Vec4::new(p.x, p.y, p.z, 1.0);
    if v.w != 0.0 {
        v.truncate() / v.w
    } else {
        v.truncate()
    }
}
