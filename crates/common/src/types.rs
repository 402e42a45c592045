use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Handle to a loaded texture. Derived from the image contents, so the same
/// file loaded twice yields the same handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u64);

/// Camera projection kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Look-at camera: the player's eye.
///
/// Translation moves `position` and `target` together so the look direction
/// is preserved; rotation only moves `target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees (perspective) or view height in
    /// world units (orthographic).
    pub fovy: f32,
    pub projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(1.0, 0.5, 1.0),
            target: Vec3::new(2.0, 0.5, 2.0),
            up: Vec3::Y,
            fovy: 60.0,
            projection: Projection::Perspective,
        }
    }
}

impl Camera {
    pub const NEAR: f32 = 0.01;
    pub const FAR: f32 = 1000.0;

    /// Unnormalized `target - position`.
    pub fn view_vector(&self) -> Vec3 {
        self.target - self.position
    }

    /// Normalized look direction. Zero if target and position coincide.
    pub fn forward(&self) -> Vec3 {
        self.view_vector().normalize_or_zero()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    /// Move position and target by the same offset.
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.target += offset;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(self.fovy.to_radians(), aspect, Self::NEAR, Self::FAR)
            }
            Projection::Orthographic => {
                let top = self.fovy / 2.0;
                let right = top * aspect;
                Mat4::orthographic_rh(-right, right, -top, top, Self::NEAR, Self::FAR)
            }
        }
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}
