//! Shared types for the gridwalk workspace: the camera pose, texture handles,
//! and the handful of geometry queries the game loop relies on.

pub mod geometry;
pub mod types;

pub use geometry::{Ray, RayHit, Rect, circle_rect_overlap, ray_sphere, rotate_about_axis};
pub use types::{Camera, Projection, TextureId};

pub fn crate_info() -> &'static str {
    "gridwalk-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
