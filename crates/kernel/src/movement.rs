//! Mouse look, WASD translation with sprint/stamina, and wall collision.

use crate::GameConfig;
use glam::{Vec2, Vec3};
use gridwalk_common::{Camera, rotate_about_axis};
use gridwalk_input::FrameInput;
use gridwalk_inventory::Stamina;
use gridwalk_map::{CellCoord, CollisionGrid};
use std::f32::consts::FRAC_PI_2;

/// What the movement phase of a frame did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Movement {
    /// Offset applied to the camera (zero if idle or blocked).
    pub offset: Vec3,
    pub sprinting: bool,
    /// Wall that caused the move to be reverted.
    pub blocked_by: Option<CellCoord>,
}

/// Yaw the view around the camera's up axis by `-mouse_dx * mouse_speed`.
pub fn look(camera: &mut Camera, mouse_dx: f32, mouse_speed: f32) {
    if mouse_dx == 0.0 {
        return;
    }
    let view = rotate_about_axis(camera.view_vector(), camera.up, -mouse_dx * mouse_speed);
    camera.target = camera.position + view;
}

/// Unit direction for the held movement keys, or zero when idle or when
/// opposite keys cancel out.
pub fn direction(camera: &Camera, input: &FrameInput) -> Vec3 {
    let view = camera.view_vector();
    let quarter_turns = [
        (input.forward, 0.0),
        (input.left, 1.0),
        (input.back, 2.0),
        (input.right, 3.0),
    ];
    quarter_turns
        .iter()
        .filter(|(held, _)| *held)
        .map(|(_, turns)| rotate_about_axis(view, camera.up, turns * FRAC_PI_2))
        .sum::<Vec3>()
        .normalize_or_zero()
}

/// Run the movement phase: look, translate, update stamina, then revert the
/// translation if the player circle overlaps any wall.
pub fn apply(
    camera: &mut Camera,
    stamina: &mut Stamina,
    grid: &CollisionGrid,
    input: &FrameInput,
    dt: f32,
    config: &GameConfig,
) -> Movement {
    look(camera, input.mouse_delta.x, config.mouse_speed);

    let mut dir = direction(camera, input);
    let moving = dir != Vec3::ZERO;
    let sprinting = input.sprint && stamina.has_reserve() && moving;
    if sprinting {
        dir *= 2.0;
        stamina.drain(dt * config.stamina_rate);
    }
    if !moving && !stamina.is_full() {
        stamina.regenerate(dt * config.stamina_rate);
    }

    let offset = dir * dt * config.player_speed;
    if offset == Vec3::ZERO {
        return Movement {
            sprinting,
            ..Movement::default()
        };
    }

    let before = *camera;
    camera.translate(offset);

    let footprint = Vec2::new(camera.position.x, camera.position.z);
    if let Some(cell) = grid.first_collision(footprint, config.player_radius) {
        camera.position = before.position;
        camera.target = before.target;
        tracing::trace!(x = cell.x, z = cell.z, "move blocked by wall");
        return Movement {
            offset: Vec3::ZERO,
            sprinting,
            blocked_by: Some(cell),
        };
    }

    Movement {
        offset,
        sprinting,
        blocked_by: None,
    }
}
