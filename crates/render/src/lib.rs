//! Rendering adapter: everything a backend needs to draw a frame, computed
//! without a GPU.
//!
//! # Invariants
//! - Renderers read [`GameState`] and never mutate it.
//! - Draw lists and HUD layout derive only from game state and screen size.
//!
//! [`GameState`]: gridwalk_kernel::GameState

mod draw;
mod hud;
mod renderer;

pub use draw::{AtlasTile, Billboard, DrawList, MapMesh, PICKUP_BILLBOARD_SIZE};
pub use hud::{HudLayout, SLOT_GAP, STAMINA_MARGIN};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "gridwalk-render v0.1.0"
}

/// Build a state over text rows (`#` wall) with the default camera.
#[cfg(test)]
pub(crate) fn state_from_rows(rows: &[&str]) -> gridwalk_kernel::GameState {
    let height = rows.len() as u32;
    let width = rows[0].len() as u32;
    let pixels: Vec<u8> = rows
        .iter()
        .flat_map(|row| row.chars())
        .flat_map(|c| if c == '#' { [255, 255, 255, 255] } else { [0, 0, 0, 255] })
        .collect();
    let grid = gridwalk_map::CollisionGrid::from_rgba(width, height, &pixels).unwrap();
    gridwalk_kernel::GameState::new(
        grid,
        gridwalk_common::Camera::default(),
        gridwalk_kernel::GameConfig::default(),
    )
}
