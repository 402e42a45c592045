use glam::{Mat4, Vec3};
use gridwalk_common::{Camera, Projection};
use gridwalk_kernel::GameState;
use gridwalk_map::CellCoord;
use std::fmt::Write as _;

/// Camera/view configuration for rendering one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    pub up: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    pub projection: Projection,
    /// Surface width over height.
    pub aspect: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_camera(&Camera::default(), 4.0 / 3.0)
    }
}

impl RenderView {
    pub fn from_camera(camera: &Camera, aspect: f32) -> Self {
        Self {
            eye: camera.position,
            target: camera.target,
            up: camera.up,
            fov_degrees: camera.fovy,
            projection: camera.projection,
            aspect,
        }
    }

    /// Aspect ratio of a `width` x `height` surface. Degenerate sizes (a
    /// minimized window) fall back to square.
    pub fn aspect_of(width: u32, height: u32) -> f32 {
        if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }

    fn camera(&self) -> Camera {
        Camera {
            position: self.eye,
            target: self.target,
            up: self.up,
            fovy: self.fov_degrees,
            projection: self.projection,
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.camera().view_projection(self.aspect)
    }

    /// Screen-right axis in world space, for camera-facing billboards.
    pub fn right(&self) -> Vec3 {
        self.camera().right()
    }

    /// Screen-up axis in world space.
    pub fn billboard_up(&self) -> Vec3 {
        self.right().cross(self.camera().forward()).normalize_or_zero()
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads game state and a view, then produces output. It never
/// mutates the game.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given game state and view.
    fn render(&self, state: &GameState, view: &RenderView) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
///
/// Draws the map top-down with `@` for the player and `*` for pickups,
/// followed by the HUD contents.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, state: &GameState, view: &RenderView) -> String {
        let grid = state.grid();
        let player = grid.position_to_cell(view.eye);
        let pickups: Vec<CellCoord> = state
            .pickups()
            .iter()
            .map(|p| grid.position_to_cell(p.position))
            .collect();

        let mut out = String::new();
        let _ = writeln!(out, "=== Frame {} ===", state.frame());
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        );
        for z in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                let cell = CellCoord::new(x, z);
                let c = if cell == player {
                    '@'
                } else if pickups.contains(&cell) {
                    '*'
                } else if grid.is_wall(cell) {
                    '#'
                } else {
                    '.'
                };
                out.push(c);
            }
            out.push('\n');
        }

        let _ = writeln!(out, "Stamina: {:.2}", state.stamina().value());
        let inventory = state.inventory();
        for (i, slot) in inventory.slots().iter().enumerate() {
            let marker = if i == inventory.selected() { '>' } else { ' ' };
            let name = slot.as_ref().map_or("-", |item| item.name.as_str());
            let _ = writeln!(out, "{marker}[{i}] {name}");
        }
        if state.is_targeting() {
            let _ = writeln!(out, "Targeting: {} pickup(s)", state.targets().len());
        }
        out
    }
}
