//! Map: the wall occupancy grid derived from a cubic-map image.
//!
//! # Invariants
//! - The grid is built once and never mutated afterwards.
//! - Image column `x` maps to world X, image row `y` maps to world Z; each
//!   pixel covers a unit square centered on its integer coordinate.
//!
//! # Known limitation
//! Collision response is all-or-nothing: callers revert the whole move on
//! overlap, there is no sliding along walls.

mod grid;

pub use grid::{CellCoord, CollisionGrid, MapError, WALL_VALUE};

pub fn crate_info() -> &'static str {
    "gridwalk-map v0.1.0"
}
