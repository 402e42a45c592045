//! Game kernel: the authoritative game state and the per-frame update.
//!
//! # Invariants
//! - One frame runs in a fixed order: look, move, collide, target, actions.
//! - A collided move is reverted whole; there is no wall sliding.
//! - A pickup leaves the world list in the same call that puts its item into
//!   the inventory.
//! - Every gameplay change is recorded as a [`GameEvent`].

pub mod config;
pub mod interaction;
pub mod movement;
pub mod state;

pub use config::{ConfigError, GameConfig};
pub use state::{GameEvent, GameState, ItemPickup, Sprite};

pub fn crate_info() -> &'static str {
    "gridwalk-kernel v0.1.0"
}

/// Build a grid from text rows (`#` wall, anything else open).
#[cfg(test)]
pub(crate) fn grid_from_rows(rows: &[&str]) -> gridwalk_map::CollisionGrid {
    let height = rows.len() as u32;
    let width = rows[0].len() as u32;
    let pixels: Vec<u8> = rows
        .iter()
        .flat_map(|row| row.chars())
        .flat_map(|c| if c == '#' { [255, 255, 255, 255] } else { [0, 0, 0, 255] })
        .collect();
    gridwalk_map::CollisionGrid::from_rgba(width, height, &pixels).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
