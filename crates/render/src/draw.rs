use glam::Vec3;
use gridwalk_common::{Rect, TextureId};
use gridwalk_kernel::GameState;
use gridwalk_map::CollisionGrid;

/// Edge length of a pickup billboard in world units.
pub const PICKUP_BILLBOARD_SIZE: f32 = 0.1;

/// One quadrant of the 2x2 map atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtlasTile {
    Wall,
    Top,
    Floor,
    Ceiling,
}

impl AtlasTile {
    /// Texture-space rectangle, origin top-left, in `[0, 1]`.
    pub fn uv_rect(self) -> Rect {
        let (u, v) = match self {
            AtlasTile::Wall => (0.0, 0.0),
            AtlasTile::Top => (0.5, 0.0),
            AtlasTile::Floor => (0.0, 0.5),
            AtlasTile::Ceiling => (0.5, 0.5),
        };
        Rect::new(u, v, 0.5, 0.5)
    }
}

/// Static level geometry: unit cubes for walls, unit quads for the floor and
/// ceiling of every open cell. Positions are cell centers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapMesh {
    /// Cube centers at `y = 0.5`.
    pub walls: Vec<Vec3>,
    /// Quad centers at `y = 0`.
    pub floor: Vec<Vec3>,
    /// Quad centers at `y = 1`.
    pub ceiling: Vec<Vec3>,
}

impl MapMesh {
    pub fn from_grid(grid: &CollisionGrid) -> Self {
        let walls = grid
            .walls()
            .iter()
            .map(|c| Vec3::new(c.x as f32, 0.5, c.z as f32))
            .collect();
        let (floor, ceiling) = grid
            .open_cells()
            .map(|c| {
                (
                    Vec3::new(c.x as f32, 0.0, c.z as f32),
                    Vec3::new(c.x as f32, 1.0, c.z as f32),
                )
            })
            .unzip();
        Self {
            walls,
            floor,
            ceiling,
        }
    }
}

/// A camera-facing textured square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    pub texture: TextureId,
    pub position: Vec3,
    pub size: f32,
}

/// Per-frame dynamic draws.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    /// Sprites and pickups, farthest from `eye` first.
    pub billboards: Vec<Billboard>,
}

impl DrawList {
    pub fn build(state: &GameState, eye: Vec3) -> Self {
        let sprites = state.sprites().iter().map(|s| Billboard {
            texture: s.texture,
            position: s.position,
            size: s.size,
        });
        let pickups = state.pickups().iter().map(|p| Billboard {
            texture: p.item.texture,
            position: p.position,
            size: PICKUP_BILLBOARD_SIZE,
        });
        let mut billboards: Vec<Billboard> = sprites.chain(pickups).collect();
        billboards.sort_by(|a, b| {
            let da = a.position.distance_squared(eye);
            let db = b.position.distance_squared(eye);
            db.total_cmp(&da)
        });
        tracing::trace!(billboards = billboards.len(), "draw list built");
        Self { billboards }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_from_rows;
    use gridwalk_inventory::{Item, ItemBehavior};
    use gridwalk_kernel::{ItemPickup, Sprite};

    #[test]
    fn mesh_covers_every_cell_once() {
        let state = state_from_rows(&["####", "#..#", "#.##", "####"]);
        let mesh = MapMesh::from_grid(state.grid());
        assert_eq!(mesh.walls.len(), 13);
        assert_eq!(mesh.floor.len(), 3);
        assert_eq!(mesh.ceiling.len(), 3);
        assert!(mesh.walls.contains(&Vec3::new(2.0, 0.5, 2.0)));
        assert!(mesh.floor.contains(&Vec3::new(1.0, 0.0, 2.0)));
        assert!(mesh.ceiling.contains(&Vec3::new(2.0, 1.0, 1.0)));
    }

    #[test]
    fn atlas_tiles_partition_texture() {
        let tiles = [AtlasTile::Wall, AtlasTile::Top, AtlasTile::Floor, AtlasTile::Ceiling];
        let area: f32 = tiles.iter().map(|t| t.uv_rect().width * t.uv_rect().height).sum();
        assert_eq!(area, 1.0);
        assert_eq!(AtlasTile::Ceiling.uv_rect().max(), glam::Vec2::ONE);
    }

    #[test]
    fn billboards_sorted_far_to_near() {
        let mut state = state_from_rows(&["#######", "#.....#", "#######"]);
        state.add_sprite(Sprite {
            texture: TextureId(1),
            position: Vec3::new(2.0, 0.5, 1.0),
            size: 1.0,
        });
        state.add_pickup(ItemPickup {
            position: Vec3::new(5.0, 0.5, 1.0),
            item: Item::new("Far", TextureId(2), ItemBehavior::Placeholder),
        });

        let list = DrawList::build(&state, Vec3::new(1.0, 0.5, 1.0));
        assert_eq!(list.billboards.len(), 2);
        assert_eq!(list.billboards[0].texture, TextureId(2));
        assert_eq!(list.billboards[0].size, PICKUP_BILLBOARD_SIZE);
        assert_eq!(list.billboards[1].size, 1.0);
    }
}
