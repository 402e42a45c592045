use glam::{Vec2, Vec3};
use gridwalk_common::{Rect, circle_rect_overlap};
use image::RgbaImage;
use std::fmt::Write as _;
use std::path::Path;

/// Red-channel value marking a wall pixel.
pub const WALL_VALUE: u8 = 255;

/// A 2D cell coordinate in the map grid (`z` is the image row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: i32,
    pub z: i32,
}

impl CellCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The unit square this cell occupies on the XZ plane.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x as f32 - 0.5, self.z as f32 - 0.5, 1.0, 1.0)
    }
}

/// Errors from building a collision grid.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("failed to load map image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("map has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("pixel buffer has {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Immutable wall grid.
///
/// Wall cells are also kept as a flat list in row-major order so collision
/// queries only visit walls.
#[derive(Debug, Clone)]
pub struct CollisionGrid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
    walls: Vec<CellCoord>,
}

impl CollisionGrid {
    /// Build from a raw RGBA8 buffer, row-major.
    pub fn from_rgba(width: u32, height: u32, pixels: &[u8]) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::Empty { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(MapError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        let cells: Vec<bool> = pixels.chunks_exact(4).map(|px| px[0] == WALL_VALUE).collect();
        let walls = cells
            .iter()
            .enumerate()
            .filter(|(_, wall)| **wall)
            .map(|(i, _)| CellCoord::new((i as u32 % width) as i32, (i as u32 / width) as i32))
            .collect::<Vec<_>>();

        tracing::debug!(width, height, walls = walls.len(), "collision grid built");
        Ok(Self {
            width,
            height,
            cells,
            walls,
        })
    }

    pub fn from_image(image: &RgbaImage) -> Result<Self, MapError> {
        let (width, height) = image.dimensions();
        Self::from_rgba(width, height, image.as_raw())
    }

    /// Decode an image file and build the grid from it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| MapError::Image {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_image(&image.to_rgba8())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Wall cells in row-major order.
    pub fn walls(&self) -> &[CellCoord] {
        &self.walls
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.x >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.width
            && (coord.z as u32) < self.height
    }

    /// Whether `coord` is a wall. Cells outside the map are open.
    pub fn is_wall(&self, coord: CellCoord) -> bool {
        if !self.contains(coord) {
            return false;
        }
        self.cells[coord.z as usize * self.width as usize + coord.x as usize]
    }

    /// Empty cells in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.height as i32)
            .flat_map(move |z| (0..self.width as i32).map(move |x| CellCoord::new(x, z)))
            .filter(|c| !self.is_wall(*c))
    }

    /// Cell whose unit square contains the XZ projection of `pos`.
    pub fn position_to_cell(&self, pos: Vec3) -> CellCoord {
        CellCoord::new((pos.x + 0.5).floor() as i32, (pos.z + 0.5).floor() as i32)
    }

    /// First wall (row-major) that a circle at `center` on the XZ plane
    /// overlaps, if any.
    pub fn first_collision(&self, center: Vec2, radius: f32) -> Option<CellCoord> {
        self.walls
            .iter()
            .copied()
            .find(|cell| circle_rect_overlap(center, radius, cell.rect()))
    }

    pub fn collides(&self, center: Vec2, radius: f32) -> bool {
        self.first_collision(center, radius).is_some()
    }

    /// Render as text: `#` for walls, `.` for open cells.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for z in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                out.push(if self.is_wall(CellCoord::new(x, z)) { '#' } else { '.' });
            }
            let _ = writeln!(out);
        }
        out
    }
}
