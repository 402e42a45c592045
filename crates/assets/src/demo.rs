//! Procedural placeholder images for the default scene, so a fresh checkout
//! can run without shipping binary art.

use crate::{AssetError, SceneManifest};
use image::{Rgba, RgbaImage};
use std::path::Path;

const MAP: [&str; 16] = [
    "################",
    "#......#.......#",
    "#......#.......#",
    "#......#..###..#",
    "#..............#",
    "#.....#........#",
    "####..#####..###",
    "#..............#",
    "#..###.....#...#",
    "#..#.......#...#",
    "#..#...##..#...#",
    "#......##......#",
    "#..........#####",
    "#.####.........#",
    "#..............#",
    "################",
];

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

fn map_image() -> RgbaImage {
    RgbaImage::from_fn(16, 16, |x, y| {
        if MAP[y as usize].as_bytes()[x as usize] == b'#' {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

/// 2x2 atlas of 32px tiles: brick walls, stone top, checkered floor, plain
/// ceiling.
fn atlas_image() -> RgbaImage {
    RgbaImage::from_fn(64, 64, |x, y| {
        let (lx, ly) = (x % 32, y % 32);
        match (x < 32, y < 32) {
            (true, true) => {
                let row = ly / 8;
                let offset = if row % 2 == 0 { 0 } else { 8 };
                if ly % 8 == 0 || (lx + offset) % 16 == 0 {
                    Rgba([200, 190, 170, 255])
                } else {
                    Rgba([150, 60, 45, 255])
                }
            }
            (false, true) => Rgba([120, 120, 125, 255]),
            (true, false) => {
                if (lx / 8 + ly / 8) % 2 == 0 {
                    Rgba([70, 90, 70, 255])
                } else {
                    Rgba([95, 115, 95, 255])
                }
            }
            (false, false) => Rgba([225, 225, 215, 255]),
        }
    })
}

/// A round figure on a transparent background.
fn billboard_image() -> RgbaImage {
    RgbaImage::from_fn(32, 32, |x, y| {
        let (dx, dy) = (x as f32 - 15.5, y as f32 - 15.5);
        let d = (dx * dx + dy * dy).sqrt();
        if d < 11.0 {
            Rgba([60, 110, 220, 255])
        } else if d < 14.0 {
            Rgba([20, 30, 60, 255])
        } else {
            CLEAR
        }
    })
}

/// A wrapped snack bar.
fn item_image() -> RgbaImage {
    RgbaImage::from_fn(16, 16, |x, y| {
        if !(5..11).contains(&y) || !(1..15).contains(&x) {
            CLEAR
        } else if x < 3 || x > 12 {
            Rgba([200, 200, 200, 255])
        } else {
            Rgba([240, 200, 40, 255])
        }
    })
}

/// Small white cross with a dark outline.
fn cursor_image() -> RgbaImage {
    RgbaImage::from_fn(16, 16, |x, y| {
        let on_bar = |a: u32, b: u32| (7..9).contains(&a) && (2..14).contains(&b);
        let near_bar = |a: u32, b: u32| (6..10).contains(&a) && (1..15).contains(&b);
        if on_bar(x, y) || on_bar(y, x) {
            Rgba([255, 255, 255, 255])
        } else if near_bar(x, y) || near_bar(y, x) {
            Rgba([0, 0, 0, 255])
        } else {
            CLEAR
        }
    })
}

/// Write the images referenced by [`SceneManifest::default`] into `dir`.
pub fn write_demo_assets(dir: impl AsRef<Path>) -> Result<(), AssetError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| AssetError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let manifest = SceneManifest::default();
    let mut images = vec![
        (manifest.map.clone(), map_image()),
        (manifest.textures.atlas.clone(), atlas_image()),
        (manifest.textures.cursor.clone(), cursor_image()),
    ];
    images.extend(manifest.sprites.iter().map(|s| (s.texture.clone(), billboard_image())));
    images.extend(manifest.pickups.iter().map(|p| (p.texture.clone(), item_image())));

    for (name, image) in images {
        let path = dir.join(name);
        image.save(&path).map_err(|source| AssetError::Encode {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %path.display(), "wrote demo asset");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AssetStore;

    #[test]
    fn map_rows_are_square() {
        assert!(MAP.iter().all(|row| row.len() == 16));
    }

    #[test]
    fn demo_placements_are_on_open_floor() {
        let manifest = SceneManifest::default();
        let open = |x: f32, z: f32| MAP[z.round() as usize].as_bytes()[x.round() as usize] == b'.';
        assert!(open(manifest.camera.position.x, manifest.camera.position.z));
        for s in &manifest.sprites {
            assert!(open(s.position.x, s.position.z));
        }
        for p in &manifest.pickups {
            assert!(open(p.position.x, p.position.z));
        }
    }

    #[test]
    fn writes_every_referenced_file() {
        let dir = tempfile::tempdir().unwrap();
        write_demo_assets(dir.path()).unwrap();
        let mut store = AssetStore::new();
        for name in ["cubicmap.png", "atlas.png", "cursor.png", "billboard.png", "item.png"] {
            store.load_image(dir.path().join(name)).unwrap();
        }
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn cursor_has_transparent_corners() {
        let img = cursor_image();
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(7, 7)[3], 255);
    }
}
