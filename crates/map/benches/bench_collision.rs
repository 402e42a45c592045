use std::hint::black_box;
use std::time::Instant;

use glam::Vec2;
use gridwalk_map::CollisionGrid;
use image::{Rgba, RgbaImage};

/// Square map with a border wall and a pillar every `spacing` cells.
fn make_grid(side: u32, spacing: u32) -> CollisionGrid {
    let img = RgbaImage::from_fn(side, side, |x, y| {
        let border = x == 0 || y == 0 || x == side - 1 || y == side - 1;
        let pillar = x % spacing == 0 && y % spacing == 0;
        if border || pillar {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    });
    CollisionGrid::from_image(&img).expect("valid grid")
}

fn bench_build(side: u32, iterations: usize) {
    let img = RgbaImage::from_pixel(side, side, Rgba([255, 0, 0, 255]));

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(CollisionGrid::from_image(black_box(&img)).expect("valid grid"));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  build ({side}x{side}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_collides(side: u32, iterations: usize) {
    let grid = make_grid(side, 3);
    let probe = Vec2::new(side as f32 / 2.0 + 0.5, side as f32 / 2.0 + 0.5);

    let start = Instant::now();
    let mut hits = 0usize;
    for _ in 0..iterations {
        if grid.collides(black_box(probe), black_box(0.1)) {
            hits += 1;
        }
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  collides ({side}x{side}, {} walls, {iterations} iters): {per_iter:?}/iter, hits {hits}",
        grid.wall_count()
    );
}

fn main() {
    println!("collision grid benchmarks");
    for side in [16, 64, 256] {
        bench_build(side, 100);
    }
    for side in [16, 64, 256] {
        bench_collides(side, 10_000);
    }
}
