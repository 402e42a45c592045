//! wgpu render backend for gridwalk.
//!
//! Draws the level as textured unit cubes with floor and ceiling quads, and
//! camera-facing billboards for sprites and pickups.
//!
//! # Invariants
//! - Renderer never mutates game state.
//! - The map mesh is uploaded once; only billboards change per frame.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::WgpuRenderer;
