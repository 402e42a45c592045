//! Assets: decoded images keyed by content hash, and the scene manifest that
//! ties images, map and placements together into a ready [`GameState`].
//!
//! Everything is loaded once at startup. A missing or undecodable file is a
//! hard error naming the path.
//!
//! [`GameState`]: gridwalk_kernel::GameState

mod demo;
mod scene;
mod store;

pub use demo::write_demo_assets;
pub use scene::{
    LoadedScene, PickupSpec, SceneError, SceneManifest, SceneTextures, SpriteSpec,
};
pub use store::{AssetError, AssetStore, ImageData};

pub fn crate_info() -> &'static str {
    "gridwalk-assets v0.1.0"
}
