use crate::{AssetError, AssetStore};
use glam::Vec3;
use gridwalk_common::{Camera, TextureId};
use gridwalk_inventory::{Item, ItemBehavior};
use gridwalk_kernel::{ConfigError, GameConfig, GameState, ItemPickup, Sprite};
use gridwalk_map::{CollisionGrid, MapError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to read scene file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSpec {
    pub texture: PathBuf,
    pub position: Vec3,
    #[serde(default = "default_sprite_size")]
    pub size: f32,
}

fn default_sprite_size() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupSpec {
    pub name: String,
    pub texture: PathBuf,
    #[serde(default)]
    pub behavior: ItemBehavior,
    pub position: Vec3,
}

/// Textures the presentation layer needs besides sprite and item images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTextures {
    /// 2x2 atlas: walls, top, floor, ceiling.
    pub atlas: PathBuf,
    /// Crosshair shown while a pickup is targeted.
    pub cursor: PathBuf,
}

/// The single level, as described on disk. Paths are relative to the
/// directory the manifest is resolved against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneManifest {
    pub map: PathBuf,
    pub textures: SceneTextures,
    #[serde(default)]
    pub camera: Camera,
    #[serde(default)]
    pub sprites: Vec<SpriteSpec>,
    #[serde(default)]
    pub pickups: Vec<PickupSpec>,
    #[serde(default)]
    pub config: GameConfig,
}

impl Default for SceneManifest {
    /// The demo level: one billboard and one stamina bar.
    fn default() -> Self {
        Self {
            map: "cubicmap.png".into(),
            textures: SceneTextures {
                atlas: "atlas.png".into(),
                cursor: "cursor.png".into(),
            },
            camera: Camera::default(),
            sprites: vec![SpriteSpec {
                texture: "billboard.png".into(),
                position: Vec3::new(5.0, 0.5, 5.0),
                size: 1.0,
            }],
            pickups: vec![PickupSpec {
                name: "Energy Flavored Zesty Bar".into(),
                texture: "item.png".into(),
                behavior: ItemBehavior::RestoreStamina,
                position: Vec3::new(3.0, 0.5, 3.0),
            }],
            config: GameConfig::default(),
        }
    }
}

/// A scene with every image decoded and the game state built.
#[derive(Debug)]
pub struct LoadedScene {
    pub state: GameState,
    pub assets: AssetStore,
    pub atlas: TextureId,
    pub cursor: TextureId,
    pub map: TextureId,
}

impl SceneManifest {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Read a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| SceneError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load every referenced image from `base_dir` and build the game state.
    /// Fails on the first missing or invalid asset.
    pub fn instantiate(&self, base_dir: impl AsRef<Path>) -> Result<LoadedScene, SceneError> {
        let base_dir = base_dir.as_ref();
        self.config.validate()?;

        let mut assets = AssetStore::new();
        let map = load_relative(&mut assets, base_dir, &self.map)?;
        let atlas = load_relative(&mut assets, base_dir, &self.textures.atlas)?;
        let cursor = load_relative(&mut assets, base_dir, &self.textures.cursor)?;

        let map_image = assets.require(map)?;
        let grid = CollisionGrid::from_rgba(map_image.width, map_image.height, &map_image.rgba)?;

        let mut state = GameState::new(grid, self.camera, self.config);
        for spec in &self.sprites {
            let texture = load_relative(&mut assets, base_dir, &spec.texture)?;
            state.add_sprite(Sprite {
                texture,
                position: spec.position,
                size: spec.size,
            });
        }
        for spec in &self.pickups {
            let texture = load_relative(&mut assets, base_dir, &spec.texture)?;
            state.add_pickup(ItemPickup {
                position: spec.position,
                item: Item::new(spec.name.clone(), texture, spec.behavior),
            });
        }

        tracing::info!(
            width = state.grid().width(),
            height = state.grid().height(),
            walls = state.grid().wall_count(),
            sprites = state.sprites().len(),
            pickups = state.pickups().len(),
            images = assets.len(),
            "scene loaded"
        );

        Ok(LoadedScene {
            state,
            assets,
            atlas,
            cursor,
            map,
        })
    }
}

fn load_relative(
    assets: &mut AssetStore,
    base_dir: &Path,
    rel: &Path,
) -> Result<TextureId, AssetError> {
    assets.load_image(base_dir.join(rel))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write_demo_assets;

    #[test]
    fn default_manifest_is_demo_level() {
        let m = SceneManifest::default();
        assert_eq!(m.camera.position, Vec3::new(1.0, 0.5, 1.0));
        assert_eq!(m.camera.fovy, 60.0);
        assert_eq!(m.sprites[0].position, Vec3::new(5.0, 0.5, 5.0));
        assert_eq!(m.pickups[0].behavior, ItemBehavior::RestoreStamina);
    }

    #[test]
    fn yaml_with_defaults_fills_gaps() {
        let yaml = r#"
map: level.png
textures:
  atlas: atlas.png
  cursor: cursor.png
camera:
  position: [2.0, 0.5, 2.0]
pickups:
  - name: Rock
    texture: rock.png
    position: [3.0, 0.5, 4.0]
config:
  reach: 2.5
"#;
        let m = SceneManifest::from_yaml(yaml).unwrap();
        assert_eq!(m.camera.position, Vec3::new(2.0, 0.5, 2.0));
        assert_eq!(m.camera.target, Camera::default().target);
        assert!(m.sprites.is_empty());
        assert_eq!(m.pickups[0].behavior, ItemBehavior::Placeholder);
        assert_eq!(m.config.reach, 2.5);
        assert_eq!(m.config.player_speed, 1.0);
    }

    #[test]
    fn yaml_round_trips_default() {
        let m = SceneManifest::default();
        let text = m.to_yaml().unwrap();
        assert!(text.contains("restore_stamina"));
        assert_eq!(SceneManifest::from_yaml(&text).unwrap(), m);
    }

    #[test]
    fn instantiate_demo_scene() {
        let dir = tempfile::tempdir().unwrap();
        write_demo_assets(dir.path()).unwrap();

        let scene = SceneManifest::default().instantiate(dir.path()).unwrap();
        assert_eq!(scene.state.sprites().len(), 1);
        assert_eq!(scene.state.pickups().len(), 1);
        assert_eq!(scene.state.pickups()[0].item.name, "Energy Flavored Zesty Bar");
        assert!(scene.assets.get(scene.atlas).is_some());
        assert!(scene.assets.get(scene.cursor).is_some());
        assert!(scene.state.grid().wall_count() > 0);
        // Spawn point is open floor
        let cell = scene.state.grid().position_to_cell(scene.state.camera().position);
        assert!(!scene.state.grid().is_wall(cell));
    }

    #[test]
    fn missing_asset_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let err = SceneManifest::default().instantiate(dir.path()).unwrap_err();
        assert!(matches!(err, SceneError::Asset(AssetError::Io { .. })));
        assert!(err.to_string().contains("cubicmap.png"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = SceneManifest::default();
        m.config.reach = -1.0;
        assert!(matches!(
            m.instantiate(dir.path()),
            Err(SceneError::Config(_))
        ));
    }

    #[test]
    fn load_manifest_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yaml");
        std::fs::write(&path, SceneManifest::default().to_yaml().unwrap()).unwrap();
        assert_eq!(SceneManifest::load(&path).unwrap(), SceneManifest::default());

        std::fs::write(&path, "map: [not, a, path").unwrap();
        assert!(matches!(
            SceneManifest::load(&path),
            Err(SceneError::Yaml { .. })
        ));
    }
}
