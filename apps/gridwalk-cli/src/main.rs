mod script;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gridwalk_assets::{LoadedScene, SceneManifest, write_demo_assets};
use gridwalk_kernel::GameEvent;
use gridwalk_render::{DebugTextRenderer, RenderView, Renderer};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridwalk-cli", about = "Headless tool for gridwalk levels")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SceneArgs {
    /// Directory the scene's image paths are resolved against
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Scene manifest (YAML). Defaults to the built-in demo level.
    #[arg(long)]
    scene: Option<PathBuf>,
}

impl SceneArgs {
    fn load(&self) -> Result<LoadedScene> {
        let manifest = match &self.scene {
            Some(path) => SceneManifest::load(path)?,
            None => SceneManifest::default(),
        };
        manifest
            .instantiate(&self.assets)
            .with_context(|| format!("loading scene assets from {}", self.assets.display()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the collision map as text
    Map {
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Run scripted input through the game loop and print the result
    Simulate {
        #[command(flatten)]
        scene: SceneArgs,
        /// Comma-separated steps, e.g. "w*120,collect,use"
        #[arg(long, default_value = "w*120,collect,use")]
        script: String,
        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
        /// Print a JSON summary instead of the text view
        #[arg(long)]
        json: bool,
    },
    /// Write the demo level's images
    DemoAssets {
        #[arg(long, default_value = "assets")]
        out: PathBuf,
    },
    /// Print the demo scene manifest as YAML
    Manifest,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    frames: u64,
    position: [f32; 3],
    stamina: f32,
    selected: usize,
    slots: Vec<Option<String>>,
    pickups_left: usize,
    collected: usize,
    discarded: usize,
    used: usize,
    blocked: usize,
}

fn workspace_info() -> [(&'static str, &'static str); 7] {
    [
        ("common", gridwalk_common::crate_info()),
        ("map", gridwalk_map::crate_info()),
        ("input", gridwalk_input::crate_info()),
        ("inventory", gridwalk_inventory::crate_info()),
        ("kernel", gridwalk_kernel::crate_info()),
        ("assets", gridwalk_assets::crate_info()),
        ("render", gridwalk_render::crate_info()),
    ]
}

/// Step the scene through `script`, tallying the events it produces.
fn simulate(scene: &mut LoadedScene, script: &str, dt: f32) -> Result<Summary> {
    let frames = script::parse(script)?;
    let state = &mut scene.state;
    let mut summary = Summary::default();
    for frame in &frames {
        state.step(frame, dt);
        for event in state.drain_events() {
            match event {
                GameEvent::PickupCollected { .. } => summary.collected += 1,
                GameEvent::ItemDiscarded { .. } => summary.discarded += 1,
                GameEvent::ItemUsed { .. } => summary.used += 1,
                GameEvent::MoveBlocked { .. } => summary.blocked += 1,
                GameEvent::SlotSelected { .. } | GameEvent::Stepped { .. } => {}
            }
        }
    }
    summary.frames = state.frame();
    summary.position = state.camera().position.to_array();
    summary.stamina = state.stamina().value();
    summary.selected = state.inventory().selected();
    summary.slots = state
        .inventory()
        .slots()
        .iter()
        .map(|slot| slot.as_ref().map(|item| item.name.clone()))
        .collect();
    summary.pickups_left = state.pickups().len();
    tracing::info!(frames = summary.frames, collected = summary.collected, "simulation finished");
    Ok(summary)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("gridwalk-cli v{}", env!("CARGO_PKG_VERSION"));
            for (name, info) in workspace_info() {
                println!("{name}: {info}");
            }
            println!("inventory slots: {}", gridwalk_inventory::SLOT_COUNT);
        }
        Commands::Map { scene } => {
            let scene = scene.load()?;
            let grid = scene.state.grid();
            print!("{}", grid.to_ascii());
            println!(
                "{}x{} cells, {} walls",
                grid.width(),
                grid.height(),
                grid.wall_count()
            );
        }
        Commands::Simulate {
            scene,
            script,
            dt,
            json,
        } => {
            let mut loaded = scene.load()?;
            let summary = simulate(&mut loaded, &script, dt)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let view = RenderView::from_camera(loaded.state.camera(), 1.0);
                print!("{}", DebugTextRenderer::new().render(&loaded.state, &view));
            }
        }
        Commands::DemoAssets { out } => {
            write_demo_assets(&out)
                .with_context(|| format!("writing demo assets to {}", out.display()))?;
            println!("demo assets written to {}", out.display());
        }
        Commands::Manifest => {
            print!("{}", SceneManifest::default().to_yaml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_scene() -> (tempfile::TempDir, LoadedScene) {
        let dir = tempfile::tempdir().unwrap();
        write_demo_assets(dir.path()).unwrap();
        let scene = SceneManifest::default().instantiate(dir.path()).unwrap();
        (dir, scene)
    }

    #[test]
    fn default_script_collects_and_eats_the_bar() {
        let (_dir, mut scene) = demo_scene();
        let summary = simulate(&mut scene, "w*120,collect,use", 1.0 / 60.0).unwrap();
        assert_eq!(summary.frames, 122);
        assert_eq!(summary.collected, 1);
        assert_eq!(summary.used, 1);
        assert_eq!(summary.pickups_left, 0);
        assert!(summary.slots.iter().all(Option::is_none));
        assert_eq!(summary.blocked, 0);
    }

    #[test]
    fn info_names_every_library_crate() {
        for (name, info) in workspace_info() {
            assert!(info.starts_with(&format!("gridwalk-{name} v")), "{info}");
        }
    }

    #[test]
    fn walking_into_a_wall_is_blocked() {
        let (_dir, mut scene) = demo_scene();
        let summary = simulate(&mut scene, "s*60", 1.0 / 60.0).unwrap();
        assert!(summary.blocked > 0);
        assert!(summary.position[0] >= 0.5 && summary.position[2] >= 0.5);
    }
}
