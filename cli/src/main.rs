use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;
use tabletop_core::gate::{can_player_move_to, proximity_gain};
use tabletop_core::player::player_by_id;
use tabletop_core::{audio_links, Player, Scene};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tabletop-cli",
    version,
    about = "Inspect rooms and audio links of a tabletop scene"
)]
struct Cli {
    /// JSON scene with rules, elements and players.
    #[arg(long, global = true, env = "TABLETOP_SCENE", default_value = "scene.json")]
    scene: PathBuf,
    /// Overrides the scene's proximity range (clamped to 50..=300).
    #[arg(long, global = true, env = "TABLETOP_PROXIMITY_RANGE")]
    proximity_range: Option<f32>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detected rooms and who is in them.
    Rooms,
    /// Whether a player may walk straight to a point.
    Move {
        #[arg(long)]
        player: String,
        #[arg(long)]
        x: f32,
        #[arg(long)]
        y: f32,
    },
    /// Audio gain between two players.
    Gain {
        #[arg(long)]
        a: String,
        #[arg(long)]
        b: String,
    },
    /// Every audible pair.
    Links,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut scene = load_scene(&cli.scene)?;
    if let Some(range) = cli.proximity_range {
        scene.rules.set_proximity_range(range);
    }
    info!(
        elements = scene.elements.len(),
        players = scene.players.len(),
        range = scene.rules.proximity_range,
        "scene loaded"
    );

    let output = match cli.command {
        Commands::Rooms => serde_json::to_value(&scene.layout().rooms)?,
        Commands::Move { player, x, y } => {
            let player = find_player(&scene, &player)?;
            serde_json::to_value(can_player_move_to(player, x, y, &scene.elements))?
        }
        Commands::Gain { a, b } => {
            let layout = scene.layout();
            let first = find_player(&scene, &a)?;
            let second = find_player(&scene, &b)?;
            json!({
                "a": a,
                "b": b,
                "sameRoom": layout.room_id_of(&a) == layout.room_id_of(&b),
                "gain": proximity_gain(first, second, &layout, scene.rules.proximity_range),
            })
        }
        Commands::Links => {
            let layout = scene.layout();
            serde_json::to_value(audio_links(&scene.players, &layout, scene.rules.proximity_range))?
        }
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_scene(path: &Path) -> anyhow::Result<Scene> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading scene {}", path.display()))?;
    let scene: Scene = serde_json::from_str(&raw)
        .with_context(|| format!("parsing scene {}", path.display()))?;
    scene.validate().with_context(|| format!("invalid scene {}", path.display()))?;
    Ok(scene)
}

fn find_player<'a>(scene: &'a Scene, id: &str) -> anyhow::Result<&'a Player> {
    match player_by_id(&scene.players, id) {
        Some(player) => Ok(player),
        None => bail!("unknown player: {id}"),
    }
}
