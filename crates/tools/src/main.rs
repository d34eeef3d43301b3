use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use serde::Serialize;

use fengate_core::{
    Config, Direction, Game, GameRng, InputEvent, MapStore, Phase, SimEvent, TileKind, World,
    load_world,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a config JSON file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a level map file from a seed
    Generate {
        #[arg(short, long)]
        seed: u64,
        #[arg(short, long, default_value_t = 1)]
        level: u32,
        /// Directory the level files live in
        #[arg(short, long)]
        dir: PathBuf,
    },
    /// Print an ASCII view and tile statistics of a map file
    Show {
        path: PathBuf,
        /// Emit the statistics as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run a seeded headless session with a scripted wander policy
    Simulate {
        #[arg(short, long)]
        seed: u64,
        #[arg(short, long, default_value_t = 10_000)]
        frames: u32,
        /// Optional map directory; levels without a file are generated
        #[arg(short, long)]
        maps: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct MapStats {
    width: usize,
    height: usize,
    grass: usize,
    water: usize,
    wall: usize,
    door: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    match args.command {
        Command::Generate { seed, level, dir } => generate(&config, seed, level, &dir),
        Command::Show { path, json } => show(&config, &path, json),
        Command::Simulate { seed, frames, maps } => simulate(config, seed, frames, maps),
    }
}

fn generate(config: &Config, seed: u64, level: u32, dir: &Path) -> Result<()> {
    let mut rng = GameRng::seed_from_u64(seed);
    let world = World::generate(config, &mut rng);

    let store = MapStore::new(dir);
    store
        .save(&world, level)
        .with_context(|| format!("Failed to write map for level {level}"))?;
    println!("Wrote {}", store.level_path(level).display());
    Ok(())
}

fn show(config: &Config, path: &Path, json: bool) -> Result<()> {
    let world = load_world(path, config)
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("Failed to load map file {}", path.display()))?;

    let mut stats = MapStats {
        width: world.width(),
        height: world.height(),
        grass: 0,
        water: 0,
        wall: 0,
        door: 0,
    };
    for ty in 0..world.height() {
        let mut row = String::with_capacity(world.width());
        for tx in 0..world.width() {
            let kind = world.tile(tx, ty).kind;
            row.push(glyph(kind));
            match kind {
                TileKind::Grass => stats.grass += 1,
                TileKind::Water => stats.water += 1,
                TileKind::Wall => stats.wall += 1,
                TileKind::Door => stats.door += 1,
            }
        }
        println!("{row}");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!(
            "{}x{}: {} grass, {} water, {} wall, {} door",
            stats.width, stats.height, stats.grass, stats.water, stats.wall, stats.door
        );
    }
    Ok(())
}

fn simulate(config: Config, seed: u64, frames: u32, maps: Option<PathBuf>) -> Result<()> {
    const DIRECTIONS: [Direction; 4] =
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    let mut game = match maps {
        Some(dir) => Game::with_map_store(config, seed, MapStore::new(dir)),
        None => Game::new(config, seed),
    };
    game.handle_event(InputEvent::Confirm);

    let mut cues = 0_usize;
    for frame_index in 0..frames {
        match game.phase() {
            Phase::Playing => {
                game.handle_event(InputEvent::Move(DIRECTIONS[(frame_index % 4) as usize]));
                game.frame(16);
            }
            Phase::Leveled => game.handle_event(InputEvent::Confirm),
            _ => break,
        }
        cues += game
            .drain_events()
            .iter()
            .filter(|event| matches!(event, SimEvent::SoundCue { .. }))
            .count();
    }

    let player = &game.state().player;
    println!("Simulation complete.");
    println!("Phase: {:?}", game.phase());
    println!("Outcome: {:?}", game.outcome());
    println!("Level: {} ({} kills)", player.level, player.mobs_killed);
    println!("Health: {} Air: {}", player.health, player.air);
    println!("Sound cues: {cues}");
    println!("Snapshot hash: {}", game.snapshot_hash());
    Ok(())
}

fn glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Grass => '.',
        TileKind::Water => '~',
        TileKind::Wall => '#',
        TileKind::Door => '+',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_tile_kind_has_a_distinct_glyph() {
        let glyphs: std::collections::BTreeSet<char> =
            [TileKind::Grass, TileKind::Water, TileKind::Wall, TileKind::Door]
                .into_iter()
                .map(glyph)
                .collect();
        assert_eq!(glyphs.len(), 4);
    }
}
