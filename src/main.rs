//! Headless Tetris 2048 runner (default binary).
//!
//! Plays a scripted input sequence against a seeded session and prints the
//! final board. Sessions can be saved to and resumed from a JSON file. No terminal handling: presentation layers embed the core
//! crate directly and call `step` on their own clock.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use tetris_2048::core::{GameConfig, GameController, SavedGame, SnapshotView};
use tetris_2048::types::{Input, DEFAULT_HEIGHT, DEFAULT_WIDTH};

#[derive(Debug, Parser)]
#[command(name = "tetris-2048", about = "Run a scripted Tetris 2048 session")]
struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u16,

    /// Grid height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u16,

    /// Seed for the piece sequence
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// JSON file with game settings; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated inputs, repeated until the session ends
    /// (left, right, rotate, ccw, down, drop, hold, tick)
    #[arg(long, default_value = "drop")]
    script: String,

    /// Stop after this many steps even if the game is still running
    #[arg(long, default_value_t = 1000)]
    max_steps: u32,

    /// Print the final snapshot as JSON instead of a text board
    #[arg(long)]
    json: bool,

    /// Continue the session saved in this file (size, seed and config are
    /// taken from the save)
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Write the session to this file when the run stops
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let script = parse_script(&args.script)?;

    let mut game = match &args.resume {
        Some(path) => resume(path)?,
        None => {
            let config = load_config(args.config.as_ref())?;
            GameController::new(args.width, args.height, args.seed, config)
                .context("failed to start session")?
        }
    };
    let view = play(&mut game, &script, args.max_steps);

    if let Some(path) = &args.save {
        let saved = serde_json::to_string(&game.save()).context("failed to encode save")?;
        fs::write(path, saved).with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("saved session to {}", path.display());
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&view).context("failed to encode snapshot")?
        );
    } else {
        println!("{view}");
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn resume(path: &Path) -> Result<GameController> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read save {}", path.display()))?;
    let saved: SavedGame = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse save {}", path.display()))?;
    log::info!("resuming session seeded with {}", saved.source.seed());
    GameController::resume(saved).context("failed to resume session")
}

fn parse_script(script: &str) -> Result<Vec<Input>> {
    let inputs = script
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Input::from_str(token).with_context(|| format!("unknown input '{token}'")))
        .collect::<Result<Vec<_>>>()?;
    if inputs.is_empty() {
        bail!("script has no inputs");
    }
    Ok(inputs)
}

fn play(game: &mut GameController, script: &[Input], max_steps: u32) -> SnapshotView {
    let mut view = game.snapshot();
    for (step, input) in script.iter().cycle().take(max_steps as usize).enumerate() {
        if view.is_game_over() {
            log::info!("game over after {} steps", step);
            break;
        }
        view = game.step(*input);
    }
    view
}
