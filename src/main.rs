use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_fsm::game::{GameConfig, GameEngine, TickRate};
use snake_fsm::modes::{HumanMode, ReplayMode};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_fsm")]
#[command(version, about = "Snake on a 10x10 board, driven by a finite-state engine")]
struct Cli {
    /// How events reach the engine
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// Milliseconds between ticks (100-1000, adjustable in game with +/-)
    #[arg(long, default_value_t = TickRate::DEFAULT_MS)]
    tick_ms: u64,

    /// Seed for food placement; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Replay script to read instead of stdin (replay mode)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write logs to this file. The interactive mode logs nowhere otherwise.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Apply a scripted event sequence and print JSON snapshots
    Replay,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.mode, cli.log_file.as_deref())?;

    let tick_rate = TickRate::new(cli.tick_ms).context("Invalid --tick-ms")?;
    let config = GameConfig::with_tick_rate(tick_rate);
    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    }
    .context("Invalid game configuration")?;

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(engine);
            human_mode.run().await?;
        }
        Mode::Replay => {
            let mut replay_mode = ReplayMode::new(engine);
            let stdout = io::stdout().lock();
            match cli.script {
                Some(path) => {
                    let file = File::open(&path)
                        .with_context(|| format!("Failed to open script {}", path.display()))?;
                    replay_mode.run(BufReader::new(file), stdout)?;
                }
                None => {
                    replay_mode.run(io::stdin().lock(), stdout)?;
                }
            }
        }
    }

    Ok(())
}

/// The terminal belongs to the game in human mode, so logs only go to a file
/// there. Replay mode logs to stderr and keeps stdout for snapshots.
fn init_tracing(mode: Mode, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match (log_file, mode) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (None, Mode::Replay) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        (None, Mode::Human) => {}
    }

    Ok(())
}
