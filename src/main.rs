//! tile2048 demo
//!
//! Plays a seeded game with a fixed direction preference, records a
//! transcript and verifies it by replay.

use std::env;
use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tile2048::{
    VERSION,
    config::EngineConfig,
    game::{Direction, GameStatus, GridEngine},
    replay::{verify_transcript, GameTranscript},
};

/// Self-play preference: keep the big tiles in the bottom-left corner.
const PREFERENCE: [Direction; 4] = [
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::Up,
];

const DEFAULT_SEED: u64 = 12345;
const DEFAULT_MAX_MOVES: usize = 5000;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("tile2048 v{}", VERSION);

    let config = load_config()?;
    let seed = env_or("TILE2048_SEED", DEFAULT_SEED)?;
    let max_moves = env_or("TILE2048_MOVES", DEFAULT_MAX_MOVES)?;

    demo_game(seed, config, max_moves)
}

fn load_config() -> Result<EngineConfig> {
    match env::var("TILE2048_CONFIG") {
        Ok(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config {}", path))?;
            let config = EngineConfig::from_json_str(&json)
                .with_context(|| format!("Invalid config {}", path))?;
            info!("Loaded config from {}", path);
            Ok(config)
        }
        Err(_) => Ok(EngineConfig::default()),
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

/// Play one game and check it replays to the same hash.
fn demo_game(seed: u64, config: EngineConfig, max_moves: usize) -> Result<()> {
    info!("=== Starting Demo Game ===");
    info!("RNG Seed: {}", seed);

    let mut engine = GridEngine::seeded(seed, config.clone())?;
    let mut transcript = GameTranscript::new(seed, config, engine.state());

    let mut merges = 0;
    for _ in 0..max_moves {
        // No legal direction left: attempt one anyway so the loss registers
        let direction = PREFERENCE
            .iter()
            .copied()
            .find(|d| engine.can_move(*d))
            .unwrap_or(PREFERENCE[0]);

        let result = engine.apply_move(direction)?;
        merges += result.merges().count();
        transcript.record(&result);

        if result.changed && result.state.move_count % 100 == 0 {
            info!(
                "Move {}: score {}, max tile {}, {} merges so far",
                result.state.move_count,
                result.state.score,
                engine.max_tile(),
                merges
            );
        }

        match result.status {
            GameStatus::Won => {
                info!("Reached {} at move {}", engine.max_tile(), result.state.move_count);
                if engine.confirm_keep_playing() {
                    transcript.record_keep_playing();
                }
            }
            GameStatus::Lost => {
                info!("Game over at move {}", result.state.move_count);
                break;
            }
            _ => {}
        }
    }

    // Print final results
    let state = engine.state();
    transcript.finish(state);

    info!("=== Game Results ===");
    info!("Final board:\n{}", state.board);
    info!("Score: {} (best {})", state.score, state.best);
    info!("Max tile: {}", engine.max_tile());
    info!("Status: {:?}", state.status);

    let hash = engine.state_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    let bytes = transcript.to_bytes()?;
    info!(
        "Transcript: {} moves, {} checkpoints, {} bytes",
        transcript.move_count(),
        transcript.checkpoints.len(),
        bytes.len()
    );

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let decoded = GameTranscript::from_bytes(&bytes)?;
    match verify_transcript(&decoded) {
        Ok(summary) => {
            info!("Replay State Hash: {}", hex::encode(summary.final_state.compute_hash()));
            info!(
                "DETERMINISM VERIFIED: {} commands, {} checkpoints match",
                summary.commands_replayed, summary.checkpoints_verified
            );
        }
        Err(e) => {
            warn!("DETERMINISM FAILURE: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
