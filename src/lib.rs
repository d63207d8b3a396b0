//! # tile2048
//!
//! Headless game engine for the 2048 sliding-tile puzzle.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TILE2048 ENGINE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Spawn RNG trait, Xorshift128+, scripted   │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── direction.rs- Move commands                             │
//! │  ├── state.rs    - Board, tiles and session state            │
//! │  ├── moves.rs    - Slide and merge resolution                │
//! │  ├── events.rs   - Tile events for renderers                 │
//! │  └── engine.rs   - Session engine                            │
//! │                                                              │
//! │  config.rs       - Rule configuration                        │
//! │  persistence/    - Best score storage                        │
//! │  replay/         - Transcripts and verification by replay    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! With a seeded RNG the engine is fully reproducible:
//! - Tiles are kept in a BTreeMap, iteration is sorted by id
//! - No system time dependencies
//! - All randomness flows through [`SpawnRng`]
//!
//! Given the same seed, config and directions, two engines reach the
//! same state hash on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod config;
pub mod persistence;
pub mod replay;

// Re-export commonly used types
pub use core::rng::{DeterministicRng, ScriptedRng, SpawnRng};
pub use config::{ConfigError, EngineConfig};
pub use game::{
    Board, Direction, EngineError, GameState, GameStatus, GridEngine, MoveResult, Position,
    Tile, TileId,
};
pub use persistence::{BestScoreStore, MemoryStore, StoreError};
pub use replay::{verify_transcript, GameTranscript};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Board side length
pub const BOARD_SIZE: usize = 4;

/// Tile value that wins under the classic rules
pub const DEFAULT_WIN_VALUE: u32 = 2048;

/// Storage key for the best score
pub const BEST_SCORE_KEY: &str = "best2048";
