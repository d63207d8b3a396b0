//! Game Transcript Recording
//!
//! Records what is needed to replay a seeded game move for move: the seed,
//! the rules, every player command and periodic state hashes.

use serde::{Serialize, Deserialize};

use crate::config::EngineConfig;
use crate::core::hash::StateHash;
use crate::game::direction::Direction;
use crate::game::engine::MoveResult;
use crate::game::state::{GameState, GameStatus};

/// Current transcript version.
pub const TRANSCRIPT_VERSION: u8 = 1;

/// Checkpoint interval in accepted moves.
pub const CHECKPOINT_INTERVAL: u32 = 32;

/// Complete record of a seeded game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTranscript {
    /// Version for forward compatibility.
    pub version: u8,

    /// Seed of the spawn RNG.
    pub seed: u64,

    /// Rules the game ran with.
    pub config: EngineConfig,

    /// Hash of the state right after the initial spawns.
    pub initial_hash: StateHash,

    /// Every player command in order, no-op moves included.
    pub commands: Vec<GameCommand>,

    /// State hash checkpoints.
    pub checkpoints: Vec<StateCheckpoint>,

    /// Final outcome, set by `finish`.
    pub outcome: Option<GameOutcome>,
}

/// One recorded player command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCommand {
    /// Move in a direction
    Move(Direction),
    /// Accepted `confirm_keep_playing` after a win
    KeepPlaying,
}

/// State hash after an accepted move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCheckpoint {
    /// Accepted-move counter at the checkpoint.
    pub move_number: u32,
    /// State hash at that point.
    pub state_hash: StateHash,
}

/// Final game outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Final score.
    pub final_score: u32,
    /// Final status.
    pub final_status: GameStatus,
    /// Accepted moves.
    pub move_count: u32,
    /// Final state hash.
    pub final_hash: StateHash,
}

/// Errors that can occur with transcripts.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    /// Binary decoding failed.
    #[error("Deserialization failed: {0}")]
    Binary(#[from] bincode::Error),

    /// JSON decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GameTranscript {
    /// Start a transcript for a freshly started seeded game.
    pub fn new(seed: u64, config: EngineConfig, initial: &GameState) -> Self {
        Self {
            version: TRANSCRIPT_VERSION,
            seed,
            config,
            initial_hash: initial.compute_hash(),
            commands: Vec::new(),
            checkpoints: Vec::new(),
            outcome: None,
        }
    }

    /// Record a move result, adding a checkpoint on interval boundaries.
    pub fn record(&mut self, result: &MoveResult) {
        self.commands.push(GameCommand::Move(result.direction));
        let move_number = result.state.move_count;
        if result.changed && move_number % CHECKPOINT_INTERVAL == 0 {
            self.checkpoints.push(StateCheckpoint {
                move_number,
                state_hash: result.state.compute_hash(),
            });
        }
    }

    /// Record a keep-playing confirmation the engine accepted.
    pub fn record_keep_playing(&mut self) {
        self.commands.push(GameCommand::KeepPlaying);
    }

    /// Number of recorded moves, no-ops included.
    pub fn move_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, GameCommand::Move(_)))
            .count()
    }

    /// Finalize with the state the game ended in.
    pub fn finish(&mut self, state: &GameState) {
        self.outcome = Some(GameOutcome {
            final_score: state.score,
            final_status: state.status,
            move_count: state.move_count,
            final_hash: state.compute_hash(),
        });
    }

    /// Check if transcript is complete.
    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    /// Serialize to bytes using bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TranscriptError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TranscriptError> {
        Ok(bincode::deserialize(data)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, TranscriptError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(s: &str) -> Result<Self, TranscriptError> {
        Ok(serde_json::from_str(s)?)
    }
}
