//! Verification by Replay
//!
//! Re-runs a transcript in a fresh seeded engine and compares hashes.

use tracing::debug;

use crate::config::EngineConfig;
use crate::core::hash::StateHash;
use crate::game::engine::{EngineError, GridEngine};
use crate::game::state::GameState;
use crate::replay::transcript::{GameCommand, GameTranscript, TRANSCRIPT_VERSION};

/// Errors that can occur during verification.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// Transcript version mismatch.
    #[error("Version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Supported version.
        expected: u8,
        /// Transcript version.
        got: u8,
    },

    /// Transcript has no outcome.
    #[error("Transcript is incomplete")]
    IncompleteTranscript,

    /// Initial state differs.
    #[error("Initial state hash mismatch")]
    InitialStateMismatch,

    /// Checkpoint hash differs.
    #[error("Checkpoint mismatch at move {move_number}")]
    CheckpointMismatch {
        /// Move where the mismatch occurred.
        move_number: u32,
        /// Hash from the transcript.
        expected: StateHash,
        /// Hash from the replay.
        computed: StateHash,
    },

    /// Keep-playing recorded where the game was not in `Won`.
    #[error("Keep-playing at command {0} but the game was not won")]
    InvalidKeepPlaying(usize),

    /// Recorded checkpoint was never reached.
    #[error("Checkpoint at move {0} was never reached")]
    MissingCheckpoint(u32),

    /// Final score differs.
    #[error("Score mismatch: expected {expected}, got {got}")]
    ScoreMismatch {
        /// Score from the transcript.
        expected: u32,
        /// Score from the replay.
        got: u32,
    },

    /// Final state hash differs.
    #[error("Final state hash mismatch")]
    FinalStateMismatch,

    /// Engine refused a recorded move or the config.
    #[error("Engine error during replay: {0}")]
    Engine(#[from] EngineError),
}

/// Summary of a successful verification.
#[derive(Debug)]
pub struct ReplaySummary {
    /// State the replay ended in.
    pub final_state: GameState,
    /// Commands re-applied.
    pub commands_replayed: usize,
    /// Checkpoints matched.
    pub checkpoints_verified: usize,
}

/// Replay a command list from a seed and return the resulting state.
pub fn replay_commands(
    seed: u64,
    config: EngineConfig,
    commands: &[GameCommand],
) -> Result<GameState, EngineError> {
    let mut engine = GridEngine::seeded(seed, config)?;
    for command in commands {
        match command {
            GameCommand::Move(direction) => {
                engine.apply_move(*direction)?;
            }
            GameCommand::KeepPlaying => {
                engine.confirm_keep_playing();
            }
        }
    }
    Ok(engine.state().clone())
}

/// Verify a transcript by full replay.
///
/// Stops at the first mismatch.
pub fn verify_transcript(transcript: &GameTranscript) -> Result<ReplaySummary, ReplayError> {
    if transcript.version != TRANSCRIPT_VERSION {
        return Err(ReplayError::VersionMismatch {
            expected: TRANSCRIPT_VERSION,
            got: transcript.version,
        });
    }
    let outcome = transcript.outcome.ok_or(ReplayError::IncompleteTranscript)?;

    let mut engine = GridEngine::seeded(transcript.seed, transcript.config.clone())?;
    if engine.state_hash() != transcript.initial_hash {
        return Err(ReplayError::InitialStateMismatch);
    }

    let mut pending = transcript.checkpoints.iter().peekable();
    let mut checkpoints_verified = 0;

    for (index, command) in transcript.commands.iter().enumerate() {
        let direction = match command {
            GameCommand::Move(direction) => *direction,
            GameCommand::KeepPlaying => {
                if !engine.confirm_keep_playing() {
                    return Err(ReplayError::InvalidKeepPlaying(index));
                }
                continue;
            }
        };

        let result = engine.apply_move(direction)?;
        if !result.changed {
            continue;
        }
        if let Some(cp) = pending.next_if(|cp| cp.move_number == result.state.move_count) {
            let computed = result.state.compute_hash();
            if computed != cp.state_hash {
                return Err(ReplayError::CheckpointMismatch {
                    move_number: cp.move_number,
                    expected: cp.state_hash,
                    computed,
                });
            }
            checkpoints_verified += 1;
        }
    }

    if let Some(cp) = pending.next() {
        return Err(ReplayError::MissingCheckpoint(cp.move_number));
    }

    let final_state = engine.state().clone();
    if final_state.score != outcome.final_score {
        return Err(ReplayError::ScoreMismatch {
            expected: outcome.final_score,
            got: final_state.score,
        });
    }
    if final_state.compute_hash() != outcome.final_hash {
        return Err(ReplayError::FinalStateMismatch);
    }

    debug!(
        "Transcript verified: {} commands, {} checkpoints",
        transcript.commands.len(),
        checkpoints_verified
    );

    Ok(ReplaySummary {
        final_state,
        commands_replayed: transcript.commands.len(),
        checkpoints_verified,
    })
}
