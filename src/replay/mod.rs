//! Transcript Recording and Replay
//!
//! A seeded game is fully determined by its seed, its config and the list
//! of commands applied: moves plus keep-playing confirmations. Recording
//! those with periodic state hashes lets anyone re-run the game and confirm
//! the claimed score.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    REPLAY                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  transcript.rs   - Seed, config, commands, checkpoints      │
//! │  verify.rs       - Verification by replay                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod transcript;
pub mod verify;

pub use transcript::{
    GameCommand, GameTranscript, GameOutcome, StateCheckpoint, TranscriptError,
    CHECKPOINT_INTERVAL, TRANSCRIPT_VERSION,
};
pub use verify::{replay_commands, verify_transcript, ReplayError, ReplaySummary};
