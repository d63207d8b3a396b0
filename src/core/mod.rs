//! Core deterministic primitives.
//!
//! Randomness and hashing used by the simulation. Nothing in here knows
//! about tiles or boards.

pub mod rng;
pub mod hash;

// Re-export core types
pub use rng::{DeterministicRng, ScriptedRng, SpawnRng};
pub use hash::{compute_state_hash, StateHash, StateHasher};
