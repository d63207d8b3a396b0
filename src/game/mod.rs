//! Game Logic Module
//!
//! Board model, move resolution and the session engine. Deterministic given
//! the spawn RNG.
//!
//! ## Module Structure
//!
//! - `direction`: The four move commands
//! - `state`: Board, tiles, status and session state
//! - `moves`: Slide and merge resolution for one move
//! - `events`: Per-tile descriptors for renderers
//! - `engine`: Session lifecycle, spawning, score and status

pub mod direction;
pub mod state;
pub mod moves;
pub mod events;
pub mod engine;

// Re-export key types
pub use direction::Direction;
pub use state::{Board, GameState, GameStatus, Position, Tile, TileId};
pub use events::{GameEvent, GameEventData, MergeEvent};
pub use engine::{EngineError, GridEngine, MoveResult};
