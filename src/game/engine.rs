//! Grid Engine
//!
//! Owns one session: board, score, status, spawn RNG and best-score store.
//! Presentation layers drive it with commands and render the returned
//! [`MoveResult`]s.

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, EngineConfig, PERMILLE};
use crate::core::hash::StateHash;
use crate::core::rng::{DeterministicRng, SpawnRng};
use crate::game::direction::Direction;
use crate::game::events::{GameEvent, MergeEvent};
use crate::game::moves::{move_changes_board, resolve_move};
use crate::game::state::{Board, GameState, GameStatus, Tile};
use crate::persistence::{BestScoreStore, MemoryStore};

/// Engine errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Session is lost; only a new game is accepted.
    #[error("Game over: start a new game before moving")]
    GameOver,

    /// Direction outside Up/Down/Left/Right.
    #[error("Invalid direction: {0:?}")]
    InvalidDirection(String),

    /// Tile value that is not a power of two of at least 2.
    #[error("Invalid tile value {value} at ({row}, {col})")]
    InvalidTileValue {
        /// Row of the offending cell.
        row: u8,
        /// Column of the offending cell.
        col: u8,
        /// Rejected value.
        value: u32,
    },

    /// Rejected configuration.
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),
}

/// Result of an accepted or no-op move.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveResult {
    /// Direction that was applied
    pub direction: Direction,
    /// Snapshot of the state after the move
    pub state: GameState,
    /// Did any tile move or merge?
    pub changed: bool,
    /// Points earned by this move
    pub score_delta: u32,
    /// Slides, merges, spawn and status changes in order
    pub events: Vec<GameEvent>,
    /// Tile spawned after the move, if any
    pub spawned: Option<Tile>,
    /// Status after the move
    pub status: GameStatus,
}

impl MoveResult {
    /// Merge descriptors in resolution order.
    pub fn merges(&self) -> impl Iterator<Item = &MergeEvent> {
        self.events.iter().filter_map(GameEvent::as_merge)
    }
}

/// The 2048 grid engine.
///
/// Generic over the spawn RNG and the best-score store so both can be
/// swapped for fakes in tests.
#[derive(Debug)]
pub struct GridEngine<R = DeterministicRng, S = MemoryStore> {
    config: EngineConfig,
    rng: R,
    store: S,
    state: GameState,
}

impl GridEngine<DeterministicRng, MemoryStore> {
    /// Engine with the classic rules, a seeded RNG and an in-memory store.
    pub fn with_seed(seed: u64) -> Self {
        Self::start(
            EngineConfig::default(),
            DeterministicRng::new(seed),
            MemoryStore::new(),
            None,
        )
    }

    /// Seeded engine with a custom config.
    pub fn seeded(seed: u64, config: EngineConfig) -> Result<Self, EngineError> {
        Self::new(config, DeterministicRng::new(seed), MemoryStore::new())
    }
}

impl<R: SpawnRng, S: BestScoreStore> GridEngine<R, S> {
    /// Create an engine and start the first session.
    pub fn new(config: EngineConfig, rng: R, store: S) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::start(config, rng, store, None))
    }

    /// Create an engine whose first session starts from a given board.
    ///
    /// No tiles are spawned; status starts as `Playing`.
    pub fn from_board(config: EngineConfig, rng: R, store: S, board: Board) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::start(config, rng, store, Some(board)))
    }

    fn start(config: EngineConfig, rng: R, store: S, board: Option<Board>) -> Self {
        let best = match store.load_best(&config.best_score_key) {
            Ok(best) => best.unwrap_or(0),
            Err(e) => {
                warn!("Failed to load best score ({}): {}", config.best_score_key, e);
                0
            }
        };

        let mut engine = Self {
            config,
            rng,
            store,
            state: GameState::new(Board::new(), best),
        };

        match board {
            Some(board) => {
                engine.state = GameState::new(board, best);
                debug!("Session started from board with {} tiles", engine.state.board.tile_count());
            }
            None => {
                engine.new_game();
            }
        }
        engine
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Start a fresh session: empty board, score 0, `Playing`, initial spawns.
    ///
    /// `best` carries over from the previous session.
    pub fn new_game(&mut self) -> &GameState {
        self.state = GameState::new(Board::new(), self.state.best);
        for _ in 0..self.config.initial_tiles {
            self.spawn_random_tile();
        }
        info!(
            "New game: {} tiles, best {}",
            self.state.board.tile_count(),
            self.state.best
        );
        &self.state
    }

    /// Apply one move.
    ///
    /// A move that changes nothing returns `changed: false` with the board
    /// untouched; it still re-evaluates whether the game is lost.
    pub fn apply_move(&mut self, direction: Direction) -> Result<MoveResult, EngineError> {
        if !self.state.status.accepts_moves() {
            warn!("Rejected move {} after game over", direction);
            return Err(EngineError::GameOver);
        }

        let move_number = self.state.move_count + 1;
        let resolution = resolve_move(&mut self.state.board, direction, move_number);
        let mut events = resolution.events;
        let mut spawned = None;

        if resolution.changed {
            self.state.move_count = move_number;
            if self.state.add_score(resolution.score_delta) {
                self.persist_best();
            }
            spawned = self.spawn_random_tile();
            if let Some(tile) = spawned {
                events.push(GameEvent::spawned(move_number, tile));
            }
            debug!(
                "Move {} ({}): +{} points, score {}",
                move_number, direction, resolution.score_delta, self.state.score
            );
        } else {
            debug!("Move {} changed nothing", direction);
        }

        let old_status = self.state.status;
        let new_status = self.evaluate_status(resolution.changed);
        if new_status != old_status {
            self.state.status = new_status;
            events.push(GameEvent::status_changed(self.state.move_count, old_status, new_status));
            info!(
                "Status {:?} -> {:?} at move {} (score {})",
                old_status, new_status, self.state.move_count, self.state.score
            );
        }

        Ok(MoveResult {
            direction,
            state: self.state.clone(),
            changed: resolution.changed,
            score_delta: resolution.score_delta,
            events,
            spawned,
            status: new_status,
        })
    }

    /// Parse a direction name and apply it.
    ///
    /// Unknown names are rejected before the board is touched.
    pub fn apply_named_move(&mut self, name: &str) -> Result<MoveResult, EngineError> {
        let direction: Direction = name.parse()?;
        self.apply_move(direction)
    }

    /// Keep playing after a win. Returns true if the status changed.
    pub fn confirm_keep_playing(&mut self) -> bool {
        if self.state.status != GameStatus::Won {
            return false;
        }
        self.state.status = GameStatus::WonContinued;
        info!("Player continues after winning (score {})", self.state.score);
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.state.board
    }

    /// Session score.
    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Best score known to this engine.
    pub fn best(&self) -> u32 {
        self.state.best
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    /// Largest tile on the board.
    pub fn max_tile(&self) -> u32 {
        self.state.board.max_value()
    }

    /// True if an empty cell exists or two adjacent tiles are equal.
    pub fn moves_available(&self) -> bool {
        self.state.board.moves_available()
    }

    /// Would `direction` change the board? Never mutates.
    pub fn can_move(&self, direction: Direction) -> bool {
        self.state.status.accepts_moves() && move_changes_board(&self.state.board, direction)
    }

    /// `can_move` for every direction, indexed by direction code.
    pub fn legal_moves(&self) -> [bool; 4] {
        Direction::ALL.map(|d| self.can_move(d))
    }

    /// Hash of the current state.
    pub fn state_hash(&self) -> StateHash {
        self.state.compute_hash()
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Best-score store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Spawn one tile in a uniformly random empty cell.
    fn spawn_random_tile(&mut self) -> Option<Tile> {
        let empty = self.state.board.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let idx = self.rng.next_int(empty.len() as u32) as usize;
        let pos = *empty.get(idx)?;
        let value = if self.rng.chance(self.config.four_chance_permille, PERMILLE) {
            4
        } else {
            2
        };
        let tile = self.state.board.spawn(pos, value)?;
        debug!("Spawned {} at ({}, {}) as {}", value, pos.row, pos.col, tile.id);
        Some(tile)
    }

    fn persist_best(&mut self) {
        if let Err(e) = self.store.save_best(&self.config.best_score_key, self.state.best) {
            warn!("Failed to persist best score {}: {}", self.state.best, e);
        }
    }

    /// Status after the latest move attempt.
    ///
    /// A win needs a move that changed the board; loss is checked either way.
    fn evaluate_status(&self, changed: bool) -> GameStatus {
        let board = &self.state.board;
        match self.state.status {
            GameStatus::Playing if changed && board.max_value() >= self.config.win_value => {
                GameStatus::Won
            }
            GameStatus::Playing | GameStatus::WonContinued if !board.moves_available() => GameStatus::Lost,
            status => status,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
