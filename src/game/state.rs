//! Game State Definitions
//!
//! The board, its tiles and the per-session game state.
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Deserialize};

use crate::BOARD_SIZE;
use crate::core::hash::{StateHash, compute_state_hash};
use crate::game::engine::EngineError;

// =============================================================================
// TILE ID / POSITION
// =============================================================================

/// Unique tile identifier within a session.
///
/// Minted by the board from a monotonic counter starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cell coordinate, both components in `[0, BOARD_SIZE)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row, 0 is the top edge
    pub row: u8,
    /// Column, 0 is the left edge
    pub col: u8,
}

impl Position {
    /// Create a position. Callers keep both components on the board.
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Position shifted by `(dr, dc)`, or `None` if that leaves the board.
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Position> {
        let row = self.row as i16 + dr as i16;
        let col = self.col as i16 + dc as i16;
        let size = BOARD_SIZE as i16;
        if row < 0 || row >= size || col < 0 || col >= size {
            return None;
        }
        Some(Position::new(row as u8, col as u8))
    }

    /// All positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE as u8).flat_map(|row| (0..BOARD_SIZE as u8).map(move |col| Position::new(row, col)))
    }
}

// =============================================================================
// TILE
// =============================================================================

/// A live tile on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Unique id (stable across slides, merges keep the destination id)
    pub id: TileId,
    /// Power of two, at least 2
    pub value: u32,
    /// Current cell
    pub position: Position,
}

/// Check that a value can sit on a tile.
#[inline]
pub fn is_valid_tile_value(value: u32) -> bool {
    value >= 2 && value.is_power_of_two()
}

// =============================================================================
// BOARD
// =============================================================================

/// The 4×4 grid together with the tiles it holds.
///
/// Both views (cell grid and id map) live behind this one type and are only
/// changed through `spawn`, `slide` and `merge`, which keep them in step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<TileId>; BOARD_SIZE]; BOARD_SIZE],
    tiles: BTreeMap<TileId, Tile>,
    next_tile_id: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            tiles: BTreeMap::new(),
            next_tile_id: 1,
        }
    }

    /// Build a board from a value matrix (0 = empty).
    ///
    /// Tile ids are assigned in row-major order starting at 1.
    pub fn from_values(values: [[u32; BOARD_SIZE]; BOARD_SIZE]) -> Result<Self, EngineError> {
        let mut board = Self::new();
        for pos in Position::all() {
            let value = values[pos.row as usize][pos.col as usize];
            if value == 0 {
                continue;
            }
            if !is_valid_tile_value(value) {
                return Err(EngineError::InvalidTileValue {
                    row: pos.row,
                    col: pos.col,
                    value,
                });
            }
            board.spawn(pos, value);
        }
        Ok(board)
    }

    /// Tile by id.
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Id of the tile in a cell.
    #[inline]
    pub fn id_at(&self, pos: Position) -> Option<TileId> {
        self.cells[pos.row as usize][pos.col as usize]
    }

    /// Tile in a cell.
    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        self.id_at(pos).and_then(|id| self.tiles.get(&id))
    }

    /// Value in a cell, 0 when empty.
    #[inline]
    pub fn value_at(&self, pos: Position) -> u32 {
        self.tile_at(pos).map_or(0, |t| t.value)
    }

    /// Live tiles in id order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Number of live tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Id the next spawned tile will get.
    pub fn next_tile_id(&self) -> TileId {
        TileId(self.next_tile_id)
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Position> {
        Position::all().filter(|p| self.id_at(*p).is_none()).collect()
    }

    /// True if every cell holds a tile.
    pub fn is_full(&self) -> bool {
        self.tiles.len() == BOARD_SIZE * BOARD_SIZE
    }

    /// Value matrix (0 = empty).
    pub fn values(&self) -> [[u32; BOARD_SIZE]; BOARD_SIZE] {
        let mut out = [[0; BOARD_SIZE]; BOARD_SIZE];
        for tile in self.tiles.values() {
            out[tile.position.row as usize][tile.position.col as usize] = tile.value;
        }
        out
    }

    /// Largest tile value, 0 on an empty board.
    pub fn max_value(&self) -> u32 {
        self.tiles.values().map(|t| t.value).max().unwrap_or(0)
    }

    /// True if two edge-adjacent tiles share a value.
    pub fn has_adjacent_equal(&self) -> bool {
        Position::all().any(|pos| {
            let value = self.value_at(pos);
            if value == 0 {
                return false;
            }
            // Right and down neighbours cover every pair once
            [pos.offset(0, 1), pos.offset(1, 0)]
                .into_iter()
                .flatten()
                .any(|n| self.value_at(n) == value)
        })
    }

    /// True if some move could still change the board.
    pub fn moves_available(&self) -> bool {
        !self.is_full() || self.has_adjacent_equal()
    }

    /// Check that the cell grid and the id map agree.
    pub fn is_consistent(&self) -> bool {
        let mut seen = 0usize;
        for pos in Position::all() {
            if let Some(id) = self.id_at(pos) {
                match self.tiles.get(&id) {
                    Some(tile) if tile.position == pos && tile.id == id && is_valid_tile_value(tile.value) => {
                        seen += 1;
                    }
                    _ => return false,
                }
                if id.0 >= self.next_tile_id {
                    return false;
                }
            }
        }
        seen == self.tiles.len()
    }

    // -------------------------------------------------------------------------
    // Mutation (crate-internal)
    // -------------------------------------------------------------------------

    /// Place a new tile into an empty cell, minting its id.
    pub(crate) fn spawn(&mut self, pos: Position, value: u32) -> Option<Tile> {
        if self.id_at(pos).is_some() {
            return None;
        }
        let id = TileId(self.next_tile_id);
        self.next_tile_id += 1;

        let tile = Tile { id, value, position: pos };
        self.cells[pos.row as usize][pos.col as usize] = Some(id);
        self.tiles.insert(id, tile);
        debug_assert!(self.is_consistent());
        Some(tile)
    }

    /// Move a tile to an empty cell.
    pub(crate) fn slide(&mut self, id: TileId, to: Position) -> bool {
        if self.id_at(to).is_some() {
            return false;
        }
        let Some(tile) = self.tiles.get_mut(&id) else {
            return false;
        };
        let from = tile.position;
        tile.position = to;
        self.cells[from.row as usize][from.col as usize] = None;
        self.cells[to.row as usize][to.col as usize] = Some(id);
        debug_assert!(self.is_consistent());
        true
    }

    /// Fold tile `from` into tile `into`. Returns the doubled value.
    ///
    /// `from` leaves the board; `into` keeps its id and cell.
    pub(crate) fn merge(&mut self, from: TileId, into: TileId) -> Option<u32> {
        if from == into {
            return None;
        }
        let target_value = self.tiles.get(&into)?.value;
        let source = self.tiles.get(&from)?;
        if source.value != target_value {
            return None;
        }
        let source_pos = source.position;

        self.tiles.remove(&from);
        self.cells[source_pos.row as usize][source_pos.col as usize] = None;

        let target = self.tiles.get_mut(&into)?;
        target.value *= 2;
        let result = target.value;
        debug_assert!(self.is_consistent());
        Some(result)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.values() {
            let line: Vec<String> = row
                .iter()
                .map(|v| if *v == 0 { format!("{:>5}", ".") } else { format!("{:>5}", v) })
                .collect();
            writeln!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}

// =============================================================================
// GAME STATUS
// =============================================================================

/// Session status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum GameStatus {
    /// Normal play
    #[default]
    Playing = 0,
    /// A tile reached the win value; waiting for the player's choice
    Won = 1,
    /// Player chose to keep going after winning
    WonContinued = 2,
    /// No move can change the board
    Lost = 3,
}

impl GameStatus {
    /// Can the engine still accept moves?
    #[inline]
    pub fn accepts_moves(self) -> bool {
        self != GameStatus::Lost
    }
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete state of one session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Board and tiles
    pub board: Board,

    /// Session score (sum of merge results)
    pub score: u32,

    /// Best score seen, seeded from the store
    pub best: u32,

    /// Current status
    pub status: GameStatus,

    /// Accepted moves this session
    pub move_count: u32,
}

impl GameState {
    /// Fresh state around a board.
    pub fn new(board: Board, best: u32) -> Self {
        Self {
            board,
            score: 0,
            best,
            status: GameStatus::Playing,
            move_count: 0,
        }
    }

    /// Add to the score, raising `best` if passed. Returns true if `best` moved.
    pub(crate) fn add_score(&mut self, delta: u32) -> bool {
        self.score = self.score.saturating_add(delta);
        if self.score > self.best {
            self.best = self.score;
            true
        } else {
            false
        }
    }

    /// Compute hash of current state for verification.
    ///
    /// `best` is excluded: it depends on the store, not on the session.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.move_count, self.score, |hasher| {
            for pos in Position::all() {
                match self.board.tile_at(pos) {
                    Some(tile) => {
                        hasher.update_u32(tile.id.0);
                        hasher.update_u32(tile.value);
                    }
                    None => {
                        hasher.update_u32(0);
                        hasher.update_u32(0);
                    }
                }
            }
            hasher.update_u32(self.board.next_tile_id().0);
            hasher.update_u8(self.status as u8);
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
