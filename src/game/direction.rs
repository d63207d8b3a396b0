//! Move Directions
//!
//! The four shift commands and their conversion from external encodings.
//! Anything outside the four values is rejected with
//! [`EngineError::InvalidDirection`] before it can reach the board.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::game::engine::EngineError;
use crate::game::state::Position;

/// Direction of a move. Tiles travel toward this edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Toward row 0
    Up = 0,
    /// Toward row 3
    Down = 1,
    /// Toward column 0
    Left = 2,
    /// Toward column 3
    Right = 3,
}

impl Direction {
    /// All directions in code order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Get direction from its code (0-3).
    pub fn from_index(index: u8) -> Option<Direction> {
        match index {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }

    /// Row/column step of one cell in this direction.
    #[inline]
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Neighbouring position one step in this direction, if on the board.
    #[inline]
    pub fn step(self, from: Position) -> Option<Position> {
        let (dr, dc) = self.delta();
        from.offset(dr, dc)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(EngineError::InvalidDirection(s.to_string())),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = EngineError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Direction::from_index(code).ok_or_else(|| EngineError::InvalidDirection(code.to_string()))
    }
}
