//! Game Events
//!
//! Per-tile descriptors produced by a move, in the order they happened.
//! A renderer can animate straight from these without diffing boards.

use serde::{Serialize, Deserialize};

use crate::game::state::{GameStatus, Position, Tile, TileId};

/// One merge: `from_tile_id` folded into `into_tile_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeEvent {
    /// Tile that moved and was consumed
    pub from_tile_id: TileId,
    /// Tile that absorbed it and survives
    pub into_tile_id: TileId,
    /// Value of the surviving tile after the merge
    pub result_value: u32,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Tile moved without changing value
    Slid {
        tile_id: TileId,
        from: Position,
        to: Position,
    },

    /// Tile travelled from `from` into the tile at `at` and was consumed
    Merged {
        merge: MergeEvent,
        from: Position,
        at: Position,
    },

    /// New tile appeared after an accepted move or at session start
    Spawned {
        tile: Tile,
    },

    /// Status transition
    StatusChanged {
        old_status: GameStatus,
        new_status: GameStatus,
    },
}

/// A game event stamped with the move that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Accepted-move counter at the time of the event (0 for session start)
    pub move_number: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(move_number: u32, data: GameEventData) -> Self {
        Self { move_number, data }
    }

    /// Create slid event.
    pub fn slid(move_number: u32, tile_id: TileId, from: Position, to: Position) -> Self {
        Self::new(move_number, GameEventData::Slid { tile_id, from, to })
    }

    /// Create merged event.
    pub fn merged(move_number: u32, merge: MergeEvent, from: Position, at: Position) -> Self {
        Self::new(move_number, GameEventData::Merged { merge, from, at })
    }

    /// Create spawned event.
    pub fn spawned(move_number: u32, tile: Tile) -> Self {
        Self::new(move_number, GameEventData::Spawned { tile })
    }

    /// Create status changed event.
    pub fn status_changed(move_number: u32, old_status: GameStatus, new_status: GameStatus) -> Self {
        Self::new(
            move_number,
            GameEventData::StatusChanged { old_status, new_status },
        )
    }

    /// Merge descriptor, if this is a merge.
    pub fn as_merge(&self) -> Option<&MergeEvent> {
        match &self.data {
            GameEventData::Merged { merge, .. } => Some(merge),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_merge() {
        let merge = MergeEvent {
            from_tile_id: TileId(2),
            into_tile_id: TileId(1),
            result_value: 8,
        };
        let event = GameEvent::merged(3, merge, Position::new(0, 1), Position::new(0, 0));
        assert_eq!(event.as_merge(), Some(&merge));

        let slide = GameEvent::slid(3, TileId(5), Position::new(1, 3), Position::new(1, 0));
        assert!(slide.as_merge().is_none());
    }

    #[test]
    fn test_event_json_shape() {
        let event = GameEvent::status_changed(9, GameStatus::Playing, GameStatus::Won);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("StatusChanged"));
        assert!(json.contains("\"move_number\":9"));

        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
