//! Move Resolution
//!
//! Applies one direction to a board: every tile slides toward the target
//! edge and equal neighbours merge at most once. No randomness here; spawning
//! and status are the engine's job.
//!
//! Tiles are visited starting from the edge they move toward, so a tile
//! always meets its final neighbour before anything behind it moves. That
//! rules out leapfrogging and three-into-one merges.

use std::collections::BTreeSet;

use tracing::trace;

use crate::BOARD_SIZE;
use crate::game::direction::Direction;
use crate::game::events::{GameEvent, MergeEvent};
use crate::game::state::{Board, Position, TileId};

/// Outcome of resolving one move on a board.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Did any tile move or merge?
    pub changed: bool,
    /// Sum of merge results
    pub score_delta: u32,
    /// Slides and merges in resolution order
    pub events: Vec<GameEvent>,
}

/// Cell visiting order for a direction.
///
/// Lines are independent; within a line the cell nearest the target edge
/// comes first.
pub fn sweep_order(direction: Direction) -> Vec<Position> {
    let n = BOARD_SIZE as u8;
    let forward: Vec<u8> = (0..n).collect();
    let backward: Vec<u8> = (0..n).rev().collect();

    let mut order = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
    match direction {
        Direction::Left | Direction::Right => {
            let cols = if direction == Direction::Left { &forward } else { &backward };
            for row in 0..n {
                for &col in cols {
                    order.push(Position::new(row, col));
                }
            }
        }
        Direction::Up | Direction::Down => {
            let rows = if direction == Direction::Up { &forward } else { &backward };
            for col in 0..n {
                for &row in rows {
                    order.push(Position::new(row, col));
                }
            }
        }
    }
    order
}

/// Where a travelling tile ends up.
enum Destination {
    /// Stays put
    Stay,
    /// Slides into an empty cell
    Slide(Position),
    /// Merges into the tile sitting at a cell
    Merge(Position, TileId),
}

/// Walk from `start` toward `direction` and decide the tile's destination.
fn find_destination(
    board: &Board,
    start: Position,
    value: u32,
    direction: Direction,
    merged: &BTreeSet<TileId>,
) -> Destination {
    let mut current = start;
    while let Some(next) = direction.step(current) {
        match board.tile_at(next) {
            None => current = next,
            Some(other) => {
                if other.value == value && !merged.contains(&other.id) {
                    return Destination::Merge(next, other.id);
                }
                break;
            }
        }
    }
    if current == start {
        Destination::Stay
    } else {
        Destination::Slide(current)
    }
}

/// Resolve a move in place.
///
/// `move_number` stamps the produced events. The merged set only lives for
/// this call, so every move starts with no tile marked as merged.
pub fn resolve_move(board: &mut Board, direction: Direction, move_number: u32) -> Resolution {
    let mut resolution = Resolution::default();
    let mut merged: BTreeSet<TileId> = BTreeSet::new();

    for start in sweep_order(direction) {
        let Some(tile) = board.tile_at(start).copied() else {
            continue;
        };

        match find_destination(board, start, tile.value, direction, &merged) {
            Destination::Stay => {}
            Destination::Slide(to) => {
                if board.slide(tile.id, to) {
                    trace!("tile {} slid {:?} -> {:?}", tile.id, start, to);
                    resolution.changed = true;
                    resolution.events.push(GameEvent::slid(move_number, tile.id, start, to));
                }
            }
            Destination::Merge(at, into) => {
                if let Some(result_value) = board.merge(tile.id, into) {
                    trace!("tile {} merged into {} -> {}", tile.id, into, result_value);
                    merged.insert(into);
                    resolution.changed = true;
                    resolution.score_delta += result_value;
                    let merge = MergeEvent {
                        from_tile_id: tile.id,
                        into_tile_id: into,
                        result_value,
                    };
                    resolution.events.push(GameEvent::merged(move_number, merge, start, at));
                }
            }
        }
    }

    debug_assert!(board.is_consistent());
    resolution
}

/// Would this direction change the board? Leaves the board untouched.
pub fn move_changes_board(board: &Board, direction: Direction) -> bool {
    let mut scratch = board.clone();
    resolve_move(&mut scratch, direction, 0).changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::GameEventData;

    fn board(values: [[u32; 4]; 4]) -> Board {
        Board::from_values(values).unwrap()
    }

    #[test]
    fn test_sweep_order_starts_at_target_edge() {
        let left = sweep_order(Direction::Left);
        assert_eq!(left[0], Position::new(0, 0));
        assert_eq!(left[3], Position::new(0, 3));

        let right = sweep_order(Direction::Right);
        assert_eq!(right[0], Position::new(0, 3));

        let up = sweep_order(Direction::Up);
        assert_eq!(up[1], Position::new(1, 0));

        let down = sweep_order(Direction::Down);
        assert_eq!(down[0], Position::new(3, 0));
        assert_eq!(down.len(), 16);
    }

    #[test]
    fn test_row_with_trailing_four() {
        // [2, 2, 4, _] left -> [4, 4, _, _]
        let mut b = board([
            [2, 2, 4, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let res = resolve_move(&mut b, Direction::Left, 1);

        assert!(res.changed);
        assert_eq!(res.score_delta, 4);
        assert_eq!(b.values()[0], [4, 4, 0, 0]);
        assert_eq!(res.events.iter().filter(|e| e.as_merge().is_some()).count(), 1);
    }

    #[test]
    fn test_four_equal_make_two_pairs() {
        let mut b = board([
            [2, 2, 2, 2],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let res = resolve_move(&mut b, Direction::Left, 1);

        assert_eq!(b.values()[0], [4, 4, 0, 0]);
        assert_eq!(res.score_delta, 8);
    }

    #[test]
    fn test_three_equal_merge_near_edge() {
        let mut b = board([
            [0, 2, 2, 2],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        resolve_move(&mut b, Direction::Right, 1);
        assert_eq!(b.values()[0], [0, 0, 2, 4]);
    }

    #[test]
    fn test_no_chain_merge() {
        // 4 4 8 must not become 16
        let mut b = board([
            [4, 4, 8, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let res = resolve_move(&mut b, Direction::Left, 1);
        assert_eq!(b.values()[0], [8, 8, 0, 0]);
        assert_eq!(res.score_delta, 8);

        // Merged flags do not outlive the move
        let res = resolve_move(&mut b, Direction::Left, 2);
        assert_eq!(b.values()[0], [16, 0, 0, 0]);
        assert_eq!(res.score_delta, 16);
    }

    #[test]
    fn test_score_law_across_lines() {
        let mut b = board([
            [4, 4, 0, 0],
            [2, 0, 2, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let res = resolve_move(&mut b, Direction::Left, 1);
        assert_eq!(res.score_delta, 12);
        assert_eq!(b.values()[0], [8, 0, 0, 0]);
        assert_eq!(b.values()[1], [4, 0, 0, 0]);
    }

    #[test]
    fn test_merge_keeps_destination_id() {
        let mut b = board([
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [8, 0, 0, 8],
        ]);
        // ids: (3,0) = 1, (3,3) = 2
        let res = resolve_move(&mut b, Direction::Left, 5);

        let merge = res.events.iter().find_map(|e| e.as_merge()).copied().unwrap();
        assert_eq!(merge.into_tile_id, TileId(1));
        assert_eq!(merge.from_tile_id, TileId(2));
        assert_eq!(merge.result_value, 16);
        assert_eq!(b.tile_at(Position::new(3, 0)).unwrap().id, TileId(1));
        assert!(b.get(TileId(2)).is_none());
        assert!(res.events.iter().all(|e| e.move_number == 5));
    }

    #[test]
    fn test_vertical_moves() {
        let mut b = board([
            [2, 0, 0, 0],
            [2, 0, 0, 0],
            [4, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        resolve_move(&mut b, Direction::Down, 1);
        let v = b.values();
        assert_eq!([v[0][0], v[1][0], v[2][0], v[3][0]], [0, 0, 4, 4]);

        resolve_move(&mut b, Direction::Up, 2);
        let v = b.values();
        assert_eq!([v[0][0], v[1][0], v[2][0], v[3][0]], [8, 0, 0, 0]);
    }

    #[test]
    fn test_slide_events() {
        let mut b = board([
            [0, 0, 0, 2],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let res = resolve_move(&mut b, Direction::Left, 1);
        assert_eq!(res.events.len(), 1);
        assert!(matches!(
            res.events[0].data,
            GameEventData::Slid { tile_id: TileId(1), from, to }
                if from == Position::new(0, 3) && to == Position::new(0, 0)
        ));
        assert_eq!(res.score_delta, 0);
    }

    #[test]
    fn test_blocked_board_is_noop() {
        // Decreasing away from the left edge in every row, nothing equal
        let values = [
            [16, 8, 4, 2],
            [32, 16, 8, 4],
            [64, 32, 16, 8],
            [128, 64, 32, 16],
        ];
        let mut b = board(values);
        let before = b.clone();
        let res = resolve_move(&mut b, Direction::Left, 1);

        assert!(!res.changed);
        assert!(res.events.is_empty());
        assert_eq!(b, before);
        assert!(!move_changes_board(&b, Direction::Right));
    }

    #[test]
    fn test_move_changes_board_does_not_mutate() {
        let b = board([
            [2, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        assert!(move_changes_board(&b, Direction::Right));
        assert!(!move_changes_board(&b, Direction::Left));
        assert!(!move_changes_board(&b, Direction::Up));
        assert_eq!(b.values()[0], [2, 0, 0, 0]);
    }
}
