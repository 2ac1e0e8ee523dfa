//! Pure trivial-move finders: local deductions that need no search.
//!
//! Each finder is a free function over a [`BasicBoard`] that appends forced
//! or followup moves to a shared output vector.

use std::ops::ControlFlow;

use crate::basic_board::BasicBoard;
use crate::cell::{CellState, Coord, Direction};
use crate::position_board::{AnnotatedMove, DecisionType, MoveMotive};

/// Appends `mv` unless a move at the same destination coordinate is already
/// present, matching `trivial_moves.cpp`'s `insert_if_unique`.
fn insert_if_unique(moves: &mut Vec<AnnotatedMove>, mv: AnnotatedMove) {
    if !moves.iter().any(|existing| existing.coord == mv.coord) {
        moves.push(mv);
    }
}

fn add_bulb(moves: &mut Vec<AnnotatedMove>, where_: Coord, why: DecisionType, motive: MoveMotive, ref_loc: Option<Coord>) {
    let mut mv = AnnotatedMove::add_bulb(where_, CellState::Empty, why, motive);
    if let Some(r) = ref_loc {
        mv = mv.with_reference(r);
    }
    insert_if_unique(moves, mv);
}

fn add_mark(moves: &mut Vec<AnnotatedMove>, where_: Coord, why: DecisionType, motive: MoveMotive, ref_loc: Option<Coord>) {
    let mut mv = AnnotatedMove::add_mark(where_, CellState::Empty, why, motive);
    if let Some(r) = ref_loc {
        mv = mv.with_reference(r);
    }
    insert_if_unique(moves, mv);
}

/// A numbered wall whose adjacent bulb count already equals its dependency,
/// and that still has empty neighbors: every such neighbor must be a Mark.
pub fn find_satisfied_walls_having_open_faces(board: &BasicBoard, moves: &mut Vec<AnnotatedMove>) {
    board.visit_board(|coord, cell| {
        let deps = cell.num_wall_deps();
        if deps == 0 {
            return;
        }
        let mut bulb_count = 0;
        let mut empty_count = 0;
        board.visit_adjacent(coord, |_, neighbor| {
            bulb_count += neighbor.is_bulb() as i32;
            empty_count += neighbor.is_empty() as i32;
        });
        if bulb_count == deps as i32 && empty_count > 0 {
            let mut targets = Vec::new();
            board.visit_adjacent(coord, |adj_coord, adj_cell| {
                if adj_cell.is_empty() {
                    targets.push(adj_coord);
                }
            });
            for adj_coord in targets {
                add_mark(
                    moves,
                    adj_coord,
                    DecisionType::WallSatisfiedHavingOpenFaces,
                    MoveMotive::Forced,
                    Some(coord),
                );
            }
        }
    });
}

/// A numbered wall where open faces exactly equal the remaining deps: every
/// empty neighbor must be a Bulb.
pub fn find_walls_with_deps_equal_open_faces(board: &BasicBoard, moves: &mut Vec<AnnotatedMove>) {
    board.visit_board(|coord, cell| {
        let deps = cell.num_wall_deps();
        if deps == 0 {
            return;
        }
        let mut empty_count = 0;
        let mut bulb_count = 0;
        board.visit_adjacent(coord, |_, neighbor| {
            empty_count += neighbor.is_empty() as i32;
            bulb_count += neighbor.is_bulb() as i32;
        });
        if empty_count > 0 && empty_count == deps as i32 - bulb_count {
            let mut targets = Vec::new();
            board.visit_adjacent(coord, |adj_coord, adj_cell| {
                if adj_cell.is_empty() {
                    targets.push(adj_coord);
                }
            });
            for adj_coord in targets {
                add_bulb(
                    moves,
                    adj_coord,
                    DecisionType::WallDepsEqualOpenFaces,
                    MoveMotive::Forced,
                    Some(coord),
                );
            }
        }
    });
}

/// Whether an empty cell is "constrained": either adjacent to a numbered
/// wall, or has a perpendicular illuminable cell visible along its axis.
/// Unconstrained cells in a colinear run are interchangeable bulb spots,
/// which is the signature of an ambiguous (multi-solution) board.
fn is_constrained(board: &BasicBoard, coord: Coord, axis: Direction) -> bool {
    let mut constrained = false;
    board.visit_adjacent(coord, |_, cell| {
        constrained |= cell.is_wall_with_deps();
    });
    if !constrained {
        board.visit_perpendicular(coord, axis, |_, cell| {
            constrained |= cell.is_illuminable();
        });
    }
    constrained
}

/// One run (bounded by walls/edges) of a single row or column: walks the
/// run, marking all-but-the-last unconstrained empty cell as it goes, and
/// if the run holds more than one such cell, marks the last one too and
/// reports ambiguity. Returns the unconstrained-cell count seen.
fn scan_run(
    board: &BasicBoard,
    axis: Direction,
    moves: &mut Vec<AnnotatedMove>,
    visit: impl FnOnce(&mut dyn FnMut(Coord, CellState)),
) -> usize {
    let mut count = 0;
    let mut prev: Option<Coord> = None;
    let mut visitor = |coord: Coord, cell: CellState| {
        if cell.is_empty() && !is_constrained(board, coord, axis) {
            if let Some(p) = prev {
                add_mark(moves, p, DecisionType::ViolatesSingleUniqueSolution, MoveMotive::Followup, None);
            }
            count += 1;
            prev = Some(coord);
        }
    };
    visit(&mut visitor);
    if count > 1 {
        if let Some(p) = prev {
            add_mark(moves, p, DecisionType::ViolatesSingleUniqueSolution, MoveMotive::Followup, None);
        }
    }
    count
}

/// Row-by-row ambiguity sweep. Stops at the first ambiguous run found; the
/// solver re-scans on its next propagation step anyway once the returned
/// marks are applied.
pub fn find_ambiguous_linear_aligned_row_cells(board: &BasicBoard, moves: &mut Vec<AnnotatedMove>) {
    for row in 0..board.height() {
        let mut col = -1;
        loop {
            let start = Coord::new(row, col);
            let mut last_col = col;
            let count = scan_run(board, Direction::Right, moves, |visitor| {
                board.visit_row_right_of(start, |coord, cell| {
                    last_col = coord.col;
                    visitor(coord, cell);
                });
            });
            if count > 1 {
                return;
            }
            col = last_col;
            if col + 1 >= board.width() {
                break;
            }
        }
    }
}

/// Column-by-column ambiguity sweep, same rule as the row sweep above.
pub fn find_ambiguous_linear_aligned_col_cells(board: &BasicBoard, moves: &mut Vec<AnnotatedMove>) {
    for col in 0..board.width() {
        let mut row = -1;
        loop {
            let start = Coord::new(row, col);
            let mut last_row = row;
            let count = scan_run(board, Direction::Down, moves, |visitor| {
                board.visit_col_below(start, |coord, cell| {
                    last_row = coord.row;
                    visitor(coord, cell);
                });
            });
            if count > 1 {
                return;
            }
            row = last_row;
            if row + 1 >= board.height() {
                break;
            }
        }
    }
}

/// Isolated empties and isolated marks. Returns the coordinate of a mark
/// that cannot be illuminated, if found.
pub fn find_isolated_cells(board: &BasicBoard, moves: &mut Vec<AnnotatedMove>) -> Option<Coord> {
    let mut unlightable_mark = None;

    board.visit_board(|coord, cell| {
        if !cell.is_illuminable() {
            return;
        }
        let mut visible_empty_neighbors = 0;
        let mut empty_neighbor_location = None;
        board.visit_rows_cols_outward(coord, None, |_, ray_coord, ray_cell| {
            if ray_cell.is_empty() {
                visible_empty_neighbors += 1;
                empty_neighbor_location = Some(ray_coord);
            }
            ControlFlow::Continue(())
        });

        if cell.is_empty() && visible_empty_neighbors == 0 {
            add_bulb(moves, coord, DecisionType::IsolatedEmptySquare, MoveMotive::Forced, None);
        } else if cell.is_mark() {
            if visible_empty_neighbors == 1 {
                add_bulb(
                    moves,
                    empty_neighbor_location.expect("counted exactly one empty neighbor"),
                    DecisionType::IsolatedMark,
                    MoveMotive::Forced,
                    Some(coord),
                );
            } else if visible_empty_neighbors == 0 {
                unlightable_mark = Some(coord);
            }
        }
    });

    unlightable_mark
}

/// Runs the full sweep of finders in order, and returns the
/// unilluminable-mark coordinate if one was found.
pub fn find_trivial_moves(board: &BasicBoard) -> (Vec<AnnotatedMove>, Option<Coord>) {
    let mut moves = Vec::new();
    find_satisfied_walls_having_open_faces(board, &mut moves);
    find_walls_with_deps_equal_open_faces(board, &mut moves);
    find_ambiguous_linear_aligned_row_cells(board, &mut moves);
    find_ambiguous_linear_aligned_col_cells(board, &mut moves);
    let unlightable = find_isolated_cells(board, &mut moves);
    (moves, unlightable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(lines: &[&str]) -> BasicBoard {
        crate::ascii::parse(lines).unwrap()
    }

    #[test]
    fn satisfied_wall_marks_open_faces() {
        let board = build(&["1..", "...", "..."]);
        let mut pos = crate::position_board::PositionBoard::from_board(&board, crate::position_board::ResetPolicy::KeepErrors).unwrap();
        pos.add_bulb(Coord::new(0, 1));
        let mut moves = Vec::new();
        find_satisfied_walls_having_open_faces(pos.board(), &mut moves);
        assert!(moves.iter().any(|m| m.coord == Coord::new(1, 0) && m.decision_type == DecisionType::WallSatisfiedHavingOpenFaces));
    }

    #[test]
    fn wall_deps_equal_open_faces_forces_bulbs() {
        let board = build(&["1.."]);
        let mut moves = Vec::new();
        find_walls_with_deps_equal_open_faces(&board, &mut moves);
        assert!(moves.iter().any(|m| m.coord == Coord::new(0, 1) && m.to_state == CellState::Bulb));
    }

    #[test]
    fn isolated_empty_square_forces_bulb() {
        let board = build(&["0.0"]);
        let mut moves = Vec::new();
        let unlightable = find_isolated_cells(&board, &mut moves);
        assert!(unlightable.is_none());
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].coord, Coord::new(0, 1));
        assert_eq!(moves[0].decision_type, DecisionType::IsolatedEmptySquare);
    }

    #[test]
    fn isolated_mark_forces_bulb_on_sole_neighbor() {
        let board = build(&["X.0"]);
        let mut moves = Vec::new();
        let unlightable = find_isolated_cells(&board, &mut moves);
        assert!(unlightable.is_none());
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].coord, Coord::new(0, 1));
        assert_eq!(moves[0].decision_type, DecisionType::IsolatedMark);
    }

    #[test]
    fn unlightable_mark_detected() {
        let board = build(&["X0"]);
        let mut moves = Vec::new();
        let unlightable = find_isolated_cells(&board, &mut moves);
        assert_eq!(unlightable, Some(Coord::new(0, 0)));
    }

    #[test]
    fn wall_bounded_corridor_with_no_cross_light_is_ambiguous() {
        // A single-row corridor has no perpendicular cells at all, so neither
        // empty is constrained by a cross-beam -- either one alone would
        // light the whole run, which is exactly the multi-solution case.
        let board = build(&["0..0"]);
        let mut moves = Vec::new();
        find_ambiguous_linear_aligned_row_cells(&board, &mut moves);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| m.decision_type == DecisionType::ViolatesSingleUniqueSolution));
    }
}
