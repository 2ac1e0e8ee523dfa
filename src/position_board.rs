//! `BasicBoard` plus cached counters, error state, and the mutation
//! operations that keep them in sync.
//!
//! A position tracks how many cells still need light and how many numbered
//! walls still need bulbs, updating both incrementally as bulbs, marks, and
//! walls are placed, so the solver never has to rescan the whole board to
//! check whether it's done.

use std::ops::ControlFlow;

use crate::basic_board::BasicBoard;
use crate::cell::{CellState, Coord, Direction};
use crate::error::BoardError;

/// Why the position currently holds the error/decision state it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionType {
    None,
    Speculation,
    WallSatisfiedHavingOpenFaces,
    WallDepsEqualOpenFaces,
    IsolatedMark,
    IsolatedEmptySquare,
    BulbsSeeEachOther,
    WallHasTooManyBulbs,
    WallCannotBeSatisfied,
    MarkCannotBeIlluminated,
    ViolatesSingleUniqueSolution,
}

/// Whether an [`AnnotatedMove`] adds or removes a dynamic entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAction {
    Add,
    Remove,
}

/// Why a move was queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMotive {
    Forced,
    Followup,
    Speculation,
}

/// A move plus the reasoning that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotatedMove {
    pub action: MoveAction,
    pub from_state: CellState,
    pub to_state: CellState,
    pub coord: Coord,
    pub decision_type: DecisionType,
    pub motive: MoveMotive,
    pub reference_coord: Option<Coord>,
}

impl AnnotatedMove {
    pub fn add_bulb(coord: Coord, from_state: CellState, decision_type: DecisionType, motive: MoveMotive) -> Self {
        AnnotatedMove {
            action: MoveAction::Add,
            from_state,
            to_state: CellState::Bulb,
            coord,
            decision_type,
            motive,
            reference_coord: None,
        }
    }

    pub fn add_mark(coord: Coord, from_state: CellState, decision_type: DecisionType, motive: MoveMotive) -> Self {
        AnnotatedMove {
            action: MoveAction::Add,
            from_state,
            to_state: CellState::Mark,
            coord,
            decision_type,
            motive,
            reference_coord: None,
        }
    }

    pub fn remove(coord: Coord, from_state: CellState, decision_type: DecisionType, motive: MoveMotive) -> Self {
        AnnotatedMove {
            action: MoveAction::Remove,
            from_state,
            to_state: CellState::Empty,
            coord,
            decision_type,
            motive,
            reference_coord: None,
        }
    }

    pub fn with_reference(mut self, reference: Coord) -> Self {
        self.reference_coord = Some(reference);
        self
    }
}

/// Replay policy when rebuilding a position from a [`BasicBoard`]'s fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetPolicy {
    /// Stop replaying moves as soon as `has_error` becomes true.
    StopOnError,
    /// Replay every move regardless of errors encountered along the way.
    KeepErrors,
}

/// Policy for the general-purpose [`PositionBoard::set_cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetCellPolicy {
    /// Dispatch to the specific add/remove operation when one applies,
    /// otherwise fall through to a full re-evaluation.
    ReevaluateIfNecessary,
    /// Caller promises to re-evaluate in batch later; don't bother now.
    NoReevaluateBoard,
    /// Always re-evaluate, even when a shortcut would apply.
    ForceReevaluateBoard,
}

/// A game position: a [`BasicBoard`] plus cached, invariant-preserving
/// counters. After every operation returns: the illumination and wall
/// counters match the board exactly, no two bulbs see each other
/// unobstructed, and no wall is over- or under-subscribed without
/// `has_error` reflecting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionBoard {
    board: BasicBoard,
    num_cells_needing_illumination: i32,
    num_walls_with_deps: i32,
    has_error: bool,
    decision_type: DecisionType,
    ref_location: Option<Coord>,
}

impl PositionBoard {
    pub fn new(height: i32, width: i32) -> Result<PositionBoard, BoardError> {
        Ok(PositionBoard {
            board: BasicBoard::new(height, width)?,
            num_cells_needing_illumination: (height * width).max(0),
            num_walls_with_deps: 0,
            has_error: false,
            decision_type: DecisionType::None,
            ref_location: None,
        })
    }

    /// Replays `board`'s fixtures onto a fresh position: first walls (so
    /// adjacency counts are right from the start), then bulbs, then marks.
    pub fn from_board(board: &BasicBoard, policy: ResetPolicy) -> Result<PositionBoard, BoardError> {
        let mut pos = PositionBoard::new(board.height(), board.width())?;
        pos.num_cells_needing_illumination = 0;

        // Pass 1: walls, updating wall-dependency counts as we go. Any cell
        // that isn't a wall is Empty/Illuminated/Mark at this point (bulbs
        // are replayed in pass 2), all of which start out needing
        // illumination until a bulb justifies them.
        board.visit_board(|coord, cell| {
            if cell.is_wall() {
                pos.num_walls_with_deps += cell.is_wall_with_deps() as i32;
                pos.board.set_cell(coord, cell);
                pos.update_wall(coord, cell, cell, false);
            } else {
                pos.num_cells_needing_illumination += 1;
            }
        });

        // Pass 2: bulbs, then marks.
        let mut stop = false;
        board.visit_board(|coord, cell| {
            if stop {
                return;
            }
            if pos.has_error && policy == ResetPolicy::StopOnError {
                stop = true;
                return;
            }
            if cell.is_bulb() {
                pos.add_bulb(coord);
            }
        });
        stop = false;
        board.visit_board(|coord, cell| {
            if stop {
                return;
            }
            if pos.has_error && policy == ResetPolicy::StopOnError {
                stop = true;
                return;
            }
            if cell.is_mark() {
                pos.add_mark(coord);
            }
        });

        Ok(pos)
    }

    /// Recomputes derived state from a ephemeral replay of the current
    /// board; a cheap correctness net after a batch of raw `set_cell` calls.
    pub fn reevaluate_board_state(&mut self, policy: ResetPolicy) {
        let paranoid = PositionBoard::from_board(&self.board, policy)
            .expect("board dimensions were already valid when this position was constructed");
        *self = paranoid;
    }

    pub fn board(&self) -> &BasicBoard {
        &self.board
    }

    pub fn height(&self) -> i32 {
        self.board.height()
    }

    pub fn width(&self) -> i32 {
        self.board.width()
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn decision_type(&self) -> DecisionType {
        self.decision_type
    }

    pub fn ref_location(&self) -> Option<Coord> {
        self.ref_location
    }

    pub fn num_cells_needing_illumination(&self) -> i32 {
        self.num_cells_needing_illumination
    }

    pub fn num_walls_with_deps(&self) -> i32 {
        self.num_walls_with_deps
    }

    pub fn is_solved(&self) -> bool {
        !self.has_error && self.num_walls_with_deps == 0 && self.num_cells_needing_illumination == 0
    }

    pub fn is_ambiguous(&self) -> bool {
        self.decision_type == DecisionType::ViolatesSingleUniqueSolution
    }

    fn set_error(&mut self, decision: DecisionType, location: Coord) {
        self.has_error = true;
        self.decision_type = decision;
        self.ref_location = Some(location);
    }

    /// Re-derives a wall's satisfaction relative to its current neighbors,
    /// setting an error if it's over- or under-subscribed. Returns whether
    /// the wall is (now) satisfied.
    fn update_wall(
        &mut self,
        wall_coord: Coord,
        wall_cell: CellState,
        played_cell: CellState,
        coord_is_adjacent_to_play: bool,
    ) -> bool {
        let deps = wall_cell.num_wall_deps();
        if !wall_cell.is_wall_with_deps() && wall_cell != CellState::Wall0 {
            return true;
        }

        let mut bulb_neighbors = 0;
        let mut empty_neighbors = 0;
        self.board.visit_adjacent(wall_coord, |_, neighbor| {
            bulb_neighbors += neighbor.is_bulb() as i32;
            empty_neighbors += neighbor.is_empty() as i32;
        });

        if bulb_neighbors > deps as i32 {
            self.set_error(DecisionType::WallHasTooManyBulbs, wall_coord);
        } else if (deps as i32 - bulb_neighbors) > empty_neighbors {
            self.set_error(DecisionType::WallCannotBeSatisfied, wall_coord);
        } else if bulb_neighbors == deps as i32 && coord_is_adjacent_to_play && played_cell.is_bulb() {
            self.num_walls_with_deps -= 1;
        }
        bulb_neighbors == deps as i32
    }

    /// Clears illumination cast outward from `start_at` in `direction`,
    /// unless a crossbeam from another bulb still justifies it.
    fn remove_illum_in_direction_from(&mut self, start_at: Coord, direction: Direction) {
        let mut to_clear = Vec::new();
        self.board.visit_rows_cols_outward(
            start_at,
            Some(direction),
            |_, coord, cell| {
                if matches!(cell, CellState::Illuminated) {
                    let mut has_crossbeam = false;
                    self.board.visit_perpendicular(coord, direction, |_, cross_cell| {
                        has_crossbeam |= cross_cell.is_bulb();
                    });
                    if !has_crossbeam {
                        to_clear.push(coord);
                    }
                }
                ControlFlow::Continue(())
            },
        );
        for coord in to_clear {
            self.board.set_cell(coord, CellState::Empty);
            self.num_cells_needing_illumination += 1;
        }
    }

    /// Adds a wall. Allowed from `Empty` always; from `Illuminated` only if
    /// the position has no current error: an error can never be "un-set" by
    /// this incremental bookkeeping, so a wall placed on top of an
    /// error-producing illuminated cell could hide an error that's still
    /// real.
    pub fn add_wall(&mut self, coord: Coord, wall_state: CellState) -> bool {
        let orig_cell = self.board.get_cell(coord);
        if !orig_cell.is_empty() && self.has_error {
            return false;
        }

        self.board.set_cell(coord, wall_state);

        if orig_cell.is_illuminable() {
            self.num_cells_needing_illumination -= 1;
        }

        self.num_walls_with_deps += 1;
        let satisfied = self.update_wall(coord, wall_state, wall_state, false);
        if satisfied {
            self.num_walls_with_deps -= 1;
        }

        let mut adjacents = Vec::new();
        self.board.visit_adjacent(coord, |adj_coord, adj_cell| {
            if adj_cell.is_wall() {
                adjacents.push((adj_coord, adj_cell));
            }
        });
        for (adj_coord, adj_cell) in adjacents {
            self.update_wall(adj_coord, adj_cell, adj_cell, false);
        }

        if matches!(orig_cell, CellState::Illuminated) {
            let mut bulb_dirs = Vec::new();
            self.board.visit_rows_cols_outward(coord, None, |dir, _, cell| {
                if cell.is_bulb() {
                    bulb_dirs.push(dir);
                }
                ControlFlow::Continue(())
            });
            for dir in bulb_dirs {
                self.remove_illum_in_direction_from(coord, dir.flip());
            }
        }

        true
    }

    /// Adds a mark. Only legal on `Empty` cells.
    pub fn add_mark(&mut self, coord: Coord) -> bool {
        let target = self.board.get_cell(coord);
        if !target.is_empty() {
            return false;
        }
        self.board.set_cell(coord, CellState::Mark);

        let mut adjacents = Vec::new();
        self.board.visit_adjacent(coord, |adj_coord, adj_cell| {
            adjacents.push((adj_coord, adj_cell));
        });
        for (adj_coord, adj_cell) in adjacents {
            self.update_wall(adj_coord, adj_cell, CellState::Mark, true);
        }
        true
    }

    /// Adds a bulb. Legal on `Empty` or `Illuminated` cells; illegal on
    /// `Mark` (a mark's whole job is to forbid a bulb here).
    pub fn add_bulb(&mut self, coord: Coord) -> bool {
        let target = self.board.get_cell(coord);
        if !(target.is_empty() || matches!(target, CellState::Illuminated)) {
            return false;
        }
        self.board.set_cell(coord, CellState::Bulb);
        if target.is_empty() {
            self.num_cells_needing_illumination -= 1;
        }

        let mut adjacents = Vec::new();
        self.board.visit_adjacent(coord, |adj_coord, adj_cell| {
            adjacents.push((adj_coord, adj_cell));
        });
        for (adj_coord, adj_cell) in adjacents {
            self.update_wall(adj_coord, adj_cell, CellState::Bulb, true);
        }

        let mut to_illuminate = Vec::new();
        let mut error_at = None;
        let mut wall_updates = Vec::new();
        self.board.visit_rows_cols_outward(coord, None, |dir, ray_coord, cell| {
            if cell.is_illuminable() {
                to_illuminate.push((dir, ray_coord));
            } else if cell.is_bulb() {
                error_at = Some(ray_coord);
            } else if cell.is_wall_with_deps() {
                wall_updates.push((ray_coord, cell));
            }
            ControlFlow::Continue(())
        });

        for (dir, ray_coord) in to_illuminate {
            self.board.set_cell(ray_coord, CellState::Illuminated);
            self.num_cells_needing_illumination -= 1;
            let mut flank_updates = Vec::new();
            self.board.visit_adj_flank(ray_coord, dir, |adj_coord, adj_cell| {
                flank_updates.push((adj_coord, adj_cell));
            });
            for (adj_coord, adj_cell) in flank_updates {
                self.update_wall(adj_coord, adj_cell, CellState::Illuminated, false);
            }
        }
        for (wall_coord, wall_cell) in wall_updates {
            self.update_wall(wall_coord, wall_cell, CellState::Illuminated, false);
        }
        if let Some(other_bulb) = error_at {
            self.set_error(DecisionType::BulbsSeeEachOther, other_bulb);
        }

        true
    }

    /// Removes a bulb by setting the cell back to `Empty` and replaying the
    /// whole board from that state -- correctness over minimal work, since
    /// undoing a bulb's illumination and wall-satisfaction side effects in
    /// place would need to know what else was relying on that light.
    pub fn remove_bulb(&mut self, coord: Coord) -> bool {
        self.board.set_cell(coord, CellState::Empty);
        let board_copy = self.board.clone();
        let replayed = PositionBoard::from_board(&board_copy, ResetPolicy::KeepErrors)
            .expect("board dimensions are unchanged from an already-valid position");
        *self = replayed;
        true
    }

    /// General-purpose setter; see [`SetCellPolicy`].
    pub fn set_cell(&mut self, coord: Coord, state: CellState, policy: SetCellPolicy) -> bool {
        if policy == SetCellPolicy::ReevaluateIfNecessary {
            let orig_cell = self.board.get_cell(coord);
            if orig_cell == state {
                return true;
            }
            if orig_cell.is_empty() {
                match state {
                    CellState::Bulb => return self.add_bulb(coord),
                    CellState::Mark => return self.add_mark(coord),
                    _ if state.is_wall() => return self.add_wall(coord, state),
                    _ => {}
                }
            } else if matches!(orig_cell, CellState::Illuminated) && !self.has_error && state.is_wall() {
                return self.add_wall(coord, state);
            } else if state.is_empty() && orig_cell.is_bulb() {
                return self.remove_bulb(coord);
            }
        }

        let result = self.board.set_cell(coord, state);
        if policy != SetCellPolicy::NoReevaluateBoard {
            self.reevaluate_board_state(ResetPolicy::KeepErrors);
        }
        result
    }

    /// Dispatches a single move onto the position.
    pub fn apply_move(&mut self, mv: &AnnotatedMove) -> bool {
        match mv.action {
            MoveAction::Add => match mv.to_state {
                CellState::Bulb => self.add_bulb(mv.coord),
                CellState::Mark => self.add_mark(mv.coord),
                _ => false,
            },
            MoveAction::Remove => {
                if mv.from_state.is_bulb() || mv.from_state.is_mark() {
                    self.set_cell(mv.coord, CellState::Empty, SetCellPolicy::ReevaluateIfNecessary)
                } else {
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(lines: &[&str]) -> BasicBoard {
        crate::ascii::parse(lines).unwrap()
    }

    #[test]
    fn add_bulb_illuminates_row_and_column() {
        let mut pos = PositionBoard::new(3, 3).unwrap();
        assert!(pos.add_bulb(Coord::new(1, 1)));
        assert_eq!(pos.board().get_cell(Coord::new(1, 0)), CellState::Illuminated);
        assert_eq!(pos.board().get_cell(Coord::new(0, 1)), CellState::Illuminated);
        assert!(!pos.has_error());
    }

    #[test]
    fn two_bulbs_on_same_row_conflict() {
        let board = build(&["*.*"]);
        let pos = PositionBoard::from_board(&board, ResetPolicy::KeepErrors).unwrap();
        assert!(pos.has_error());
        assert_eq!(pos.decision_type(), DecisionType::BulbsSeeEachOther);
    }

    #[test]
    fn wall_with_deps_satisfied_by_one_bulb() {
        let mut pos = PositionBoard::new(1, 2).unwrap();
        pos.add_wall(Coord::new(0, 1), CellState::Wall1);
        assert_eq!(pos.num_walls_with_deps(), 1);
        pos.add_bulb(Coord::new(0, 0));
        assert_eq!(pos.num_walls_with_deps(), 0);
        assert!(!pos.has_error());
    }

    #[test]
    fn wall_over_subscribed_errors() {
        let mut pos = PositionBoard::new(1, 3).unwrap();
        pos.add_wall(Coord::new(0, 1), CellState::Wall0);
        pos.add_bulb(Coord::new(0, 0));
        // Wall0 is pathologically satisfied already; adding a second
        // adjacent bulb should push it over.
        let ok = pos.add_bulb(Coord::new(0, 2));
        assert!(ok);
        assert!(pos.has_error());
        assert_eq!(pos.decision_type(), DecisionType::WallHasTooManyBulbs);
    }

    #[test]
    fn remove_bulb_restores_illumination_count() {
        let mut pos = PositionBoard::new(1, 3).unwrap();
        pos.add_bulb(Coord::new(0, 1));
        assert_eq!(pos.num_cells_needing_illumination(), 0);
        pos.remove_bulb(Coord::new(0, 1));
        assert_eq!(pos.num_cells_needing_illumination(), 3);
    }

    #[test]
    fn mark_blocks_bulb_placement() {
        let mut pos = PositionBoard::new(1, 1).unwrap();
        pos.add_mark(Coord::new(0, 0));
        assert!(!pos.add_bulb(Coord::new(0, 0)));
    }

    #[test]
    fn solved_small_board() {
        let board = build(&["0*0", "*4*", "0*0"]);
        let pos = PositionBoard::from_board(&board, ResetPolicy::KeepErrors).unwrap();
        assert!(pos.is_solved());
    }
}
