//! The solving loop: trivial propagation to fixpoint, bounded one-ply
//! speculation when that stalls, and the `Solution` record both the hint
//! engine and the generator drive off of.

use std::collections::VecDeque;

use log::{debug, trace};

use crate::basic_board::BasicBoard;
use crate::cell::{CellState, Coord};
use crate::error::BoardError;
use crate::position_board::{AnnotatedMove, DecisionType, MoveMotive, PositionBoard, ResetPolicy};
use crate::trivial;

/// Step bound for a single `solve` call.
pub const MAX_SOLVE_STEPS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    Initial,
    Progressing,
    Solved,
    Impossible,
    Ambiguous,
    Terminated,
    FailedFindingMove,
}

/// The outcome of a `solve` call: final status, bookkeeping counters, the
/// terminal position, and the ordered move history that produced it.
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub step_count: u32,
    pub error_count: u32,
    pub decision_type: DecisionType,
    pub ref_location: Option<Coord>,
    pub position: PositionBoard,
    pub moves: Vec<AnnotatedMove>,
}

impl Solution {
    pub fn is_solved(&self) -> bool {
        self.status == SolutionStatus::Solved
    }
}

/// Solves `board` with the default step bound.
pub fn solve(board: &BasicBoard) -> Result<Solution, BoardError> {
    solve_bounded(board, MAX_SOLVE_STEPS)
}

/// Solves `board`, terminating with `Terminated` after `max_steps`
/// propagation/speculation rounds rather than the library default. Exposed
/// for tests and for the generator, which calls this in a tight loop and
/// wants a much tighter bound than an interactive solve.
pub fn solve_bounded(board: &BasicBoard, max_steps: u32) -> Result<Solution, BoardError> {
    let mut position = PositionBoard::from_board(board, ResetPolicy::KeepErrors)?;

    let mut solution = Solution {
        status: SolutionStatus::Progressing,
        step_count: 0,
        error_count: 0,
        decision_type: DecisionType::None,
        ref_location: None,
        position: position.clone(),
        moves: Vec::new(),
    };

    let mut queue: VecDeque<AnnotatedMove> = VecDeque::new();

    loop {
        if position.has_error() {
            solution.status = SolutionStatus::Impossible;
            solution.decision_type = position.decision_type();
            solution.ref_location = position.ref_location();
            debug!("solve: impossible, reason={:?}", solution.decision_type);
            break;
        }
        if position.is_solved() {
            solution.status = SolutionStatus::Solved;
            debug!("solve: solved in {} steps", solution.step_count);
            break;
        }

        while let Some(mv) = queue.pop_front() {
            trace!("applying {:?}", mv);
            position.apply_move(&mv);
            solution.moves.push(mv);
            if position.has_error() {
                solution.error_count += 1;
                break;
            }
        }
        if position.has_error() {
            continue;
        }

        let (found, unlightable) = trivial::find_trivial_moves(position.board());
        if let Some(coord) = unlightable {
            solution.status = SolutionStatus::Impossible;
            solution.decision_type = DecisionType::MarkCannotBeIlluminated;
            solution.ref_location = Some(coord);
            solution.error_count += 1;
            debug!("solve: mark at {:?} cannot be illuminated", coord);
            break;
        }

        if found.is_empty() {
            let forced = speculate(&position);
            if forced.is_empty() {
                solution.status = if position.num_cells_needing_illumination() > 0 {
                    SolutionStatus::Ambiguous
                } else {
                    SolutionStatus::Terminated
                };
                debug!("solve: stalled, status={:?}", solution.status);
                break;
            }
            debug!("solve: speculation forced {} move(s)", forced.len());
            queue.extend(forced);
        } else {
            trace!("solve: trivial sweep found {} move(s)", found.len());
            queue.extend(found);
        }

        solution.step_count += 1;
        if solution.step_count >= max_steps {
            solution.status = SolutionStatus::Terminated;
            debug!("solve: terminated at step bound {}", max_steps);
            break;
        }
    }

    solution.position = position;
    Ok(solution)
}

/// The result of propagating trivial moves from a hypothetical position to
/// a fixpoint: either it settles with no contradiction, or it errors out
/// (including the trivial-move sweep's own `MarkCannotBeIlluminated`
/// signal, which isn't a `PositionBoard` error but is treated as one here).
struct PropagationOutcome {
    contradiction: Option<DecisionType>,
}

fn propagate_to_fixpoint(position: &mut PositionBoard) -> PropagationOutcome {
    loop {
        if position.has_error() {
            return PropagationOutcome {
                contradiction: Some(position.decision_type()),
            };
        }
        let (moves, unlightable) = trivial::find_trivial_moves(position.board());
        if unlightable.is_some() {
            return PropagationOutcome {
                contradiction: Some(DecisionType::MarkCannotBeIlluminated),
            };
        }
        if moves.is_empty() {
            return PropagationOutcome { contradiction: None };
        }
        for mv in moves {
            position.apply_move(&mv);
            if position.has_error() {
                return PropagationOutcome {
                    contradiction: Some(position.decision_type()),
                };
            }
        }
    }
}

/// One-ply speculation: for every empty cell, try a bulb, propagate to
/// fixpoint, and if that contradicts, the cell must be a mark -- and
/// symmetrically for a mark hypothesis forcing a bulb.
fn speculate(position: &PositionBoard) -> Vec<AnnotatedMove> {
    let mut forced = Vec::new();
    let mut empties = Vec::new();
    position.board().visit_board(|coord, cell| {
        if cell.is_empty() {
            empties.push(coord);
        }
    });

    for coord in empties {
        let mut bulb_hypothesis = position.clone();
        bulb_hypothesis.add_bulb(coord);
        if let PropagationOutcome {
            contradiction: Some(decision),
        } = propagate_to_fixpoint(&mut bulb_hypothesis)
        {
            trace!("speculation: bulb at {:?} contradicts ({:?}), forcing mark", coord, decision);
            forced.push(AnnotatedMove::add_mark(coord, CellState::Empty, decision, MoveMotive::Speculation).with_reference(coord));
            continue;
        }

        let mut mark_hypothesis = position.clone();
        mark_hypothesis.add_mark(coord);
        if let PropagationOutcome {
            contradiction: Some(decision),
        } = propagate_to_fixpoint(&mut mark_hypothesis)
        {
            trace!("speculation: mark at {:?} contradicts ({:?}), forcing bulb", coord, decision);
            forced.push(AnnotatedMove::add_bulb(coord, CellState::Empty, decision, MoveMotive::Speculation).with_reference(coord));
        }
    }

    forced
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(lines: &[&str]) -> BasicBoard {
        crate::ascii::parse(lines).unwrap()
    }

    #[test]
    fn solves_simple_diamond() {
        let board = build(&["0.0", ".4.", "0.0"]);
        let solution = solve(&board).unwrap();
        assert_eq!(solution.status, SolutionStatus::Solved);
        assert_eq!(crate::ascii::format(solution.position.board()), "0*0\n*4*\n0*0");
    }

    #[test]
    fn solves_via_trivial_moves_only() {
        let board = build(&["1...", "..2."]);
        let solution = solve(&board).unwrap();
        assert_eq!(solution.status, SolutionStatus::Solved);
        assert_eq!(crate::ascii::format(solution.position.board()), "1+*+\n*+2*");
    }

    #[test]
    fn requires_speculation() {
        let board = build(&[".2..", "....", "0.2.", "..0."]);
        let solution = solve(&board).unwrap();
        assert_eq!(solution.status, SolutionStatus::Solved);
    }

    #[test]
    fn all_marks_no_empty_is_impossible() {
        let board = build(&["XX", "XX"]);
        let solution = solve(&board).unwrap();
        assert_eq!(solution.status, SolutionStatus::Impossible);
        assert_eq!(solution.decision_type, DecisionType::MarkCannotBeIlluminated);
    }

    #[test]
    fn bare_two_by_two_is_ambiguous() {
        let board = build(&["..", ".."]);
        let solution = solve(&board).unwrap();
        assert_eq!(solution.status, SolutionStatus::Ambiguous);
    }

    #[test]
    fn embedded_contradiction_is_impossible() {
        let board = build(&["*.*"]);
        let solution = solve(&board).unwrap();
        assert_eq!(solution.status, SolutionStatus::Impossible);
        assert_eq!(solution.decision_type, DecisionType::BulbsSeeEachOther);
    }

    #[test]
    fn tight_step_bound_terminates() {
        let board = build(&[".2..", "....", "0.2.", "..0."]);
        let solution = solve_bounded(&board, 0).unwrap();
        assert_eq!(solution.status, SolutionStatus::Terminated);
    }
}
