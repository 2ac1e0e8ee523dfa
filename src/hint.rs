//! The interactive hint engine: one trivial sweep, a single-cluster next
//! move, and -- when the next move could only be justified through
//! speculation -- the chain of propagation steps that exposes the
//! contradiction.

use log::debug;

use crate::basic_board::BasicBoard;
use crate::cell::{CellState, Coord};
use crate::error::BoardError;
use crate::position_board::{AnnotatedMove, DecisionType, MoveMotive, PositionBoard, ResetPolicy};
use crate::trivial;

/// A cluster of moves (usually just one) considered to happen "together",
/// capped at 4 like the original.
#[derive(Debug, Clone, Default)]
pub struct ExplainStep {
    pub reason: DecisionType,
    pub moves: Vec<AnnotatedMove>,
}

impl ExplainStep {
    const MAX_MOVES: usize = 4;

    fn new(reason: DecisionType) -> Self {
        ExplainStep {
            reason,
            moves: Vec::with_capacity(Self::MAX_MOVES),
        }
    }

    fn add(&mut self, mv: AnnotatedMove) -> bool {
        if self.moves.len() >= Self::MAX_MOVES {
            return false;
        }
        self.moves.push(mv);
        true
    }

    fn from_trivial_sweep(found: &[AnnotatedMove]) -> ExplainStep {
        let mut step = ExplainStep::new(found[0].decision_type);
        let reference = found[0].reference_coord;
        step.add(found[0]);
        for mv in &found[1..] {
            if mv.decision_type == step.reason && mv.reference_coord == reference {
                if !step.add(*mv) {
                    break;
                }
            }
        }
        step
    }
}

/// `reason`/`has_error` mirror the position's own state when the board
/// already contains a contradiction; otherwise `reason` is the decision
/// type behind `next_step`.
#[derive(Debug, Clone)]
pub struct Hint {
    pub reason: DecisionType,
    pub has_error: bool,
    pub next_step: ExplainStep,
    pub explain_steps: Vec<ExplainStep>,
}

/// Produces the next hint for `board`.
pub fn hint(board: &BasicBoard) -> Result<Hint, BoardError> {
    let position = PositionBoard::from_board(board, ResetPolicy::KeepErrors)?;

    if position.has_error() {
        debug!("hint: position already in error, reason={:?}", position.decision_type());
        return Ok(Hint {
            reason: position.decision_type(),
            has_error: true,
            next_step: ExplainStep::new(DecisionType::None),
            explain_steps: Vec::new(),
        });
    }

    let (found, unlightable) = trivial::find_trivial_moves(position.board());
    if let Some(coord) = unlightable {
        debug!("hint: mark at {:?} cannot be illuminated", coord);
        let mut step = ExplainStep::new(DecisionType::MarkCannotBeIlluminated);
        step.add(AnnotatedMove::remove(
            coord,
            CellState::Mark,
            DecisionType::MarkCannotBeIlluminated,
            MoveMotive::Forced,
        ));
        return Ok(Hint {
            reason: DecisionType::MarkCannotBeIlluminated,
            has_error: true,
            next_step: step,
            explain_steps: Vec::new(),
        });
    }

    if !found.is_empty() {
        let next_step = ExplainStep::from_trivial_sweep(&found);
        debug!("hint: trivial move, reason={:?}", next_step.reason);
        return Ok(Hint {
            reason: next_step.reason,
            has_error: false,
            next_step,
            explain_steps: Vec::new(),
        });
    }

    match find_forced_via_speculation(&position) {
        Some((mv, explain_steps)) => {
            debug!("hint: speculative move at {:?}, reason={:?}", mv.coord, mv.decision_type);
            let mut next_step = ExplainStep::new(mv.decision_type);
            next_step.add(mv);
            Ok(Hint {
                reason: mv.decision_type,
                has_error: false,
                next_step,
                explain_steps,
            })
        }
        None => {
            debug!("hint: no move available (solved or ambiguous)");
            Ok(Hint {
                reason: DecisionType::None,
                has_error: false,
                next_step: ExplainStep::new(DecisionType::None),
                explain_steps: Vec::new(),
            })
        }
    }
}

/// Propagates trivial moves to a fixpoint, recording one [`ExplainStep`]
/// per round (only the cluster sharing the first move's reason and
/// reference coord is applied per round, matching `Hint.cpp`'s walk).
/// Returns the contradiction's decision type, if the position errors out.
fn propagate_and_collect(position: &mut PositionBoard) -> (Option<DecisionType>, Vec<ExplainStep>) {
    let mut steps = Vec::new();
    loop {
        if position.has_error() {
            return (Some(position.decision_type()), steps);
        }
        let (found, unlightable) = trivial::find_trivial_moves(position.board());
        if unlightable.is_some() {
            return (Some(DecisionType::MarkCannotBeIlluminated), steps);
        }
        if found.is_empty() {
            return (None, steps);
        }

        let step = ExplainStep::from_trivial_sweep(&found);
        for mv in &step.moves {
            position.apply_move(mv);
        }
        steps.push(step);
    }
}

/// One-ply speculation, same shape as `solver::speculate`, but stopping at
/// the first cell whose hypothesis contradicts and carrying the
/// propagation trail along for the explanation.
fn find_forced_via_speculation(position: &PositionBoard) -> Option<(AnnotatedMove, Vec<ExplainStep>)> {
    let mut empties = Vec::new();
    position.board().visit_board(|coord, cell| {
        if cell.is_empty() {
            empties.push(coord);
        }
    });

    for coord in empties {
        let mut bulb_hypothesis = position.clone();
        bulb_hypothesis.add_bulb(coord);
        let (contradiction, steps) = propagate_and_collect(&mut bulb_hypothesis);
        if let Some(decision) = contradiction {
            let mv = AnnotatedMove::add_mark(coord, CellState::Empty, decision, MoveMotive::Speculation).with_reference(coord);
            return Some((mv, steps));
        }

        let mut mark_hypothesis = position.clone();
        mark_hypothesis.add_mark(coord);
        let (contradiction, steps) = propagate_and_collect(&mut mark_hypothesis);
        if let Some(decision) = contradiction {
            let mv = AnnotatedMove::add_bulb(coord, CellState::Empty, decision, MoveMotive::Speculation).with_reference(coord);
            return Some((mv, steps));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(lines: &[&str]) -> BasicBoard {
        crate::ascii::parse(lines).unwrap()
    }

    #[test]
    fn hint_on_already_errored_board_reports_error() {
        let board = build(&["*.*"]);
        let h = hint(&board).unwrap();
        assert!(h.has_error);
        assert_eq!(h.reason, DecisionType::BulbsSeeEachOther);
    }

    #[test]
    fn hint_picks_up_trivial_move() {
        let board = build(&["1.."]);
        let h = hint(&board).unwrap();
        assert!(!h.has_error);
        assert_eq!(h.reason, DecisionType::WallDepsEqualOpenFaces);
        assert_eq!(h.next_step.moves[0].coord, Coord::new(0, 1));
        assert!(h.explain_steps.is_empty());
    }

    #[test]
    fn hint_on_fully_marked_board_reports_unlightable() {
        let board = build(&["XX", "XX"]);
        let h = hint(&board).unwrap();
        assert!(h.has_error);
        assert_eq!(h.reason, DecisionType::MarkCannotBeIlluminated);
    }

    #[test]
    fn hint_on_stuck_board_finds_speculative_move_with_explanation() {
        let board = build(&[".2..", "....", "0.2.", "..0."]);
        let h = hint(&board).unwrap();
        assert!(!h.has_error);
        if h.reason != DecisionType::None {
            // A speculative hint always carries at least one explanatory step.
            assert!(!h.explain_steps.is_empty());
        }
    }
}
