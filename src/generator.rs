//! Puzzle generation: sprinkle walls, fill a full candidate solution with
//! bulbs, derive wall dependencies from it, strip the bulbs back out, and
//! verify the result through the solver -- using it as an oracle in a tight
//! repair loop.
//!
//! The random engine is an injected capability: a generic `rand::RngCore`
//! parameter, never a global thread-local source, so generation stays
//! deterministic for a given caller-supplied seed.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::basic_board::BasicBoard;
use crate::cell::{CellState, Coord};
use crate::error::GeneratorError;
use crate::position_board::{PositionBoard, ResetPolicy};
use crate::solver::{self, SolutionStatus};

/// Tunables for [`generate_with_config`]. [`generate`] uses the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Fraction of cells sprinkled with `Wall0` before dependency counts
    /// are derived, as a `(min, max)` range.
    pub wall_fraction: (f64, f64),
    /// Total solve-and-repair iterations before giving up.
    pub max_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            wall_fraction: (0.02, 0.05),
            max_attempts: 200,
        }
    }
}

/// Generates a `height` x `width` puzzle with the default configuration.
pub fn generate(rng: &mut (impl RngCore + ?Sized), height: i32, width: i32) -> Result<BasicBoard, GeneratorError> {
    generate_with_config(rng, height, width, &GeneratorConfig::default())
}

/// Generates a puzzle, retrying fixture placement and repairing the
/// candidate's wall dependencies until the solver reports `Solved` or the
/// attempt budget is exhausted.
pub fn generate_with_config(
    rng: &mut (impl RngCore + ?Sized),
    height: i32,
    width: i32,
    config: &GeneratorConfig,
) -> Result<BasicBoard, GeneratorError> {
    let mut attempts = 0;

    loop {
        let mut candidate = match build_candidate(rng, height, width, config) {
            Some(board) => board,
            None => {
                attempts += 1;
                if attempts >= config.max_attempts {
                    return Err(GeneratorError::Exhausted {
                        height,
                        width,
                        attempts,
                    });
                }
                continue;
            }
        };

        loop {
            attempts += 1;
            if attempts >= config.max_attempts {
                return Err(GeneratorError::Exhausted {
                    height,
                    width,
                    attempts,
                });
            }

            let solution = solver::solve_bounded(&candidate, solver::MAX_SOLVE_STEPS)
                .map_err(GeneratorError::Board)?;

            log::trace!("generate: attempt {attempts}, status={:?}", solution.status);

            match solution.status {
                SolutionStatus::Solved => {
                    log::debug!("generate: produced a solvable {height}x{width} board in {attempts} attempt(s)");
                    return Ok(candidate);
                }
                _ => {
                    if !repair(&mut candidate, solution.decision_type, solution.ref_location, &solution.position) {
                        break;
                    }
                }
            }
        }
    }
}

/// Builds one fully-illuminated, contradiction-free fixture board (walls
/// and a complete valid bulb placement), then strips the bulbs back out,
/// leaving a puzzle whose walls carry the dependency counts that solution
/// implies. Returns `None` if this particular random fixture couldn't be
/// fully illuminated without conflicts, signalling the caller to re-roll.
fn build_candidate(rng: &mut (impl RngCore + ?Sized), height: i32, width: i32, config: &GeneratorConfig) -> Option<BasicBoard> {
    let mut position = PositionBoard::new(height, width).ok()?;

    let cell_count = (height * width) as usize;
    let (min_frac, max_frac) = config.wall_fraction;
    let wall_count = (cell_count as f64 * rng.gen_range(min_frac..=max_frac)).round() as usize;

    let mut coords: Vec<Coord> = Vec::with_capacity(cell_count);
    for row in 0..height {
        for col in 0..width {
            coords.push(Coord::new(row, col));
        }
    }
    coords.shuffle(rng);

    for &coord in coords.iter().take(wall_count) {
        position.add_wall(coord, CellState::Wall0);
    }

    coords.shuffle(rng);
    for &coord in &coords {
        if position.board().get_cell(coord) != CellState::Empty {
            continue;
        }
        let mut attempt = position.clone();
        attempt.add_bulb(coord);
        if !attempt.has_error() {
            position = attempt;
        }
    }

    if position.num_cells_needing_illumination() > 0 || position.has_error() {
        return None;
    }

    let mut solution_board = position.board().clone();
    let mut deps = Vec::new();
    solution_board.visit_board(|coord, cell| {
        if cell == CellState::Wall0 {
            let mut bulbs = 0;
            solution_board.visit_adjacent(coord, |_, neighbor| {
                bulbs += neighbor.is_bulb() as i32;
            });
            deps.push((coord, CellState::wall_with_deps(bulbs.min(4) as u8)));
        }
    });
    for (coord, state) in deps {
        solution_board.set_cell(coord, state);
    }

    let mut puzzle = solution_board;
    for row in 0..height {
        for col in 0..width {
            let coord = Coord::new(row, col);
            if !puzzle.get_cell(coord).is_wall() {
                puzzle.set_cell(coord, CellState::Empty);
            }
        }
    }

    Some(puzzle)
}

/// Applies a repair heuristic keyed off the failing solve's decision type.
/// Returns whether a repair was made; `false` means this candidate is a
/// dead end and should be discarded in favor of a freshly-rolled fixture.
fn repair(candidate: &mut BasicBoard, decision: crate::position_board::DecisionType, ref_location: Option<Coord>, failed_position: &PositionBoard) -> bool {
    use crate::position_board::DecisionType;

    let coord = match ref_location {
        Some(coord) => coord,
        None => return false,
    };

    match decision {
        DecisionType::WallCannotBeSatisfied => {
            let cell = candidate.get_cell(coord);
            if cell.is_wall_with_deps() {
                candidate.set_cell(coord, cell.remove_wall_dep());
                true
            } else {
                false
            }
        }
        DecisionType::WallHasTooManyBulbs => {
            let cell = candidate.get_cell(coord);
            if cell.num_wall_deps() < 4 {
                candidate.set_cell(coord, cell.add_wall_dep());
                true
            } else {
                false
            }
        }
        DecisionType::MarkCannotBeIlluminated => {
            candidate.set_cell(coord, CellState::Wall0);
            true
        }
        DecisionType::ViolatesSingleUniqueSolution => {
            let mut forced = false;
            failed_position.board().visit_adjacent(coord, |adj_coord, adj_cell| {
                if !forced && adj_cell.is_wall_with_deps() {
                    let bumped = adj_cell.add_wall_dep();
                    if bumped.num_wall_deps() <= 4 {
                        candidate.set_cell(adj_coord, bumped);
                        forced = true;
                    }
                }
            });
            forced
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generates_a_solvable_board() {
        let mut rng = StdRng::seed_from_u64(42);
        let board = generate(&mut rng, 5, 5).unwrap();
        let solution = solver::solve(&board).unwrap();
        assert_eq!(solution.status, SolutionStatus::Solved);
    }

    #[test]
    fn generated_boards_have_requested_dimensions() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = generate(&mut rng, 4, 6).unwrap();
        assert_eq!(board.height(), 4);
        assert_eq!(board.width(), 6);
    }

    #[test]
    fn is_deterministic_given_a_fixed_seed() {
        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);
        let board_a = generate(&mut rng_a, 5, 5).unwrap();
        let board_b = generate(&mut rng_b, 5, 5).unwrap();
        assert_eq!(board_a, board_b);
    }
}
