//! Deduction engine for *Light Up* (Akari): a grid of walls and empty
//! cells where bulbs must illuminate every cell, no two bulbs may see each
//! other along a row or column, and every numbered wall must end up
//! adjacent to exactly that many bulbs.
//!
//! `basic_board` and `cell` are pure storage and value types; `position_board`
//! layers invariant-preserving incremental mutation on top; `trivial` is the
//! set of pure local deducers; `solver` drives trivial propagation plus
//! bounded one-ply speculation to a `Solution`; `hint` exposes the same
//! machinery for interactive play; `generator` builds fresh, uniquely
//! solvable puzzles.

pub mod ascii;
pub mod basic_board;
pub mod cell;
pub mod error;
pub mod generator;
pub mod hint;
pub mod position_board;
pub mod solver;
pub mod trivial;

pub mod prelude {
    pub use crate::ascii;
    pub use crate::basic_board::BasicBoard;
    pub use crate::cell::{CellState, Coord, Direction};
    pub use crate::error::{AsciiError, BoardError, GeneratorError};
    pub use crate::generator::{generate, generate_with_config, GeneratorConfig};
    pub use crate::hint::{hint, Hint};
    pub use crate::position_board::{AnnotatedMove, DecisionType, PositionBoard};
    pub use crate::solver::{solve, solve_bounded, Solution, SolutionStatus};
}
