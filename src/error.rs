//! Fatal error types.
//!
//! These cover the "programmer bug" class of failure: out-of-range
//! coordinates and over-capacity board dimensions. They never arise from
//! valid board data driving the solver, hint engine, or generator against
//! themselves -- only from a caller handing the core invalid dimensions or
//! coordinates up front.

use thiserror::Error;

use crate::cell::Coord;

/// Fatal, non-recoverable board construction/indexing errors.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum BoardError {
    #[error("coordinate {coord:?} is out of range for a {height}x{width} board")]
    OutOfRange {
        coord: Coord,
        height: i32,
        width: i32,
    },

    #[error("requested board {height}x{width} exceeds the {max} cell capacity")]
    CapacityExceeded {
        height: i32,
        width: i32,
        max: usize,
    },
}

/// Errors from parsing the ASCII level format.
///
/// Unlike [`BoardError`], these can legitimately arise from malformed
/// caller-supplied text, so they get their own small enum.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AsciiError {
    #[error("ASCII level has no rows")]
    Empty,

    #[error("row {row} has length {len}, expected {expected} (all rows must be equal length)")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("unrecognized cell character '{ch}' at row {row}, col {col}")]
    UnknownChar { ch: char, row: usize, col: usize },

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Errors from [`crate::generator::generate`].
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum GeneratorError {
    #[error("could not produce a uniquely-solvable {height}x{width} board within {attempts} attempts")]
    Exhausted {
        height: i32,
        width: i32,
        attempts: u32,
    },

    #[error(transparent)]
    Board(#[from] BoardError),
}
