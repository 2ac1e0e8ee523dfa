//! The ASCII level format: one character per cell, rows separated by
//! newlines, all rows the same length.
//!
//! Char table: `.` Empty, `+` Illuminated, `*` Bulb, `X` Mark, `0`-`4` walls
//! by dependency count.

use crate::basic_board::BasicBoard;
use crate::cell::{CellState, Coord};
use crate::error::AsciiError;

/// Parses a level given as one string slice per row.
pub fn parse(lines: &[&str]) -> Result<BasicBoard, AsciiError> {
    if lines.is_empty() {
        return Err(AsciiError::Empty);
    }
    let width = lines[0].chars().count();
    for (row, line) in lines.iter().enumerate() {
        let len = line.chars().count();
        if len != width {
            return Err(AsciiError::RaggedRow {
                row,
                len,
                expected: width,
            });
        }
    }

    let mut board = BasicBoard::new(lines.len() as i32, width as i32)?;
    for (row, line) in lines.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            let state = CellState::from_char(ch).ok_or(AsciiError::UnknownChar { ch, row, col })?;
            board.set_cell(Coord::new(row as i32, col as i32), state);
        }
    }
    Ok(board)
}

/// Parses a level given as a single newline-separated string.
pub fn parse_str(text: &str) -> Result<BasicBoard, AsciiError> {
    let lines: Vec<&str> = text.lines().collect();
    parse(&lines)
}

/// Renders a board back to its ASCII form, one line per row, no trailing
/// newline.
pub fn format(board: &BasicBoard) -> String {
    let mut out = String::with_capacity((board.height() * (board.width() + 1)) as usize);
    for row in 0..board.height() {
        if row > 0 {
            out.push('\n');
        }
        for col in 0..board.width() {
            out.push(board.get_cell(Coord::new(row, col)).to_char());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let text = ["1..", ".X*", "0.2"];
        let board = parse(&text).unwrap();
        assert_eq!(format(&board), text.join("\n"));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(parse(&[]), Err(AsciiError::Empty));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = parse(&["..", "..."]).unwrap_err();
        assert_eq!(
            err,
            AsciiError::RaggedRow {
                row: 1,
                len: 3,
                expected: 2
            }
        );
    }

    #[test]
    fn rejects_unknown_char() {
        let err = parse(&["..?"]).unwrap_err();
        assert_eq!(
            err,
            AsciiError::UnknownChar {
                ch: '?',
                row: 0,
                col: 2
            }
        );
    }

    #[test]
    fn parse_str_splits_on_newlines() {
        let board = parse_str("1..\n...").unwrap();
        assert_eq!(board.height(), 2);
        assert_eq!(board.width(), 3);
    }
}
