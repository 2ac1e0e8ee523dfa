//! Fixed-capacity 2-D grid of cell states with directional visitors.
//!
//! Storage and traversal only. All ray visitors stop on walls; they never
//! stop on bulbs or illuminated cells (light passes through both, it's only
//! blocked by walls).

use std::ops::ControlFlow;

use strided::Stride;

use crate::cell::{CellState, Coord, Direction};
use crate::error::BoardError;

/// Sufficient for a 25x25 board, the largest size the UI ever constructs.
pub const MAX_CELLS: usize = 625;

/// A fixed-capacity, row-major dense grid of [`CellState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBoard {
    height: i32,
    width: i32,
    cells: Vec<CellState>,
}

impl BasicBoard {
    /// A fresh all-`Empty` board of the given dimensions.
    pub fn new(height: i32, width: i32) -> Result<BasicBoard, BoardError> {
        let mut board = BasicBoard {
            height: 0,
            width: 0,
            cells: Vec::new(),
        };
        board.reset(height, width)?;
        Ok(board)
    }

    /// Reinitializes all cells to `Empty`. Fails when the product exceeds
    /// [`MAX_CELLS`].
    pub fn reset(&mut self, height: i32, width: i32) -> Result<(), BoardError> {
        if height < 0 || width < 0 || (height as usize) * (width as usize) > MAX_CELLS {
            return Err(BoardError::CapacityExceeded {
                height,
                width,
                max: MAX_CELLS,
            });
        }
        self.height = height;
        self.width = width;
        self.cells = vec![CellState::Empty; (height * width) as usize];
        Ok(())
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    fn flat_idx(&self, coord: Coord) -> Result<usize, BoardError> {
        if coord.in_range(self.height, self.width) {
            Ok((coord.row * self.width + coord.col) as usize)
        } else {
            Err(BoardError::OutOfRange {
                coord,
                height: self.height,
                width: self.width,
            })
        }
    }

    pub fn get_cell(&self, coord: Coord) -> CellState {
        match self.flat_idx(coord) {
            Ok(idx) => self.cells[idx],
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_get_cell(&self, coord: Coord) -> Result<CellState, BoardError> {
        self.flat_idx(coord).map(|idx| self.cells[idx])
    }

    /// Sets a cell, returning whether the coordinate was in range.
    pub fn set_cell(&mut self, coord: Coord, state: CellState) -> bool {
        match self.flat_idx(coord) {
            Ok(idx) => {
                self.cells[idx] = state;
                true
            }
            Err(_) => false,
        }
    }

    /// Visits every cell in row-major order.
    pub fn visit_board(&self, mut visitor: impl FnMut(Coord, CellState)) {
        for row in 0..self.height {
            for col in 0..self.width {
                let coord = Coord::new(row, col);
                visitor(coord, self.get_cell(coord));
            }
        }
    }

    /// The cells immediately left of `coord`, nearest first.
    pub fn visit_row_left_of(&self, coord: Coord, visitor: impl FnMut(Coord, CellState)) {
        self.visit_ray(coord, Direction::Left, visitor);
    }

    /// The cells immediately right of `coord`, nearest first.
    pub fn visit_row_right_of(&self, coord: Coord, visitor: impl FnMut(Coord, CellState)) {
        self.visit_ray(coord, Direction::Right, visitor);
    }

    /// The cells immediately above `coord`, nearest first.
    pub fn visit_col_above(&self, coord: Coord, visitor: impl FnMut(Coord, CellState)) {
        self.visit_ray(coord, Direction::Up, visitor);
    }

    /// The cells immediately below `coord`, nearest first.
    pub fn visit_col_below(&self, coord: Coord, visitor: impl FnMut(Coord, CellState)) {
        self.visit_ray(coord, Direction::Down, visitor);
    }

    /// The column at `col`, read through a [`strided::Stride`] view of the
    /// flat row-major buffer, so a column read doesn't need to copy the
    /// whole board.
    fn column_cells(&self, col: i32) -> Vec<CellState> {
        Stride::new(&self.cells)
            .substrides(self.width as usize)
            .nth(col as usize)
            .expect("col in range")
            .iter()
            .copied()
            .collect()
    }

    /// A single directional ray from (but excluding) `coord`, stopping after
    /// (and including) the first wall encountered.
    fn visit_ray(&self, coord: Coord, direction: Direction, mut visitor: impl FnMut(Coord, CellState)) {
        if direction.vertical() {
            let column = self.column_cells(coord.col);
            let rows: Box<dyn Iterator<Item = i32>> = match direction {
                Direction::Up => Box::new((0..coord.row).rev()),
                Direction::Down => Box::new((coord.row + 1)..self.height),
                _ => unreachable!(),
            };
            for row in rows {
                let cell = column[row as usize];
                visitor(Coord::new(row, coord.col), cell);
                if cell.is_wall() {
                    break;
                }
            }
            return;
        }
        let mut cur = coord.step(direction);
        while cur.in_range(self.height, self.width) {
            let cell = self.get_cell(cur);
            visitor(cur, cell);
            if cell.is_wall() {
                break;
            }
            cur = cur.step(direction);
        }
    }

    /// The in-range 4-neighbors of `coord`.
    pub fn visit_adjacent(&self, coord: Coord, mut visitor: impl FnMut(Coord, CellState)) {
        for dir in Direction::all() {
            let neighbor = coord.step(dir);
            if neighbor.in_range(self.height, self.width) {
                visitor(neighbor, self.get_cell(neighbor));
            }
        }
    }

    /// Ray-casts outward from `coord` in all four cardinal directions (or a
    /// single direction, if given), stopping each ray at the first wall.
    /// The callback may return [`ControlFlow::Break`] to stop early (across
    /// the whole traversal, not just the current ray).
    pub fn visit_rows_cols_outward(
        &self,
        coord: Coord,
        direction: Option<Direction>,
        mut visitor: impl FnMut(Direction, Coord, CellState) -> ControlFlow<()>,
    ) {
        let all = Direction::all();
        let single = [direction.unwrap_or(Direction::None)];
        let dirs: &[Direction] = match direction {
            Some(_) => &single,
            None => &all,
        };
        'outer: for &dir in dirs {
            let mut cur = coord.step(dir);
            while cur.in_range(self.height, self.width) {
                let cell = self.get_cell(cur);
                if visitor(dir, cur, cell).is_break() {
                    break 'outer;
                }
                if cell.is_wall() {
                    break;
                }
                cur = cur.step(dir);
            }
        }
    }

    /// Unconditional convenience wrapper over [`Self::visit_rows_cols_outward`]
    /// for callers that never need to stop early.
    pub fn visit_rows_cols_outward_all(
        &self,
        coord: Coord,
        direction: Option<Direction>,
        mut visitor: impl FnMut(Direction, Coord, CellState),
    ) {
        self.visit_rows_cols_outward(coord, direction, |dir, c, cell| {
            visitor(dir, c, cell);
            ControlFlow::Continue(())
        });
    }

    /// Rays in both directions orthogonal to `axis`, stopping each at the
    /// first wall (e.g. `axis = Up` or `Down` visits the `Left` and `Right`
    /// rays).
    pub fn visit_perpendicular(&self, coord: Coord, axis: Direction, mut visitor: impl FnMut(Coord, CellState)) {
        let perp = if axis.vertical() {
            [Direction::Left, Direction::Right]
        } else {
            [Direction::Up, Direction::Down]
        };
        for dir in perp {
            self.visit_ray(coord, dir, &mut visitor);
        }
    }

    /// The two immediate neighbors perpendicular to `direction` (e.g.
    /// `direction = Right` visits the `Up` and `Down` neighbors of `coord`).
    pub fn visit_adj_flank(&self, coord: Coord, direction: Direction, mut visitor: impl FnMut(Coord, CellState)) {
        let perp = if direction.vertical() {
            [Direction::Left, Direction::Right]
        } else {
            [Direction::Up, Direction::Down]
        };
        for dir in perp {
            let neighbor = coord.step(dir);
            if neighbor.in_range(self.height, self.width) {
                visitor(neighbor, self.get_cell(neighbor));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_rejects_over_capacity() {
        let mut board = BasicBoard::new(1, 1).unwrap();
        assert!(board.reset(30, 30).is_err());
    }

    #[test]
    fn set_and_get_cell() {
        let mut board = BasicBoard::new(3, 3).unwrap();
        let coord = Coord::new(1, 1);
        assert!(board.set_cell(coord, CellState::Bulb));
        assert_eq!(board.get_cell(coord), CellState::Bulb);
    }

    #[test]
    fn set_cell_out_of_range_fails() {
        let mut board = BasicBoard::new(3, 3).unwrap();
        assert!(!board.set_cell(Coord::new(5, 5), CellState::Bulb));
    }

    #[test]
    fn visit_adjacent_skips_out_of_range() {
        let board = BasicBoard::new(3, 3).unwrap();
        let mut count = 0;
        board.visit_adjacent(Coord::new(0, 0), |_, _| count += 1);
        assert_eq!(count, 2);
    }

    #[test]
    fn ray_stops_at_wall() {
        let mut board = BasicBoard::new(1, 5).unwrap();
        board.set_cell(Coord::new(0, 2), CellState::Wall0);
        let mut visited = Vec::new();
        board.visit_row_right_of(Coord::new(0, 0), |c, cell| visited.push((c, cell)));
        assert_eq!(visited.len(), 2);
        assert_eq!(visited[1].1, CellState::Wall0);
    }

    #[test]
    fn outward_rays_visit_all_four_directions() {
        let board = BasicBoard::new(3, 3).unwrap();
        let mut count = 0;
        board.visit_rows_cols_outward_all(Coord::new(1, 1), None, |_, _, _| count += 1);
        assert_eq!(count, 4);
    }

    #[test]
    fn outward_single_direction() {
        let board = BasicBoard::new(3, 3).unwrap();
        let mut count = 0;
        board.visit_rows_cols_outward_all(Coord::new(1, 1), Some(Direction::Up), |_, _, _| count += 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn adj_flank_is_perpendicular() {
        let board = BasicBoard::new(3, 3).unwrap();
        let mut seen = Vec::new();
        board.visit_adj_flank(Coord::new(1, 1), Direction::Right, |c, _| seen.push(c));
        assert_eq!(seen, vec![Coord::new(0, 1), Coord::new(2, 1)]);
    }
}
