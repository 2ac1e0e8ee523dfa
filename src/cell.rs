//! Value types: cell state, direction arithmetic, coordinates.
//!
//! Small, cheap-to-copy value types with a char<->enum mapping kept in one
//! place so the ASCII format and any future renderer share a single source
//! of truth.

/// A single cell's state.
///
/// `Wall1`..`Wall4` carry a numeric dependency (the count of bulbs that must
/// be adjacent to the wall); `Wall0` is a wall with a dependency of zero,
/// pathologically always satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Empty,
    Illuminated,
    Bulb,
    Mark,
    Wall0,
    Wall1,
    Wall2,
    Wall3,
    Wall4,
}

impl CellState {
    pub fn is_empty(self) -> bool {
        matches!(self, CellState::Empty)
    }

    pub fn is_wall(self) -> bool {
        matches!(
            self,
            CellState::Wall0
                | CellState::Wall1
                | CellState::Wall2
                | CellState::Wall3
                | CellState::Wall4
        )
    }

    /// Numbered walls with a nonzero dependency (Wall1..Wall4).
    pub fn is_wall_with_deps(self) -> bool {
        matches!(
            self,
            CellState::Wall1 | CellState::Wall2 | CellState::Wall3 | CellState::Wall4
        )
    }

    pub fn is_illuminable(self) -> bool {
        matches!(self, CellState::Empty | CellState::Mark)
    }

    /// Anything a player (or solver) may add to or remove from the board.
    pub fn is_dynamic_entity(self) -> bool {
        matches!(self, CellState::Empty | CellState::Mark | CellState::Illuminated)
    }

    pub fn is_bulb(self) -> bool {
        matches!(self, CellState::Bulb)
    }

    pub fn is_mark(self) -> bool {
        matches!(self, CellState::Mark)
    }

    /// Dependency count for a numbered wall. Undefined (returns 0) for
    /// non-walls and for `Wall0`.
    pub fn num_wall_deps(self) -> u8 {
        match self {
            CellState::Wall0 => 0,
            CellState::Wall1 => 1,
            CellState::Wall2 => 2,
            CellState::Wall3 => 3,
            CellState::Wall4 => 4,
            _ => 0,
        }
    }

    /// The wall variant carrying exactly `n` dependencies. Panics for n > 4;
    /// callers only ever derive `n` from adjacency counts around a 4-neighbor
    /// cell, so this can never legitimately overflow.
    pub fn wall_with_deps(n: u8) -> CellState {
        match n {
            0 => CellState::Wall0,
            1 => CellState::Wall1,
            2 => CellState::Wall2,
            3 => CellState::Wall3,
            4 => CellState::Wall4,
            _ => panic!("wall dependency count {n} out of range 0..=4"),
        }
    }

    /// One more dependency than `self`. Only meaningful on walls.
    pub fn add_wall_dep(self) -> CellState {
        CellState::wall_with_deps(self.num_wall_deps() + 1)
    }

    /// One fewer dependency than `self`. Only meaningful on walls with at
    /// least one dependency.
    pub fn remove_wall_dep(self) -> CellState {
        CellState::wall_with_deps(self.num_wall_deps() - 1)
    }

    pub fn to_char(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Illuminated => '+',
            CellState::Bulb => '*',
            CellState::Mark => 'X',
            CellState::Wall0 => '0',
            CellState::Wall1 => '1',
            CellState::Wall2 => '2',
            CellState::Wall3 => '3',
            CellState::Wall4 => '4',
        }
    }

    pub fn from_char(ch: char) -> Option<CellState> {
        match ch {
            '.' => Some(CellState::Empty),
            '+' => Some(CellState::Illuminated),
            '*' => Some(CellState::Bulb),
            'X' => Some(CellState::Mark),
            '0' => Some(CellState::Wall0),
            '1' => Some(CellState::Wall1),
            '2' => Some(CellState::Wall2),
            '3' => Some(CellState::Wall3),
            '4' => Some(CellState::Wall4),
            _ => None,
        }
    }
}

/// The four cardinal directions, plus `None` for "no direction" contexts
/// (e.g. an unset reference direction on a move).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn flip(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    pub fn rotate90_left(self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
            Direction::None => Direction::None,
        }
    }

    pub fn vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub fn horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Unit row/col delta for this direction. `(0, 0)` for `None`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::None => (0, 0),
        }
    }
}

/// A `(row, col)` grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub fn new(row: i32, col: i32) -> Coord {
        Coord { row, col }
    }

    pub fn in_range(self, height: i32, width: i32) -> bool {
        self.row >= 0 && self.row < height && self.col >= 0 && self.col < width
    }

    /// The coordinate one step away in `direction`. May be out of range;
    /// callers check with `in_range`.
    pub fn step(self, direction: Direction) -> Coord {
        let (dr, dc) = direction.delta();
        Coord::new(self.row + dr, self.col + dc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_dep_roundtrip() {
        for n in 0..=4u8 {
            let wall = CellState::wall_with_deps(n);
            assert_eq!(wall.num_wall_deps(), n);
        }
    }

    #[test]
    fn add_remove_wall_dep() {
        assert_eq!(CellState::Wall2.add_wall_dep(), CellState::Wall3);
        assert_eq!(CellState::Wall2.remove_wall_dep(), CellState::Wall1);
    }

    #[test]
    fn char_roundtrip() {
        for ch in ['.', '+', '*', 'X', '0', '1', '2', '3', '4'] {
            let state = CellState::from_char(ch).unwrap();
            assert_eq!(state.to_char(), ch);
        }
        assert_eq!(CellState::from_char('?'), None);
    }

    #[test]
    fn direction_flip_and_rotate() {
        assert_eq!(Direction::Up.flip(), Direction::Down);
        assert_eq!(Direction::Left.flip(), Direction::Right);
        assert_eq!(Direction::Up.rotate90_left(), Direction::Left);
        assert_eq!(Direction::None.flip(), Direction::None);
    }

    #[test]
    fn coord_in_range() {
        assert!(Coord::new(0, 0).in_range(3, 3));
        assert!(!Coord::new(3, 0).in_range(3, 3));
        assert!(!Coord::new(0, -1).in_range(3, 3));
    }

    #[test]
    fn coord_step() {
        assert_eq!(Coord::new(2, 2).step(Direction::Up), Coord::new(1, 2));
        assert_eq!(Coord::new(2, 2).step(Direction::Right), Coord::new(2, 3));
    }
}
