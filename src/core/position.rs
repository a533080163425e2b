//! Grid geometry: dimensions, cursor position and movement direction.
//!
//! These are separated out so that the error types can carry a position
//! without depending on the grid itself.

use std::fmt;

/// Width of the logical program grid (columns).
pub const GRID_W: usize = 80;

/// Height of the logical program grid (rows).
pub const GRID_H: usize = 25;

/// A cell coordinate. Either component may sit one step outside the logical
/// grid while the cursor is parked on a border (wrap) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move one cell in `dir`. No wrapping happens here; the border cells
    /// of the grid take care of that.
    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Position { x: self.x + dx, y: self.y + dy }
    }

    /// Snap x back into `0..width`, keeping y.
    #[inline]
    pub fn wrap_x(self, width: usize) -> Self {
        let w = width as i32;
        Position { x: (self.x + w) % w, y: self.y }
    }

    /// Snap y back into `0..height`, keeping x.
    #[inline]
    pub fn wrap_y(self, height: usize) -> Self {
        let h = height as i32;
        Position { x: self.x, y: (self.y + h) % h }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Direction of cursor travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    /// All four directions, in the order used by the random-direction opcode.
    pub const ALL: [Direction; 4] = [Direction::Right, Direction::Left, Direction::Down, Direction::Up];

    /// (dx, dy) for one step. y grows downwards.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}
