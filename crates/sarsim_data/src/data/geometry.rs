use serde::{Deserialize, Serialize};

/// A cell coordinate on the response grid. `y` grows downward, so
/// [`Direction::North`] decreases `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    #[must_use]
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Offset by a signed delta. Returns `None` if the result would leave
    /// the `width × height` extent in either axis.
    #[must_use]
    pub fn offset(&self, dx: i32, dy: i32, width: u16, height: u16) -> Option<Self> {
        let nx = i32::from(self.x) + dx;
        let ny = i32::from(self.y) + dy;
        if nx >= 0 && nx < i32::from(width) && ny >= 0 && ny < i32::from(height) {
            Some(Self::new(nx as u16, ny as u16))
        } else {
            None
        }
    }

    /// Chebyshev (chessboard) distance to another cell.
    #[must_use]
    pub fn chebyshev(&self, other: &Position) -> u16 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }
}

/// Cardinal movement direction for drone steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    #[must_use]
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

/// The eight compass bearings used for perception and long-range sensing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compass {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl Compass {
    pub const ALL: [Compass; 8] = [
        Compass::N,
        Compass::S,
        Compass::E,
        Compass::W,
        Compass::Ne,
        Compass::Nw,
        Compass::Se,
        Compass::Sw,
    ];

    #[must_use]
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Compass::N => (0, -1),
            Compass::S => (0, 1),
            Compass::E => (1, 0),
            Compass::W => (-1, 0),
            Compass::Ne => (1, -1),
            Compass::Nw => (-1, -1),
            Compass::Se => (1, 1),
            Compass::Sw => (-1, 1),
        }
    }
}

impl From<Direction> for Compass {
    fn from(d: Direction) -> Self {
        match d {
            Direction::North => Compass::N,
            Direction::South => Compass::S,
            Direction::East => Compass::E,
            Direction::West => Compass::W,
        }
    }
}
