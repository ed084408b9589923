//! Geometry primitives: [`Position2D`].
//!
//! Positions address tiles on a square grid. X grows right, Y grows down
//! (screen coordinates), and the ordering is row-major so positions can be
//! used directly as keys in ordered maps and sets.

use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Position2D
// ---------------------------------------------------------------------------

/// A 2D integer grid position. X grows right, Y grows down.
///
/// Positions are totally ordered row-major: `y` is compared first, then `x`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position2D {
    pub x: i32,
    pub y: i32,
}

impl Position2D {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new position.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a position shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four orthogonal neighbours (left, right, up, down).
    #[inline]
    pub const fn neighbours_4(self) -> [Position2D; 4] {
        [
            Self::new(self.x - 1, self.y),
            Self::new(self.x + 1, self.y),
            Self::new(self.x, self.y - 1),
            Self::new(self.x, self.y + 1),
        ]
    }

    /// The four diagonal neighbours.
    #[inline]
    pub const fn diagonals(self) -> [Position2D; 4] {
        [
            Self::new(self.x - 1, self.y - 1),
            Self::new(self.x + 1, self.y + 1),
            Self::new(self.x + 1, self.y - 1),
            Self::new(self.x - 1, self.y + 1),
        ]
    }

    /// All eight neighbours, orthogonal first.
    #[inline]
    pub const fn neighbours_8(self) -> [Position2D; 8] {
        let o = self.neighbours_4();
        let d = self.diagonals();
        [o[0], o[1], o[2], o[3], d[0], d[1], d[2], d[3]]
    }
}

// --- trait impls for Position2D ---

impl PartialOrd for Position2D {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position2D {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for Position2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position2D {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Position2D {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position2D {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn position_round_trip() {
        let p = Position2D::new(3, -7);
        let json = serde_json::to_string(&p).unwrap();
        let back: Position2D = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
