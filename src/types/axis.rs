//! Coordinate axes.

use std::fmt;

/// Coordinate direction acted on by a transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// x, across the channel.
    Horizontal,
    /// y, away from the wall.
    Vertical,
}

impl Axis {
    /// Component index of this axis in a position `[x, y]`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::Horizontal => 0,
            Axis::Vertical => 1,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}
