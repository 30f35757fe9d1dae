//! Seat coordinate model.
//!
//! A coordinate is the unique key of a seat inside one room:
//! `(row, column, bench_position)`, all 1-based.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A seat position within a room grid.
///
/// Ordering is row-major: `row` first, then `column`, then
/// `bench_position`. This is the scan order of the automatic placer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coordinate {
    /// Row index (1-based, front of the room = 1).
    pub row: u32,
    /// Column index (1-based).
    pub column: u32,
    /// Seat index on the bench (1-based).
    pub bench_position: u32,
}

impl Coordinate {
    /// Creates a coordinate.
    #[inline]
    pub const fn new(row: u32, column: u32, bench_position: u32) -> Self {
        Self {
            row,
            column,
            bench_position,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.row, self.column, self.bench_position)
    }
}

impl From<(u32, u32, u32)> for Coordinate {
    fn from((row, column, bench_position): (u32, u32, u32)) -> Self {
        Self::new(row, column, bench_position)
    }
}
