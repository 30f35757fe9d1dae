//! Room (grid) model.
//!
//! A room allocation describes a seating configuration: `rows × columns`
//! benches, each holding `students_per_bench` students. It defines the legal
//! coordinate space and which seats count as "adjacent" for the class
//! separation rule.
//!
//! # Adjacency
//!
//! | Bench size | Adjacent seats |
//! |------------|----------------|
//! | 1 | left, right, front, back |
//! | 2 | other seat of the same bench; both seats of the left and right benches |
//!
//! Two-seat benches are assumed to have aisle gaps front-to-back, so rows
//! never touch in that layout.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Coordinate;
use crate::config::SeatingConfig;
use crate::error::SeatingError;

/// Bench layout of a room, derived from `students_per_bench`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BenchSize {
    /// One student per bench. Benches are densely packed in both directions.
    Single,
    /// Two students per bench. Benches touch side-to-side only.
    Pair,
}

/// Why two seats are considered adjacent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjacencyRule {
    /// Single-seat benches: direct left/right/front/back neighbour.
    SingleSeatAdjacent,
    /// Two-seat benches: the other seat on the same bench.
    SameBench,
    /// Two-seat benches: either seat of the bench to the left or right.
    NeighbouringBench,
}

impl AdjacencyRule {
    /// Human-readable rule description.
    pub fn description(&self) -> &'static str {
        match self {
            AdjacencyRule::SingleSeatAdjacent => {
                "students of the same class may not sit directly beside, in front of or behind each other"
            }
            AdjacencyRule::SameBench => "students of the same class may not share a bench",
            AdjacencyRule::NeighbouringBench => {
                "students of the same class may not sit on neighbouring benches"
            }
        }
    }
}

impl fmt::Display for AdjacencyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdjacencyRule::SingleSeatAdjacent => "single-seat-adjacent",
            AdjacencyRule::SameBench => "same-bench",
            AdjacencyRule::NeighbouringBench => "neighbouring-bench",
        };
        f.write_str(name)
    }
}

/// A seating configuration for one room.
///
/// Dimensions are fixed once created; there is no resize operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAllocation {
    /// Unique room allocation identifier.
    pub id: String,
    /// Number of bench rows (≥ 1).
    pub rows: u32,
    /// Number of bench columns (≥ 1).
    pub columns: u32,
    /// Seats per bench (1 or 2).
    pub students_per_bench: u32,
}

impl RoomAllocation {
    /// Creates a room allocation. Dimensions are not checked until
    /// [`RoomAllocation::validate`] is called.
    pub fn new(id: impl Into<String>, rows: u32, columns: u32, students_per_bench: u32) -> Self {
        Self {
            id: id.into(),
            rows,
            columns,
            students_per_bench,
        }
    }

    /// Total number of seats. Computed in `u64` so oversized rooms are
    /// reported instead of wrapping.
    pub fn capacity(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.columns) * u64::from(self.students_per_bench)
    }

    /// Bench layout used for adjacency.
    pub fn bench_size(&self) -> BenchSize {
        if self.students_per_bench <= 1 {
            BenchSize::Single
        } else {
            BenchSize::Pair
        }
    }

    /// Checks the configuration invariants.
    ///
    /// # Errors
    /// - [`SeatingError::InvalidDimensions`] if any dimension is zero or the
    ///   bench size is outside `1..=config.max_students_per_bench`.
    /// - [`SeatingError::CapacityExceeded`] if the seat count is above
    ///   `config.max_capacity`.
    pub fn validate(&self, config: &SeatingConfig) -> Result<(), SeatingError> {
        if self.rows == 0
            || self.columns == 0
            || self.students_per_bench == 0
            || self.students_per_bench > config.max_students_per_bench
        {
            return Err(SeatingError::InvalidDimensions {
                room_id: self.id.clone(),
                rows: self.rows,
                columns: self.columns,
                students_per_bench: self.students_per_bench,
            });
        }
        let capacity = self.capacity();
        if capacity > u64::from(config.max_capacity) {
            return Err(SeatingError::CapacityExceeded {
                room_id: self.id.clone(),
                capacity,
                limit: config.max_capacity,
            });
        }
        Ok(())
    }

    /// Whether the coordinate lies inside the grid.
    #[inline]
    pub fn is_in_range(&self, coordinate: &Coordinate) -> bool {
        (1..=self.rows).contains(&coordinate.row)
            && (1..=self.columns).contains(&coordinate.column)
            && (1..=self.students_per_bench).contains(&coordinate.bench_position)
    }

    /// In-range seats adjacent to `coordinate`, tagged with the rule that
    /// makes them adjacent.
    ///
    /// Seats outside the grid are omitted; they can never be occupied.
    pub fn neighbours(&self, coordinate: &Coordinate) -> Vec<(Coordinate, AdjacencyRule)> {
        let Coordinate {
            row,
            column,
            bench_position,
        } = *coordinate;
        let mut out = Vec::with_capacity(6);

        match self.bench_size() {
            BenchSize::Single => {
                let candidates = [
                    column.checked_sub(1).map(|c| Coordinate::new(row, c, 1)),
                    column.checked_add(1).map(|c| Coordinate::new(row, c, 1)),
                    row.checked_sub(1).map(|r| Coordinate::new(r, column, 1)),
                    row.checked_add(1).map(|r| Coordinate::new(r, column, 1)),
                ];
                for c in candidates.into_iter().flatten() {
                    out.push((c, AdjacencyRule::SingleSeatAdjacent));
                }
            }
            BenchSize::Pair => {
                for p in 1..=self.students_per_bench {
                    if p != bench_position {
                        out.push((Coordinate::new(row, column, p), AdjacencyRule::SameBench));
                    }
                }
                let sides = [column.checked_sub(1), column.checked_add(1)];
                for c in sides.into_iter().flatten() {
                    for p in 1..=self.students_per_bench {
                        out.push((Coordinate::new(row, c, p), AdjacencyRule::NeighbouringBench));
                    }
                }
            }
        }

        out.retain(|(c, _)| self.is_in_range(c));
        out
    }

    /// In-range seats adjacent to `coordinate`.
    pub fn adjacent_coordinates(&self, coordinate: &Coordinate) -> Vec<Coordinate> {
        self.neighbours(coordinate)
            .into_iter()
            .map(|(c, _)| c)
            .collect()
    }

    /// All seats in scan order: `row` outer, `column` middle,
    /// `bench_position` inner, all ascending from 1.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (1..=self.rows).flat_map(move |row| {
            (1..=self.columns).flat_map(move |column| {
                (1..=self.students_per_bench).map(move |p| Coordinate::new(row, column, p))
            })
        })
    }
}
