//! Request-scoped seat occupancy index.
//!
//! Maps each occupied [`Coordinate`] to its occupant. Built from persisted
//! assignments, then extended with tentative placements as a batch is
//! processed so later placements see earlier ones. Never shared across
//! requests.

use std::collections::{HashMap, HashSet};

use crate::models::{Coordinate, StoredAssignment};

/// The student sitting on a seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    /// Student id.
    pub student_id: String,
    /// Student's class, `None` if unclassed.
    pub class_id: Option<String>,
}

/// Coordinate → occupant lookup.
#[derive(Debug, Clone, Default)]
pub struct AssignmentIndex {
    seats: HashMap<Coordinate, Occupant>,
}

impl AssignmentIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the index from persisted assignments.
    pub fn build<'a, I>(existing: I) -> Self
    where
        I: IntoIterator<Item = &'a StoredAssignment>,
    {
        Self::build_excluding(existing, &HashSet::new())
    }

    /// Seeds the index from persisted assignments, skipping those belonging
    /// to `excluded` students (they are about to be re-placed).
    pub fn build_excluding<'a, I>(existing: I, excluded: &HashSet<&str>) -> Self
    where
        I: IntoIterator<Item = &'a StoredAssignment>,
    {
        let seats = existing
            .into_iter()
            .filter(|a| !excluded.contains(a.student_id.as_str()))
            .map(|a| {
                (
                    a.coordinate,
                    Occupant {
                        student_id: a.student_id.clone(),
                        class_id: a.class_id.clone(),
                    },
                )
            })
            .collect();
        Self { seats }
    }

    /// Current occupant of a seat.
    #[inline]
    pub fn occupant(&self, coordinate: &Coordinate) -> Option<&Occupant> {
        self.seats.get(coordinate)
    }

    /// Marks a seat as taken, overwriting any previous occupant.
    pub fn place(
        &mut self,
        coordinate: Coordinate,
        student_id: impl Into<String>,
        class_id: Option<String>,
    ) {
        self.seats.insert(
            coordinate,
            Occupant {
                student_id: student_id.into(),
                class_id,
            },
        );
    }

    /// Number of occupied seats.
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// Whether no seat is occupied.
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}
