//! Seat availability predicate.
//!
//! [`check_seat`] is the one place the class separation rule is decided.
//! The automatic placer and the manual validator both go through it, so the
//! two paths accept exactly the same placements.
//!
//! A seat is available for a class when:
//! 1. nobody sits there, and
//! 2. no adjacent seat (see [`RoomAllocation::neighbours`]) holds a student
//!    of the same non-null class.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::index::AssignmentIndex;
use crate::models::{AdjacencyRule, Coordinate, RoomAllocation, StoredAssignment};

/// Why a seat was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictReason {
    /// The seat already has an occupant.
    Occupied,
    /// A same-class student sits on an adjacent seat.
    Adjacent(AdjacencyRule),
}

/// A refused placement with the seat that blocks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConflict {
    /// Seat that was requested.
    pub coordinate: Coordinate,
    /// Student being placed, when known.
    pub student_id: Option<String>,
    /// Class of the student being placed.
    pub class_id: Option<String>,
    /// Seat holding the blocking student.
    pub blocking_coordinate: Coordinate,
    /// Blocking student.
    pub blocking_student: String,
    /// Rule that was broken.
    pub reason: ConflictReason,
}

impl SeatConflict {
    /// Attaches the id of the student being placed.
    pub fn for_student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }
}

impl fmt::Display for SeatConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = self.student_id.as_deref().unwrap_or("student");
        match self.reason {
            ConflictReason::Occupied => write!(
                f,
                "seat {} for '{}' is already taken by '{}'",
                self.coordinate, who, self.blocking_student
            ),
            ConflictReason::Adjacent(rule) => write!(
                f,
                "seat {} for '{}' of class '{}' conflicts with '{}' at {} ({}: {})",
                self.coordinate,
                who,
                self.class_id.as_deref().unwrap_or("-"),
                self.blocking_student,
                self.blocking_coordinate,
                rule,
                rule.description()
            ),
        }
    }
}

/// Checks whether a student of `class_id` may sit at `coordinate`.
///
/// # Errors
/// Returns the first [`SeatConflict`] found: occupancy first, then
/// neighbours in [`RoomAllocation::neighbours`] order.
pub fn check_seat(
    room: &RoomAllocation,
    index: &AssignmentIndex,
    coordinate: &Coordinate,
    class_id: Option<&str>,
) -> Result<(), SeatConflict> {
    if let Some(occupant) = index.occupant(coordinate) {
        return Err(SeatConflict {
            coordinate: *coordinate,
            student_id: None,
            class_id: class_id.map(str::to_owned),
            blocking_coordinate: *coordinate,
            blocking_student: occupant.student_id.clone(),
            reason: ConflictReason::Occupied,
        });
    }

    let Some(class_id) = class_id else {
        return Ok(());
    };

    for (neighbour, rule) in room.neighbours(coordinate) {
        if let Some(occupant) = index.occupant(&neighbour) {
            if occupant.class_id.as_deref() == Some(class_id) {
                return Err(SeatConflict {
                    coordinate: *coordinate,
                    student_id: None,
                    class_id: Some(class_id.to_owned()),
                    blocking_coordinate: neighbour,
                    blocking_student: occupant.student_id.clone(),
                    reason: ConflictReason::Adjacent(rule),
                });
            }
        }
    }
    Ok(())
}

/// Boolean form of [`check_seat`].
#[inline]
pub fn is_available(
    room: &RoomAllocation,
    index: &AssignmentIndex,
    coordinate: &Coordinate,
    class_id: Option<&str>,
) -> bool {
    check_seat(room, index, coordinate, class_id).is_ok()
}

/// Audits a complete seating plan.
///
/// Reports every seat holding more than one student and every pair of
/// adjacent same-class students (each pair once). An empty result means the
/// plan satisfies the separation rule.
pub fn find_conflicts(room: &RoomAllocation, assignments: &[StoredAssignment]) -> Vec<SeatConflict> {
    let mut conflicts = Vec::new();
    let mut by_seat: HashMap<Coordinate, &StoredAssignment> = HashMap::new();

    for a in assignments {
        if let Some(prev) = by_seat.get(&a.coordinate) {
            conflicts.push(SeatConflict {
                coordinate: a.coordinate,
                student_id: Some(a.student_id.clone()),
                class_id: a.class_id.clone(),
                blocking_coordinate: prev.coordinate,
                blocking_student: prev.student_id.clone(),
                reason: ConflictReason::Occupied,
            });
        } else {
            by_seat.insert(a.coordinate, a);
        }
    }

    let mut seats: Vec<&&StoredAssignment> = by_seat.values().collect();
    seats.sort_by_key(|a| a.coordinate);

    for a in seats {
        let Some(class_id) = a.class_id.as_deref() else {
            continue;
        };
        for (neighbour, rule) in room.neighbours(&a.coordinate) {
            // Adjacency is symmetric; report each pair from its lower seat.
            if neighbour <= a.coordinate {
                continue;
            }
            if let Some(other) = by_seat.get(&neighbour) {
                if other.class_id.as_deref() == Some(class_id) {
                    conflicts.push(SeatConflict {
                        coordinate: a.coordinate,
                        student_id: Some(a.student_id.clone()),
                        class_id: Some(class_id.to_owned()),
                        blocking_coordinate: neighbour,
                        blocking_student: other.student_id.clone(),
                        reason: ConflictReason::Adjacent(rule),
                    });
                }
            }
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(rows: &[(&str, Option<&str>, (u32, u32, u32))]) -> AssignmentIndex {
        let mut index = AssignmentIndex::new();
        for (id, class, c) in rows {
            index.place((*c).into(), *id, class.map(str::to_owned));
        }
        index
    }

    #[test]
    fn test_occupied_seat_refused() {
        let room = RoomAllocation::new("R", 2, 2, 1);
        let index = index_with(&[("S1", None, (1, 1, 1))]);
        let err = check_seat(&room, &index, &Coordinate::new(1, 1, 1), None).unwrap_err();
        assert_eq!(err.reason, ConflictReason::Occupied);
        assert_eq!(err.blocking_student, "S1");
    }

    #[test]
    fn test_single_bench_adjacent_same_class() {
        let room = RoomAllocation::new("R", 3, 3, 1);
        let index = index_with(&[("S1", Some("7A"), (2, 2, 1))]);

        for c in [(1u32, 2u32, 1u32), (3, 2, 1), (2, 1, 1), (2, 3, 1)] {
            let err = check_seat(&room, &index, &Coordinate::from(c), Some("7A")).unwrap_err();
            assert_eq!(
                err.reason,
                ConflictReason::Adjacent(AdjacencyRule::SingleSeatAdjacent)
            );
        }
        // Diagonal is fine.
        assert!(is_available(&room, &index, &Coordinate::new(1, 1, 1), Some("7A")));
        // Other classes are fine.
        assert!(is_available(&room, &index, &Coordinate::new(1, 2, 1), Some("7B")));
    }

    #[test]
    fn test_pair_bench_rules() {
        let room = RoomAllocation::new("R", 2, 3, 2);
        let index = index_with(&[("S1", Some("7A"), (1, 2, 1))]);

        let same = check_seat(&room, &index, &Coordinate::new(1, 2, 2), Some("7A")).unwrap_err();
        assert_eq!(same.reason, ConflictReason::Adjacent(AdjacencyRule::SameBench));

        for c in [(1u32, 1u32, 1u32), (1, 1, 2), (1, 3, 1), (1, 3, 2)] {
            let err = check_seat(&room, &index, &Coordinate::from(c), Some("7A")).unwrap_err();
            assert_eq!(
                err.reason,
                ConflictReason::Adjacent(AdjacencyRule::NeighbouringBench)
            );
        }
        // Directly behind is not adjacent with two-seat benches.
        assert!(is_available(&room, &index, &Coordinate::new(2, 2, 1), Some("7A")));
    }

    #[test]
    fn test_null_class_never_conflicts() {
        let room = RoomAllocation::new("R", 1, 3, 1);
        let index = index_with(&[("S1", None, (1, 1, 1)), ("S2", Some("7A"), (1, 3, 1))]);
        assert!(is_available(&room, &index, &Coordinate::new(1, 2, 1), None));

        // A null-class neighbour does not block a classed student either.
        let index = index_with(&[("S1", None, (1, 1, 1))]);
        assert!(is_available(&room, &index, &Coordinate::new(1, 2, 1), Some("7A")));
    }

    #[test]
    fn test_out_of_grid_seat_at_u32_bound_never_conflicts() {
        let index = index_with(&[("S1", Some("X"), (1, 2, 1)), ("S2", Some("X"), (2, 2, 1))]);
        for spb in 1..=2 {
            let room = RoomAllocation::new("R", 2, 2, spb);
            for c in [
                (1u32, u32::MAX, 1u32),
                (u32::MAX, 2, 1),
                (u32::MAX, u32::MAX, u32::MAX),
            ] {
                assert!(is_available(&room, &index, &Coordinate::from(c), Some("X")));
            }
        }
    }

    #[test]
    fn test_conflict_message_names_rule() {
        let room = RoomAllocation::new("R", 1, 1, 2);
        let index = index_with(&[("S1", Some("7A"), (1, 1, 1))]);
        let msg = check_seat(&room, &index, &Coordinate::new(1, 1, 2), Some("7A"))
            .unwrap_err()
            .for_student("S2")
            .to_string();
        assert!(msg.contains("same-bench"));
        assert!(msg.contains("'S2'"));
    }

    #[test]
    fn test_find_conflicts() {
        let room = RoomAllocation::new("R", 1, 3, 1);
        let plan = vec![
            StoredAssignment::new("S1", Some("7A".into()), Coordinate::new(1, 1, 1)),
            StoredAssignment::new("S2", Some("7A".into()), Coordinate::new(1, 2, 1)),
            StoredAssignment::new("S3", Some("7B".into()), Coordinate::new(1, 3, 1)),
            StoredAssignment::new("S4", None, Coordinate::new(1, 3, 1)),
        ];
        let conflicts = find_conflicts(&room, &plan);
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts
            .iter()
            .any(|c| c.reason == ConflictReason::Occupied && c.blocking_student == "S3"));
        assert!(conflicts.iter().any(|c| c.reason
            == ConflictReason::Adjacent(AdjacencyRule::SingleSeatAdjacent)
            && c.student_id.as_deref() == Some("S1")
            && c.blocking_student == "S2"));
    }

    #[test]
    fn test_find_conflicts_clean_plan() {
        let room = RoomAllocation::new("R", 1, 3, 1);
        let plan = vec![
            StoredAssignment::new("S1", Some("7A".into()), Coordinate::new(1, 1, 1)),
            StoredAssignment::new("S2", Some("7B".into()), Coordinate::new(1, 2, 1)),
            StoredAssignment::new("S3", Some("7A".into()), Coordinate::new(1, 3, 1)),
        ];
        assert!(find_conflicts(&room, &plan).is_empty());
    }
}
