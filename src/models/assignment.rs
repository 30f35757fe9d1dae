//! Seat assignment and seating plan models.
//!
//! A seating plan is the full set of student-to-seat bindings of one room,
//! analogous to a schedule being the set of activity-to-resource bindings.

use serde::{Deserialize, Serialize};

use super::{Coordinate, RoomAllocation};

/// A student placed on a seat. This is the row inserted by a replace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatAssignment {
    /// Placed student.
    pub student_id: String,
    /// Seat taken.
    pub coordinate: Coordinate,
}

impl SeatAssignment {
    /// Creates a seat assignment.
    pub fn new(student_id: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            student_id: student_id.into(),
            coordinate,
        }
    }
}

/// A persisted assignment as loaded back from the store, with the
/// student's class denormalized for the adjacency test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAssignment {
    /// Placed student.
    pub student_id: String,
    /// Class of the student at load time.
    pub class_id: Option<String>,
    /// Seat taken.
    pub coordinate: Coordinate,
}

impl StoredAssignment {
    /// Creates a stored assignment.
    pub fn new(
        student_id: impl Into<String>,
        class_id: Option<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            class_id,
            coordinate,
        }
    }
}

/// The seating chart of a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatingPlan {
    /// Room configuration.
    pub room: RoomAllocation,
    /// Current assignments.
    pub assignments: Vec<StoredAssignment>,
}

impl SeatingPlan {
    /// Creates a plan.
    pub fn new(room: RoomAllocation, assignments: Vec<StoredAssignment>) -> Self {
        Self { room, assignments }
    }

    /// Seat of a student, if placed.
    pub fn seat_of(&self, student_id: &str) -> Option<Coordinate> {
        self.assignments
            .iter()
            .find(|a| a.student_id == student_id)
            .map(|a| a.coordinate)
    }

    /// Student sitting at `coordinate`, if any.
    pub fn occupant_at(&self, coordinate: &Coordinate) -> Option<&StoredAssignment> {
        self.assignments
            .iter()
            .find(|a| a.coordinate == *coordinate)
    }

    /// All assignments of one class.
    pub fn students_of_class(&self, class_id: &str) -> Vec<&StoredAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.class_id.as_deref() == Some(class_id))
            .collect()
    }

    /// Number of occupied seats.
    pub fn occupied_count(&self) -> usize {
        self.assignments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> SeatingPlan {
        SeatingPlan::new(
            RoomAllocation::new("R1", 2, 2, 2),
            vec![
                StoredAssignment::new("S1", Some("7A".into()), Coordinate::new(1, 1, 1)),
                StoredAssignment::new("S2", Some("7B".into()), Coordinate::new(1, 1, 2)),
                StoredAssignment::new("S3", Some("7A".into()), Coordinate::new(2, 1, 1)),
                StoredAssignment::new("S4", None, Coordinate::new(2, 2, 2)),
            ],
        )
    }

    #[test]
    fn test_seat_lookup() {
        let plan = sample_plan();
        assert_eq!(plan.seat_of("S2"), Some(Coordinate::new(1, 1, 2)));
        assert_eq!(plan.seat_of("S99"), None);
        assert_eq!(
            plan.occupant_at(&Coordinate::new(2, 2, 2)).map(|a| a.student_id.as_str()),
            Some("S4")
        );
        assert!(plan.occupant_at(&Coordinate::new(1, 2, 1)).is_none());
    }

    #[test]
    fn test_students_of_class() {
        let plan = sample_plan();
        assert_eq!(plan.students_of_class("7A").len(), 2);
        assert_eq!(plan.students_of_class("7C").len(), 0);
        assert_eq!(plan.occupied_count(), 4);
    }
}
