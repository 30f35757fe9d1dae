//! Input validation and manual seat assignment checks.
//!
//! A manual batch is a caller-supplied list of `(student, seat)` pairs.
//! It is checked in this order, stopping at the first failure:
//! 1. No student appears twice
//! 2. Every seat lies inside the room
//! 3. No seat is requested twice
//! 4. Replaying the batch in input order through
//!    [`check_seat`](crate::constraint::check_seat) against the existing
//!    plan (minus the students being moved) raises no conflict
//!
//! A failed batch has no effect; a passing batch is committed whole.

use std::collections::{HashMap, HashSet};

use crate::constraint::check_seat;
use crate::error::SeatingError;
use crate::index::AssignmentIndex;
use crate::models::{Coordinate, RoomAllocation, SeatAssignment, Student, StoredAssignment};

/// Fails on the first id that was already seen.
pub fn ensure_unique_students<'a, I>(ids: I) -> Result<(), SeatingError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SeatingError::DuplicateStudent {
                student_id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Structural checks (1-3) of a manual batch. Needs no student data.
///
/// # Errors
/// [`SeatingError::EmptyRequest`], [`SeatingError::DuplicateStudent`],
/// [`SeatingError::OutOfRange`] or [`SeatingError::DuplicateCoordinate`].
pub fn check_structure(room: &RoomAllocation, seats: &[SeatAssignment]) -> Result<(), SeatingError> {
    if seats.is_empty() {
        return Err(SeatingError::EmptyRequest);
    }

    ensure_unique_students(seats.iter().map(|s| s.student_id.as_str()))?;

    if let Some(bad) = seats.iter().find(|s| !room.is_in_range(&s.coordinate)) {
        return Err(SeatingError::OutOfRange {
            student_id: bad.student_id.clone(),
            coordinate: bad.coordinate,
        });
    }

    let mut taken: HashMap<Coordinate, &str> = HashMap::new();
    for s in seats {
        if let Some(first) = taken.insert(s.coordinate, s.student_id.as_str()) {
            return Err(SeatingError::DuplicateCoordinate {
                coordinate: s.coordinate,
                first: first.to_string(),
                second: s.student_id.clone(),
            });
        }
    }
    Ok(())
}

/// Constraint check (4) of a structurally valid manual batch.
///
/// `students` must contain every student named in `seats`; their class ids
/// drive the adjacency test.
///
/// # Errors
/// [`SeatingError::UnknownStudents`] if a seat names an unresolved student,
/// [`SeatingError::ConstraintViolation`] on the first conflicting seat.
pub fn check_constraints(
    room: &RoomAllocation,
    existing: &[StoredAssignment],
    students: &[Student],
    seats: &[SeatAssignment],
) -> Result<(), SeatingError> {
    let by_id: HashMap<&str, &Student> = students.iter().map(|s| (s.id.as_str(), s)).collect();

    let missing: Vec<String> = seats
        .iter()
        .filter(|s| !by_id.contains_key(s.student_id.as_str()))
        .map(|s| s.student_id.clone())
        .collect();
    if !missing.is_empty() {
        return Err(SeatingError::UnknownStudents {
            student_ids: missing,
        });
    }

    let moving: HashSet<&str> = seats.iter().map(|s| s.student_id.as_str()).collect();
    let mut index = AssignmentIndex::build_excluding(existing, &moving);

    for seat in seats {
        let class_id = by_id
            .get(seat.student_id.as_str())
            .and_then(|s| s.class_id.clone());
        check_seat(room, &index, &seat.coordinate, class_id.as_deref()).map_err(|conflict| {
            SeatingError::ConstraintViolation(conflict.for_student(seat.student_id.clone()))
        })?;
        index.place(seat.coordinate, seat.student_id.clone(), class_id);
    }
    Ok(())
}

/// Runs all manual batch checks and returns the rows to insert.
pub fn validate_manual(
    room: &RoomAllocation,
    existing: &[StoredAssignment],
    students: &[Student],
    seats: &[SeatAssignment],
) -> Result<Vec<SeatAssignment>, SeatingError> {
    check_structure(room, seats)?;
    check_constraints(room, existing, students, seats)?;
    Ok(seats.to_vec())
}
