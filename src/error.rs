//! Error taxonomy of the seating engine.
//!
//! Every failure leaves the store untouched: the only committed outcomes are
//! "all requested students validly placed" and "nothing changed".

use std::fmt::{self, Display};

use crate::constraint::SeatConflict;
use crate::models::{Coordinate, SeatAssignment, Student};

/// Result alias for seating operations.
pub type Result<T> = std::result::Result<T, SeatingError>;

/// Failure reported by a persistence or cache collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError(pub String);

impl StoreError {
    /// Creates a store error.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// Broad failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Room missing or badly dimensioned.
    Configuration,
    /// Malformed request: duplicates, unknown ids, out-of-range seats.
    Input,
    /// Manual placement breaks the adjacency rule.
    Constraint,
    /// Automatic placement could not seat everybody.
    Unsatisfiable,
    /// Collaborator failure, passed through unchanged.
    Persistence,
}

/// Seating operation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SeatingError {
    /// The engine configuration itself is unusable.
    InvalidConfig(String),
    /// No room with this id exists for the tenant.
    RoomNotFound { room_id: String, school_id: String },
    /// A room dimension is zero or the bench size is unsupported.
    InvalidDimensions {
        room_id: String,
        rows: u32,
        columns: u32,
        students_per_bench: u32,
    },
    /// Seat count above the configured ceiling.
    CapacityExceeded {
        room_id: String,
        capacity: u64,
        limit: u32,
    },
    /// The request names no students.
    EmptyRequest,
    /// A student id appears more than once in the request.
    DuplicateStudent { student_id: String },
    /// Ids that do not resolve to students of the tenant.
    UnknownStudents { student_ids: Vec<String> },
    /// A requested seat lies outside the grid.
    OutOfRange {
        student_id: String,
        coordinate: Coordinate,
    },
    /// Two requested placements target the same seat.
    DuplicateCoordinate {
        coordinate: Coordinate,
        first: String,
        second: String,
    },
    /// A manual placement breaks the adjacency rule.
    ConstraintViolation(SeatConflict),
    /// Some students have no legal seat. `tentative` holds the placements
    /// computed before giving up; none of them were committed.
    Unsatisfiable {
        unassigned: Vec<Student>,
        tentative: Vec<SeatAssignment>,
    },
    /// Collaborator failure.
    Store(StoreError),
}

impl SeatingError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SeatingError::InvalidConfig(_)
            | SeatingError::RoomNotFound { .. }
            | SeatingError::InvalidDimensions { .. }
            | SeatingError::CapacityExceeded { .. } => ErrorKind::Configuration,
            SeatingError::EmptyRequest
            | SeatingError::DuplicateStudent { .. }
            | SeatingError::UnknownStudents { .. }
            | SeatingError::OutOfRange { .. }
            | SeatingError::DuplicateCoordinate { .. } => ErrorKind::Input,
            SeatingError::ConstraintViolation(_) => ErrorKind::Constraint,
            SeatingError::Unsatisfiable { .. } => ErrorKind::Unsatisfiable,
            SeatingError::Store(_) => ErrorKind::Persistence,
        }
    }
}

impl Display for SeatingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatingError::InvalidConfig(msg) => write!(f, "invalid seating config: {msg}"),
            SeatingError::RoomNotFound { room_id, school_id } => {
                write!(f, "room allocation '{room_id}' not found for school '{school_id}'")
            }
            SeatingError::InvalidDimensions {
                room_id,
                rows,
                columns,
                students_per_bench,
            } => write!(
                f,
                "room allocation '{room_id}' has invalid dimensions {rows}x{columns} with {students_per_bench} per bench"
            ),
            SeatingError::CapacityExceeded {
                room_id,
                capacity,
                limit,
            } => write!(
                f,
                "room allocation '{room_id}' has {capacity} seats, above the limit of {limit}"
            ),
            SeatingError::EmptyRequest => f.write_str("no students given"),
            SeatingError::DuplicateStudent { student_id } => {
                write!(f, "student '{student_id}' appears more than once")
            }
            SeatingError::UnknownStudents { student_ids } => {
                write!(f, "unknown students: {}", student_ids.join(", "))
            }
            SeatingError::OutOfRange {
                student_id,
                coordinate,
            } => write!(
                f,
                "seat {coordinate} for student '{student_id}' is outside the room"
            ),
            SeatingError::DuplicateCoordinate {
                coordinate,
                first,
                second,
            } => write!(
                f,
                "seat {coordinate} requested for both '{first}' and '{second}'"
            ),
            SeatingError::ConstraintViolation(conflict) => Display::fmt(conflict, f),
            SeatingError::Unsatisfiable { unassigned, .. } => {
                let names: Vec<&str> = unassigned.iter().map(Student::label).collect();
                write!(
                    f,
                    "could not seat {} student(s): {}",
                    unassigned.len(),
                    names.join(", ")
                )
            }
            SeatingError::Store(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for SeatingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SeatingError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for SeatingError {
    fn from(e: StoreError) -> Self {
        SeatingError::Store(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_kinds() {
        assert_eq!(SeatingError::EmptyRequest.kind(), ErrorKind::Input);
        assert_eq!(
            SeatingError::CapacityExceeded {
                room_id: "R".into(),
                capacity: 400,
                limit: 200
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            SeatingError::from(StoreError::new("down")).kind(),
            ErrorKind::Persistence
        );
    }

    #[test]
    fn test_store_error_is_source() {
        let e = SeatingError::from(StoreError::new("disk full"));
        assert_eq!(e.to_string(), "store error: disk full");
        assert!(e.source().is_some());
        assert!(SeatingError::EmptyRequest.source().is_none());
    }

    #[test]
    fn test_unsatisfiable_message_uses_names() {
        let e = SeatingError::Unsatisfiable {
            unassigned: vec![Student::new("S1").with_name("Ada"), Student::new("S2")],
            tentative: vec![],
        };
        assert_eq!(e.to_string(), "could not seat 2 student(s): Ada, S2");
    }
}
