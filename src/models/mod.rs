//! Seating domain models.
//!
//! Provides the data types describing a room, its seats, the students to
//! be seated and the resulting seating plan.
//!
//! # Domain Mapping
//!
//! | u-seating | Classroom | Exam hall |
//! |-----------|-----------|-----------|
//! | RoomAllocation | Classroom layout | Exam room |
//! | Coordinate | Seat | Desk |
//! | Student.class_id | Class / section | Paper / subject |
//! | SeatingPlan | Seating chart | Exam seating chart |

mod assignment;
mod coordinate;
mod room;
mod student;

pub use assignment::{SeatAssignment, SeatingPlan, StoredAssignment};
pub use coordinate::Coordinate;
pub use room::{AdjacencyRule, BenchSize, RoomAllocation};
pub use student::{Student, TenantContext};
