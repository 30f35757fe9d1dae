//! Greedy class-grouped seat placer.
//!
//! # Algorithm
//!
//! 1. Drop the requested students' current seats from the index.
//! 2. Group students by class, groups in first-seen order, students in
//!    input order within a group.
//! 3. For each student, scan seats row-major (`row`, then `column`, then
//!    `bench_position`) and take the first seat passing
//!    [`check_seat`](crate::constraint::check_seat). Mark it in the index
//!    immediately so later students see it.
//! 4. Students with no legal seat are collected as unassigned.
//!
//! If anybody is unassigned the whole batch fails; nothing is committed.
//!
//! No backtracking: the greedy scan can give up on rosters a matching-based
//! solver would seat. That trade-off is accepted for predictability.
//!
//! # Complexity
//! O(n · s · a) where n=students, s=seats (≤ 200), a=adjacent seats (≤ 6).

use std::collections::HashSet;

use tracing::debug;

use crate::constraint::is_available;
use crate::error::SeatingError;
use crate::index::AssignmentIndex;
use crate::models::{RoomAllocation, SeatAssignment, Student, StoredAssignment};
use crate::validation::ensure_unique_students;

/// Outcome of a single placement pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    /// Seats found, in placement order.
    pub placed: Vec<SeatAssignment>,
    /// Students for whom no seat passed the constraint check.
    pub unassigned: Vec<Student>,
}

impl Placement {
    /// Whether every student got a seat.
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }
}

/// Groups students by class id.
///
/// Groups appear in the order their class is first seen; students keep
/// their input order inside a group. Unclassed students form one group.
pub fn group_by_class(students: &[Student]) -> Vec<Vec<&Student>> {
    let mut keys: Vec<Option<&str>> = Vec::new();
    let mut groups: Vec<Vec<&Student>> = Vec::new();

    for s in students {
        let key = s.class_id.as_deref();
        match keys.iter().position(|k| *k == key) {
            Some(i) => groups[i].push(s),
            None => {
                keys.push(key);
                groups.push(vec![s]);
            }
        }
    }
    groups
}

/// Deterministic greedy seat placer.
///
/// # Example
///
/// ```
/// use u_seating::models::{Coordinate, RoomAllocation, Student};
/// use u_seating::solver::GreedySeater;
///
/// let room = RoomAllocation::new("R1", 1, 3, 1);
/// let students = vec![
///     Student::new("S1").with_class("X"),
///     Student::new("S2").with_class("X"),
///     Student::new("S3").with_class("Y"),
/// ];
///
/// let seats = GreedySeater::new().solve(&room, &[], &students).unwrap();
/// assert_eq!(seats[0].coordinate, Coordinate::new(1, 1, 1));
/// assert_eq!(seats[1].coordinate, Coordinate::new(1, 3, 1));
/// assert_eq!(seats[2].coordinate, Coordinate::new(1, 2, 1));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySeater;

impl GreedySeater {
    /// Creates a placer.
    pub fn new() -> Self {
        Self
    }

    /// Places `students` into `index`, best effort.
    ///
    /// Every seat found is written to `index` as it is chosen, even if other
    /// students end up unassigned; callers discard the index on failure.
    pub fn place(
        &self,
        room: &RoomAllocation,
        index: &mut AssignmentIndex,
        students: &[Student],
    ) -> Placement {
        let mut placement = Placement::default();

        for group in group_by_class(students) {
            for student in group {
                let class_id = student.class_id.as_deref();
                let seat = room
                    .coordinates()
                    .find(|c| is_available(room, index, c, class_id));

                match seat {
                    Some(coordinate) => {
                        index.place(coordinate, student.id.clone(), student.class_id.clone());
                        placement
                            .placed
                            .push(SeatAssignment::new(student.id.clone(), coordinate));
                    }
                    None => {
                        debug!(student = %student.id, class = ?class_id, "no legal seat");
                        placement.unassigned.push(student.clone());
                    }
                }
            }
        }
        placement
    }

    /// Seats all `students` around the `existing` assignments.
    ///
    /// Existing seats of the requested students are released first.
    ///
    /// # Errors
    /// - [`SeatingError::DuplicateStudent`] if a student is listed twice.
    /// - [`SeatingError::Unsatisfiable`] if anybody is left without a seat;
    ///   the error carries the placements computed so far.
    pub fn solve(
        &self,
        room: &RoomAllocation,
        existing: &[StoredAssignment],
        students: &[Student],
    ) -> Result<Vec<SeatAssignment>, SeatingError> {
        ensure_unique_students(students.iter().map(|s| s.id.as_str()))?;

        let requested: HashSet<&str> = students.iter().map(|s| s.id.as_str()).collect();
        let mut index = AssignmentIndex::build_excluding(existing, &requested);
        debug!(
            room = %room.id,
            kept = index.len(),
            requested = students.len(),
            "placing students"
        );

        let placement = self.place(room, &mut index, students);
        if placement.is_complete() {
            Ok(placement.placed)
        } else {
            Err(SeatingError::Unsatisfiable {
                unassigned: placement.unassigned,
                tentative: placement.placed,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::find_conflicts;
    use crate::models::Coordinate;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn student(id: &str, class: &str) -> Student {
        Student::new(id).with_class(class)
    }

    fn merged(
        existing: &[StoredAssignment],
        students: &[Student],
        placed: &[SeatAssignment],
    ) -> Vec<StoredAssignment> {
        let moved: HashSet<&str> = placed.iter().map(|p| p.student_id.as_str()).collect();
        let mut all: Vec<StoredAssignment> = existing
            .iter()
            .filter(|a| !moved.contains(a.student_id.as_str()))
            .cloned()
            .collect();
        for p in placed {
            let class_id = students
                .iter()
                .find(|s| s.id == p.student_id)
                .and_then(|s| s.class_id.clone());
            all.push(StoredAssignment::new(p.student_id.clone(), class_id, p.coordinate));
        }
        all
    }

    #[test]
    fn test_group_by_class_first_seen_order() {
        let students = vec![
            student("A1", "A"),
            student("B1", "B"),
            Student::new("N1"),
            student("A2", "A"),
            Student::new("N2"),
        ];
        let groups = group_by_class(&students);
        let ids: Vec<Vec<&str>> = groups
            .iter()
            .map(|g| g.iter().map(|s| s.id.as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["A1", "A2"], vec!["B1"], vec!["N1", "N2"]]);
    }

    #[test]
    fn test_single_row_three_seats() {
        let room = RoomAllocation::new("R", 1, 3, 1);
        let students = vec![student("S1", "X"), student("S2", "X"), student("S3", "Y")];
        let seats = GreedySeater::new().solve(&room, &[], &students).unwrap();

        let seat = |id: &str| seats.iter().find(|s| s.student_id == id).unwrap().coordinate;
        assert_eq!(seat("S1"), Coordinate::new(1, 1, 1));
        assert_eq!(seat("S2"), Coordinate::new(1, 3, 1));
        assert_eq!(seat("S3"), Coordinate::new(1, 2, 1));
    }

    #[test]
    fn test_pair_bench_combinations() {
        // 1 row x 2 columns x 2 seats: every seat touches every other seat.
        let room = RoomAllocation::new("R", 1, 2, 2);
        let combos: [[&str; 4]; 4] = [
            ["X", "X", "Y", "Y"],
            ["X", "Y", "X", "Y"],
            ["X", "Y", "Z", "W"],
            ["X", "X", "X", "X"],
        ];

        for classes in combos {
            let students: Vec<Student> = classes
                .iter()
                .enumerate()
                .map(|(i, c)| student(&format!("S{i}"), c))
                .collect();
            let distinct: HashSet<&str> = classes.iter().copied().collect();

            match GreedySeater::new().solve(&room, &[], &students) {
                Ok(placed) => {
                    assert_eq!(distinct.len(), 4, "{classes:?}");
                    assert_eq!(placed.len(), 4);
                    assert!(find_conflicts(&room, &merged(&[], &students, &placed)).is_empty());
                }
                Err(SeatingError::Unsatisfiable {
                    unassigned,
                    tentative,
                }) => {
                    assert!(distinct.len() < 4, "{classes:?}");
                    assert_eq!(unassigned.len() + tentative.len(), 4);
                    assert_eq!(tentative.len(), distinct.len());
                    assert!(
                        find_conflicts(&room, &merged(&[], &students, &tentative)).is_empty()
                    );
                }
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn test_existing_seats_are_respected() {
        let room = RoomAllocation::new("R", 1, 3, 1);
        let existing = vec![StoredAssignment::new(
            "E1",
            Some("X".into()),
            Coordinate::new(1, 2, 1),
        )];
        let students = vec![student("S1", "Y"), student("S2", "X")];
        let placed = GreedySeater::new()
            .solve(&room, &existing, &students)
            .unwrap_err();
        // Y takes (1,1,1); X cannot sit next to E1 on (1,3,1).
        match placed {
            SeatingError::Unsatisfiable {
                unassigned,
                tentative,
            } => {
                assert_eq!(unassigned[0].id, "S2");
                assert_eq!(tentative, vec![SeatAssignment::new("S1", Coordinate::new(1, 1, 1))]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_requested_students_are_reseated() {
        let room = RoomAllocation::new("R", 1, 3, 1);
        let existing = vec![StoredAssignment::new(
            "S1",
            Some("X".into()),
            Coordinate::new(1, 2, 1),
        )];
        let students = vec![student("S1", "X"), student("S2", "X")];
        let placed = GreedySeater::new().solve(&room, &existing, &students).unwrap();
        assert_eq!(placed[0], SeatAssignment::new("S1", Coordinate::new(1, 1, 1)));
        assert_eq!(placed[1], SeatAssignment::new("S2", Coordinate::new(1, 3, 1)));
    }

    #[test]
    fn test_duplicate_student_rejected() {
        let room = RoomAllocation::new("R", 2, 2, 1);
        let students = vec![student("S1", "X"), student("S1", "X")];
        assert!(matches!(
            GreedySeater::new().solve(&room, &[], &students),
            Err(SeatingError::DuplicateStudent { .. })
        ));
    }

    #[test]
    fn test_unclassed_fill_every_seat() {
        let room = RoomAllocation::new("R", 2, 2, 2);
        let students: Vec<Student> = (0..8).map(|i| Student::new(format!("S{i}"))).collect();
        let placed = GreedySeater::new().solve(&room, &[], &students).unwrap();
        let seats: Vec<Coordinate> = placed.iter().map(|p| p.coordinate).collect();
        assert_eq!(seats, room.coordinates().collect::<Vec<_>>());
    }

    #[test]
    fn test_random_rosters_stay_conflict_free() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let room = RoomAllocation::new(
                "R",
                rng.random_range(1..=6),
                rng.random_range(1..=6),
                rng.random_range(1..=2),
            );
            let n = rng.random_range(0..=room.capacity() as usize);
            let students: Vec<Student> = (0..n)
                .map(|i| {
                    let s = Student::new(format!("S{i}"));
                    if rng.random_bool(0.8) {
                        s.with_class(format!("C{}", rng.random_range(0..4u8)))
                    } else {
                        s
                    }
                })
                .collect();

            let placed = match GreedySeater::new().solve(&room, &[], &students) {
                Ok(placed) => {
                    assert_eq!(placed.len(), n);
                    placed
                }
                Err(SeatingError::Unsatisfiable { tentative, .. }) => tentative,
                Err(other) => panic!("unexpected error {other:?}"),
            };
            assert!(placed.iter().all(|p| room.is_in_range(&p.coordinate)));
            assert!(find_conflicts(&room, &merged(&[], &students, &placed)).is_empty());
        }
    }

    proptest! {
        #[test]
        fn prop_solve_is_deterministic(
            rows in 1u32..5,
            columns in 1u32..5,
            spb in 1u32..=2,
            classes in proptest::collection::vec(proptest::option::of(0u8..3), 0..16),
        ) {
            let room = RoomAllocation::new("R", rows, columns, spb);
            let students: Vec<Student> = classes
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    let s = Student::new(format!("S{i}"));
                    match c {
                        Some(c) => s.with_class(format!("C{c}")),
                        None => s,
                    }
                })
                .collect();

            let first = GreedySeater::new().solve(&room, &[], &students);
            let second = GreedySeater::new().solve(&room, &[], &students);
            prop_assert_eq!(first, second);
        }
    }
}
