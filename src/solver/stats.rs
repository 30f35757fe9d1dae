//! Seating plan statistics.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Capacity | rows × columns × students per bench |
//! | Occupied | seats with a student |
//! | Utilization | occupied / capacity |
//! | Class counts | students per class id |
//! | Conflicts | adjacency or double-occupancy violations |

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constraint::find_conflicts;
use crate::models::SeatingPlan;

/// Summary figures of a seating plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatingStats {
    /// Total seats.
    pub capacity: u64,
    /// Seats taken.
    pub occupied: usize,
    /// Seats left.
    pub free: u64,
    /// Occupied fraction (0.0..1.0).
    pub utilization: f64,
    /// Students per class id.
    pub by_class: BTreeMap<String, usize>,
    /// Students without a class.
    pub unclassed: usize,
    /// Number of rule violations found in the plan.
    pub conflicts: usize,
}

impl SeatingStats {
    /// Computes statistics for a plan.
    pub fn calculate(plan: &SeatingPlan) -> Self {
        let capacity = plan.room.capacity();
        let occupied = plan.occupied_count();
        let mut by_class = BTreeMap::new();
        let mut unclassed = 0;

        for a in &plan.assignments {
            match &a.class_id {
                Some(c) => *by_class.entry(c.clone()).or_insert(0) += 1,
                None => unclassed += 1,
            }
        }

        let utilization = if capacity == 0 {
            0.0
        } else {
            occupied as f64 / capacity as f64
        };

        Self {
            capacity,
            occupied,
            free: capacity.saturating_sub(occupied as u64),
            utilization,
            by_class,
            unclassed,
            conflicts: find_conflicts(&plan.room, &plan.assignments).len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, RoomAllocation, StoredAssignment};

    #[test]
    fn test_stats() {
        let plan = SeatingPlan::new(
            RoomAllocation::new("R", 2, 2, 1),
            vec![
                StoredAssignment::new("S1", Some("7A".into()), Coordinate::new(1, 1, 1)),
                StoredAssignment::new("S2", Some("7A".into()), Coordinate::new(2, 2, 1)),
                StoredAssignment::new("S3", None, Coordinate::new(1, 2, 1)),
            ],
        );
        let stats = SeatingStats::calculate(&plan);
        assert_eq!(stats.capacity, 4);
        assert_eq!(stats.occupied, 3);
        assert_eq!(stats.free, 1);
        assert!((stats.utilization - 0.75).abs() < 1e-10);
        assert_eq!(stats.by_class["7A"], 2);
        assert_eq!(stats.unclassed, 1);
        assert_eq!(stats.conflicts, 0);
    }

    #[test]
    fn test_stats_counts_conflicts() {
        let plan = SeatingPlan::new(
            RoomAllocation::new("R", 1, 2, 1),
            vec![
                StoredAssignment::new("S1", Some("7A".into()), Coordinate::new(1, 1, 1)),
                StoredAssignment::new("S2", Some("7A".into()), Coordinate::new(1, 2, 1)),
            ],
        );
        assert_eq!(SeatingStats::calculate(&plan).conflicts, 1);
    }

    #[test]
    fn test_empty_room() {
        let plan = SeatingPlan::new(RoomAllocation::new("R", 0, 0, 1), vec![]);
        let stats = SeatingStats::calculate(&plan);
        assert_eq!(stats.capacity, 0);
        assert_eq!(stats.utilization, 0.0);
    }
}
