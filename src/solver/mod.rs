//! Automatic seat placement and plan statistics.
//!
//! # Algorithm
//!
//! `GreedySeater` groups students by class and gives each, in turn, the
//! first legal seat in row-major order. It is deterministic and cheap, not
//! optimal: it never backtracks.
//!
//! # Statistics
//!
//! `SeatingStats` summarizes a plan: capacity, occupancy, per-class counts
//! and the number of rule violations.

mod greedy;
mod stats;

pub use greedy::{group_by_class, GreedySeater, Placement};
pub use stats::SeatingStats;
