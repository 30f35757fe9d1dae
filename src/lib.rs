//! Classroom seating allocation.
//!
//! Places students on the benches of a room so that no two students of the
//! same class sit next to each other, either automatically (greedy scan) or
//! from a caller-supplied chart that is validated against the same rule.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `RoomAllocation`, `Coordinate`, `Student`,
//!   `SeatAssignment`, `SeatingPlan`, `TenantContext`
//! - **`index`**: Request-scoped seat occupancy index
//! - **`constraint`**: The seat availability predicate and plan auditing
//! - **`solver`**: Greedy automatic placement and plan statistics
//! - **`validation`**: Input checks and manual assignment validation
//! - **`store`**: Async persistence and cache collaborators
//! - **`service`**: End-to-end seating operations over a store
//!
//! # Adjacency
//!
//! With one student per bench, the seats left, right, in front and behind
//! are adjacent. With two per bench, the other seat of the bench and both
//! seats of the benches to the left and right are adjacent; rows do not
//! touch.

pub mod config;
pub mod constraint;
pub mod error;
pub mod index;
pub mod models;
pub mod service;
pub mod solver;
pub mod store;
pub mod validation;

pub use config::SeatingConfig;
pub use error::{ErrorKind, Result, SeatingError, StoreError};
pub use service::SeatingService;
