//! Seating engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::SeatingError;

/// Default seat ceiling per room.
pub const DEFAULT_MAX_CAPACITY: u32 = 200;

/// Largest supported bench.
pub const DEFAULT_MAX_STUDENTS_PER_BENCH: u32 = 2;

/// Runtime limits and policies of the seating service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeatingConfig {
    /// Maximum `rows * columns * students_per_bench` of a room.
    pub max_capacity: u32,
    /// Maximum seats per bench. Only 1 and 2 have adjacency rules.
    pub max_students_per_bench: u32,
    /// Serialize read-compute-replace per room inside this process.
    pub serialize_per_room: bool,
}

impl Default for SeatingConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
            max_students_per_bench: DEFAULT_MAX_STUDENTS_PER_BENCH,
            serialize_per_room: true,
        }
    }
}

impl SeatingConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity ceiling.
    pub fn with_max_capacity(mut self, max_capacity: u32) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Sets the bench size ceiling.
    pub fn with_max_students_per_bench(mut self, max: u32) -> Self {
        self.max_students_per_bench = max;
        self
    }

    /// Enables or disables per-room serialization.
    pub fn with_serialize_per_room(mut self, enabled: bool) -> Self {
        self.serialize_per_room = enabled;
        self
    }

    /// Checks that the limits are usable.
    pub fn validate(&self) -> Result<(), SeatingError> {
        if self.max_capacity == 0 {
            return Err(SeatingError::InvalidConfig(
                "max_capacity must be at least 1".to_string(),
            ));
        }
        if !(1..=DEFAULT_MAX_STUDENTS_PER_BENCH).contains(&self.max_students_per_bench) {
            return Err(SeatingError::InvalidConfig(format!(
                "max_students_per_bench must be 1 or 2, got {}",
                self.max_students_per_bench
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SeatingConfig::default();
        assert_eq!(c.max_capacity, 200);
        assert_eq!(c.max_students_per_bench, 2);
        assert!(c.serialize_per_room);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_invalid_limits() {
        assert!(SeatingConfig::new().with_max_capacity(0).validate().is_err());
        assert!(SeatingConfig::new()
            .with_max_students_per_bench(3)
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: SeatingConfig = serde_json::from_str(r#"{"max_capacity": 120}"#).unwrap();
        assert_eq!(c.max_capacity, 120);
        assert_eq!(c.max_students_per_bench, 2);
        assert!(c.serialize_per_room);
    }
}
