//! Student and tenant models.

use serde::{Deserialize, Serialize};

/// A student resolved from the roster.
///
/// Only the class id takes part in placement: two students conflict when
/// both carry the same non-null class id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    pub id: String,
    /// Display name (used in failure reports).
    pub name: String,
    /// Class the student belongs to. `None` never conflicts.
    pub class_id: Option<String>,
}

impl Student {
    /// Creates a student without a class.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            class_id: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the class id.
    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    /// Name if known, else the id.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// The tenant (school) a request acts on behalf of.
///
/// Always passed explicitly; nothing in this crate resolves tenant identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantContext {
    /// School identifier.
    pub school_id: String,
}

impl TenantContext {
    /// Creates a tenant context.
    pub fn new(school_id: impl Into<String>) -> Self {
        Self {
            school_id: school_id.into(),
        }
    }
}
