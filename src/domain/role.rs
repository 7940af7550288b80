//! Role domain entity.

use serde::{Deserialize, Serialize};

/// Role a user can hold.
///
/// Compared by value: roles are collected into a `HashSet` on the user side,
/// and two distinct unsaved roles must not collapse into one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    id: Option<i64>,
    name: Option<String>,
}

impl Role {
    /// Create a role with no attributes set
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a role that has not been stored yet
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// True until the store has assigned an id
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}
