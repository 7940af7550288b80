//! User domain entity.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::role::Role;

/// User account record.
///
/// Every attribute starts out unset. Setters take any value, `None`
/// included, without validation.
///
/// Equality and hashing use only `id`: two users with the same id are the
/// same logical record whatever their other fields hold. Two users that have
/// not been stored yet (both ids `None`) therefore compare equal; use
/// [`User::is_new`] to tell unsaved records apart.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct User {
    id: Option<i64>,
    name: Option<String>,
    #[serde(skip_serializing)]
    password: Option<String>,
    enabled: Option<bool>,
    created_date: Option<NaiveDateTime>,
    last_login: Option<NaiveDateTime>,
    roles: Option<HashSet<Role>>,
}

// Don't expose the password in debug output
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("enabled", &self.enabled)
            .field("created_date", &self.created_date)
            .field("last_login", &self.last_login)
            .field("roles", &self.roles)
            .finish()
    }
}

impl User {
    /// Create a user with no attributes set
    pub fn new() -> Self {
        Self::default()
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

    /// Stored credential, exactly as it was set
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }

    pub fn enabled(&self) -> Option<bool> {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: Option<bool>) {
        self.enabled = enabled;
    }

    pub fn created_date(&self) -> Option<NaiveDateTime> {
        self.created_date
    }

    pub fn set_created_date(&mut self, created_date: Option<NaiveDateTime>) {
        self.created_date = created_date;
    }

    pub fn last_login(&self) -> Option<NaiveDateTime> {
        self.last_login
    }

    pub fn set_last_login(&mut self, last_login: Option<NaiveDateTime>) {
        self.last_login = last_login;
    }

    /// Related roles. `None` means the relation was never set or loaded.
    pub fn roles(&self) -> Option<&HashSet<Role>> {
        self.roles.as_ref()
    }

    pub fn set_roles(&mut self, roles: Option<HashSet<Role>>) {
        self.roles = roles;
    }

    /// True until the store has assigned an id
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
