//! Repository wiring.
//!
//! Builds every store over one shared connection and hands them out behind
//! their repository traits, so callers depend on the abstraction only.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{RoleRepository, RoleStore, UserRepository, UserStore};

/// Access point for all repositories.
#[derive(Clone)]
pub struct Persistence {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl Persistence {
    /// Wire the SeaORM stores over the given connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            roles: Arc::new(RoleStore::new(db)),
        }
    }

    /// Wire explicit implementations (mocks in tests)
    pub fn from_parts(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { users, roles }
    }

    /// Get user repository
    pub fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    /// Get role repository
    pub fn roles(&self) -> Arc<dyn RoleRepository> {
        self.roles.clone()
    }
}
