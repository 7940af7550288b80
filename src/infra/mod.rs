//! Infrastructure layer - Persistence
//!
//! This module handles all storage concerns:
//! - Database connection and migrations
//! - Table metadata and the record mappings
//! - Repositories and their wiring

pub mod db;
pub mod persistence;
pub mod repositories;

pub use db::{Database, Migrator};
pub use persistence::Persistence;
pub use repositories::{
    EntityMapping, Repository, RoleRepository, RoleStore, SeaRepository, UserRepository,
    UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockRepository;
