//! Repository layer - Data access abstraction
//!
//! One generic repository ([`Repository`] / [`SeaRepository`]) bound to each
//! entity by a hand-written [`EntityMapping`].

mod base;
pub mod entities;
mod role_repository;
mod user_repository;

pub use base::{EntityMapping, Repository, SeaRepository};
pub use role_repository::{RoleRepository, RoleStore};
pub use user_repository::{UserRepository, UserStore};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use base::MockRepository;
