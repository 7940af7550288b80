//! User/role persistence with generic repositories.
//!
//! A `User` record with a many-to-many relation to `Role`, stored through
//! SeaORM. Each entity gets the same CRUD capability set from one generic
//! repository, bound to it by an explicit field-to-column mapping.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Persistent records (`User`, `Role`)
//! - **infra**: Database, migrations, mappings and repositories
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Print stored users
//! cargo run -- users list
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{Role, User};
pub use errors::{AppError, AppResult};
pub use infra::{Persistence, Repository, RoleRepository, UserRepository};
