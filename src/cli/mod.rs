//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `migrate` - Database migrations
//! - `users` / `roles` - Record inspection
//! - `stats` - Record counts

pub mod args;

pub use args::{Cli, Commands};
