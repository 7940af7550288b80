//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// User/role store - inspect and migrate the persisted records
#[derive(Parser, Debug)]
#[command(name = "user-role-store")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database URL (overrides DATABASE_URL from the environment)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run database migrations
    Migrate(MigrateArgs),

    /// Inspect stored users
    Users(UsersArgs),

    /// Inspect stored roles
    Roles(RolesArgs),

    /// Print record counts
    Stats,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the users command
#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// User inspection actions
#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// List all users as JSON
    List,
    /// Show one user as JSON
    Show {
        /// User id
        id: i64,
    },
}

/// Arguments for the roles command
#[derive(Parser, Debug)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub action: RolesAction,
}

/// Role inspection actions
#[derive(Subcommand, Debug)]
pub enum RolesAction {
    /// List all roles as JSON
    List,
}
