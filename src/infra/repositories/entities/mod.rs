//! SeaORM entity definitions
//!
//! Table and column metadata for the persisted shape. These are
//! storage-specific and kept apart from the domain records.

pub mod role;
pub mod user;
pub mod user_role;
