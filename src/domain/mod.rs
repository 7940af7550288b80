//! Domain layer - Persistent records
//!
//! Plain data holders with accessors. Mapping to tables lives in
//! `infra::repositories::entities`; these types know nothing about storage.

pub mod role;
pub mod user;

pub use role::Role;
pub use user::User;
