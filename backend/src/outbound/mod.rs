//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: `RwLock`-guarded repositories used when no database is set
//! - **security**: JWT bearer tokens and Argon2 password digests
//! - **geo**: coordinate validation and great-circle distances
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod geo;
pub mod memory;
pub mod persistence;
pub mod security;
