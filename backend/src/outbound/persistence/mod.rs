//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user and order repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database failures map to the port error
//!   enums; driver detail is logged, not returned.
//!
//! # Example
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use logistics_api::outbound::persistence::{DbPool, DieselOrderRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/logistics")).await?;
//! let orders = DieselOrderRepository::new(pool);
//! # let _ = orders;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_order_repository;
mod diesel_persistence_probe;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_persistence_probe::DieselPersistenceProbe;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
