//! In-process adapters used when no database is configured.
//!
//! Each repository keeps its records in a `RwLock`-guarded map and honours
//! the same contracts as the PostgreSQL adapters: unique emails, newest-first
//! listings and revision-checked order updates. State lives for the lifetime
//! of the process only.

mod order_repository;
mod user_repository;

use async_trait::async_trait;

use crate::domain::ports::{PersistenceProbe, ProbeError};

pub use order_repository::InMemoryOrderRepository;
pub use user_repository::InMemoryUserRepository;

/// Probe for the in-memory store, which is always reachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryPersistenceProbe;

#[async_trait]
impl PersistenceProbe for InMemoryPersistenceProbe {
    async fn ping(&self) -> Result<(), ProbeError> {
        Ok(())
    }
}
