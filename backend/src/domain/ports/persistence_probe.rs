//! Port used by readiness checks to confirm the backing store answers.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failure reported by a readiness probe.
    pub enum ProbeError {
        /// The store did not answer the probe.
        Unavailable { message: String } => "persistence unavailable: {message}",
    }
}

/// Cheap round-trip to the persistence backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersistenceProbe: Send + Sync {
    /// Succeed when the store is reachable.
    async fn ping(&self) -> Result<(), ProbeError>;
}
