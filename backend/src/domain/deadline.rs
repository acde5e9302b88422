//! Upper bound on how long a use case waits for a driven port.

use std::future::Future;
use std::time::Duration;

use tracing::error;

use super::Error;

/// Default bound applied to persistence calls.
pub const DEFAULT_PERSISTENCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Time budget for a single call to a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Duration);

impl Deadline {
    pub const fn new(budget: Duration) -> Self {
        Self(budget)
    }

    pub const fn budget(self) -> Duration {
        self.0
    }

    /// Await `future`, failing with an internal error once the budget runs
    /// out. `operation` names the call in the log line.
    pub async fn run<F, T>(self, operation: &'static str, future: F) -> Result<T, Error>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout(self.0, future).await.map_err(|_| {
            error!(
                operation,
                budget_ms = u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX),
                "collaborator call timed out"
            );
            Error::internal("internal server error")
        })
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self(DEFAULT_PERSISTENCE_TIMEOUT)
    }
}
