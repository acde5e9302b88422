//! Readiness probe that round-trips `SELECT 1` through the pool.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PersistenceProbe, ProbeError};

use super::pool::DbPool;

/// Diesel-backed implementation of the `PersistenceProbe` port.
#[derive(Clone)]
pub struct DieselPersistenceProbe {
    pool: DbPool,
}

impl DieselPersistenceProbe {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersistenceProbe for DieselPersistenceProbe {
    async fn ping(&self) -> Result<(), ProbeError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProbeError::unavailable(err.into_message()))?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| ProbeError::unavailable(err.to_string()))
    }
}
