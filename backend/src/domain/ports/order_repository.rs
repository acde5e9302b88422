//! Port abstraction for order persistence adapters and their errors.
//!
//! Listing operations return newest orders first. Counts use the same filter
//! as the matching listing so pagination figures line up.

use async_trait::async_trait;

use crate::domain::{Order, OrderId, OrderStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "order repository query failed: {message}",
        /// The stored revision no longer matches the one the caller read.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "order revision mismatch: expected {expected}, found {actual}",
        /// The order to update no longer exists.
        Missing { order_id: String } => "order {order_id} not found for update",
    }
}

/// Storage for shipment orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a new order.
    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError>;

    /// Fetch an order by identifier.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError>;

    /// Orders owned by `client_id`.
    async fn list_by_client(
        &self,
        client_id: &UserId,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Every order.
    async fn list_all(&self, limit: u32, offset: u64) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Orders currently in `status`.
    async fn list_by_status(
        &self,
        status: OrderStatus,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Persist `order` if the stored revision still equals `expected_revision`.
    ///
    /// This is a compare-and-swap: a concurrent writer that got there first
    /// causes `RevisionMismatch`.
    async fn update(
        &self,
        order: &Order,
        expected_revision: u32,
    ) -> Result<(), OrderRepositoryError>;

    /// Number of orders owned by `client_id`.
    async fn count_by_client(&self, client_id: &UserId) -> Result<u64, OrderRepositoryError>;

    /// Number of orders overall.
    async fn count_total(&self) -> Result<u64, OrderRepositoryError>;

    /// Number of orders in `status`.
    async fn count_by_status(&self, status: OrderStatus) -> Result<u64, OrderRepositoryError>;
}
