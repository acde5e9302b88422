//! Driving port for order reads.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{AuthenticatedUser, Error, OrderId, OrderStatus};

use super::OrderPayload;

/// Paged listing scoped by the caller's role.
///
/// Clients always see only their own orders and the status filter is
/// ignored for them. Admins see every order, optionally narrowed to one
/// status.
#[derive(Debug, Clone)]
pub struct ListOrdersRequest {
    pub actor: AuthenticatedUser,
    pub status: Option<OrderStatus>,
    pub page: PageRequest,
}

/// Single order lookup.
#[derive(Debug, Clone)]
pub struct GetOrderRequest {
    pub actor: AuthenticatedUser,
    pub order_id: OrderId,
}

/// Order reads exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// One page of orders visible to the caller.
    async fn list_orders(
        &self,
        request: ListOrdersRequest,
    ) -> Result<Paginated<OrderPayload>, Error>;

    /// One order, if the caller may see it.
    async fn get_order(&self, request: GetOrderRequest) -> Result<OrderPayload, Error>;
}
