//! Driving port for order mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AddressParts, AuthenticatedUser, Coordinates, Error, Order, OrderId, OrderStatus, PackageSize,
    UserId,
};

use super::UserPayload;

/// Serializable order view shared by commands and queries.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPayload {
    pub id: OrderId,
    pub client_id: UserId,
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub origin_address: AddressParts,
    pub destination_address: AddressParts,
    pub product_quantity: u32,
    pub total_weight: f64,
    pub package_size: PackageSize,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Owning client, when the use case already had it at hand.
    pub client: Option<UserPayload>,
}

impl From<Order> for OrderPayload {
    fn from(order: Order) -> Self {
        Self {
            id: order.id(),
            client_id: order.client_id().clone(),
            origin: order.origin(),
            destination: order.destination(),
            origin_address: order.origin_address().clone().into(),
            destination_address: order.destination_address().clone().into(),
            product_quantity: order.product_quantity(),
            total_weight: order.total_weight(),
            package_size: order.package_size(),
            status: order.status(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
            client: None,
        }
    }
}

/// New order submitted by a client.
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub client_id: UserId,
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub origin_address: AddressParts,
    pub destination_address: AddressParts,
    pub product_quantity: u32,
    pub total_weight: f64,
}

/// Created order plus the estimated route length.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderResponse {
    pub order: OrderPayload,
    pub estimated_distance_km: Option<f64>,
}

/// Status change requested by `actor`.
#[derive(Debug, Clone)]
pub struct UpdateOrderStatusRequest {
    pub actor: AuthenticatedUser,
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// Order mutations exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCommand: Send + Sync {
    /// Validate and store a new order for an existing client.
    async fn create_order(&self, request: CreateOrderRequest)
    -> Result<CreateOrderResponse, Error>;

    /// Apply a lifecycle transition. Only admins may call this.
    async fn update_status(&self, request: UpdateOrderStatusRequest)
    -> Result<OrderPayload, Error>;
}
