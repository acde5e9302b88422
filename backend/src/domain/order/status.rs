//! Order status lifecycle.
//!
//! ```text
//! created ──► collected ──► at_station ──► in_route ──► delivered
//!    │            │              │             │
//!    └────────────┴──────────────┴─────────────┴──────► cancelled
//! ```
//!
//! `delivered` and `cancelled` are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Delivery lifecycle stage of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Created,
    Collected,
    AtStation,
    InRoute,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Created,
        Self::Collected,
        Self::AtStation,
        Self::InRoute,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Statuses reachable in one step from `self`.
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Created => &[Self::Collected, Self::Cancelled],
            Self::Collected => &[Self::AtStation, Self::Cancelled],
            Self::AtStation => &[Self::InRoute, Self::Cancelled],
            Self::InRoute => &[Self::Delivered, Self::Cancelled],
            Self::Delivered | Self::Cancelled => &[],
        }
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    ///
    /// # Examples
    /// ```
    /// use logistics_api::domain::OrderStatus;
    ///
    /// assert!(OrderStatus::Created.can_transition_to(OrderStatus::Collected));
    /// assert!(!OrderStatus::Created.can_transition_to(OrderStatus::Delivered));
    /// ```
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// No further transitions exist.
    pub const fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Collected => "collected",
            Self::AtStation => "at_station",
            Self::InRoute => "in_route",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a status string names no known stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownOrderStatus(s.to_owned()))
    }
}

/// Rejected status change. The order it was attempted on is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid status transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}
