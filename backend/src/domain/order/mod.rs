//! Shipment orders and their delivery lifecycle.
//!
//! An [`Order`] is created by a client with status
//! [`OrderStatus::Created`]. Admins then move it through the lifecycle in
//! [`status`]; ownership never changes after creation.

mod location;
mod status;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;

pub use location::{
    Address, AddressParts, AddressValidationError, CoordinateValidationError, Coordinates,
};
pub use status::{InvalidTransition, OrderStatus, UnknownOrderStatus};

/// Heaviest parcel, in kilograms, accepted by the standard service.
pub const MAX_STANDARD_WEIGHT_KG: f64 = 25.0;

/// Largest item count a single order may carry; fits a PostgreSQL `integer`.
pub const MAX_PRODUCT_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Stable order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Parcel size class derived from total weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PackageSize {
    /// Up to 5 kg.
    S,
    /// Up to 15 kg.
    M,
    /// Up to 25 kg.
    L,
}

impl PackageSize {
    /// Size class for `weight_kg`, or `None` above the standard service limit.
    ///
    /// Bounds are inclusive.
    ///
    /// # Examples
    /// ```
    /// use logistics_api::domain::PackageSize;
    ///
    /// assert_eq!(PackageSize::from_weight(5.0), Some(PackageSize::S));
    /// assert_eq!(PackageSize::from_weight(25.0), Some(PackageSize::L));
    /// assert_eq!(PackageSize::from_weight(25.01), None);
    /// ```
    pub fn from_weight(weight_kg: f64) -> Option<Self> {
        if weight_kg <= 5.0 {
            Some(Self::S)
        } else if weight_kg <= 15.0 {
            Some(Self::M)
        } else if weight_kg <= MAX_STANDARD_WEIGHT_KG {
            Some(Self::L)
        } else {
            None
        }
    }

    /// Wire name of the size class.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
        }
    }
}

impl fmt::Display for PackageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(Self::S),
            "M" => Ok(Self::M),
            "L" => Ok(Self::L),
            other => Err(format!("unknown package size: {other}")),
        }
    }
}

/// First rule an order draft broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderValidationError {
    InvalidOrigin(CoordinateValidationError),
    InvalidDestination(CoordinateValidationError),
    QuantityNotPositive,
    QuantityTooLarge,
    WeightNotPositive,
    WeightExceedsServiceLimit,
}

impl fmt::Display for OrderValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOrigin(err) => write!(f, "invalid origin coordinates: {err}"),
            Self::InvalidDestination(err) => write!(f, "invalid destination coordinates: {err}"),
            Self::QuantityNotPositive => write!(f, "product quantity must be greater than 0"),
            Self::QuantityTooLarge => write!(
                f,
                "product quantity must not exceed {MAX_PRODUCT_QUANTITY}"
            ),
            Self::WeightNotPositive => write!(f, "total weight must be greater than 0"),
            Self::WeightExceedsServiceLimit => write!(
                f,
                "weight exceeds standard service limit. Please contact us for special arrangements"
            ),
        }
    }
}

impl std::error::Error for OrderValidationError {}

/// Caller-supplied fields for a new order.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub client_id: UserId,
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub origin_address: Address,
    pub destination_address: Address,
    pub product_quantity: u32,
    pub total_weight: f64,
}

/// Stored representation used by repositories to rehydrate an [`Order`].
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub id: OrderId,
    pub client_id: UserId,
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub origin_address: Address,
    pub destination_address: Address,
    pub product_quantity: u32,
    pub total_weight: f64,
    pub package_size: PackageSize,
    pub status: OrderStatus,
    pub revision: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shipment order.
///
/// ## Invariants
/// - Both coordinate pairs are in range.
/// - `1 <= product_quantity <= MAX_PRODUCT_QUANTITY` and
///   `0 < total_weight <= 25`.
/// - `package_size` always matches `total_weight`.
/// - `status` only changes along [`OrderStatus::can_transition_to`].
/// - `revision` increases by one on every successful status change.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    client_id: UserId,
    origin: Coordinates,
    destination: Coordinates,
    origin_address: Address,
    destination_address: Address,
    product_quantity: u32,
    total_weight: f64,
    package_size: PackageSize,
    status: OrderStatus,
    revision: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Validate a draft and create an order in status `created`.
    ///
    /// Checks run in a fixed order (origin, destination, quantity, weight,
    /// size class) and the first failure is reported.
    pub fn new(draft: OrderDraft, now: DateTime<Utc>) -> Result<Self, OrderValidationError> {
        let OrderDraft {
            client_id,
            origin,
            destination,
            origin_address,
            destination_address,
            product_quantity,
            total_weight,
        } = draft;

        origin
            .validate()
            .map_err(OrderValidationError::InvalidOrigin)?;
        destination
            .validate()
            .map_err(OrderValidationError::InvalidDestination)?;
        if product_quantity == 0 {
            return Err(OrderValidationError::QuantityNotPositive);
        }
        if product_quantity > MAX_PRODUCT_QUANTITY {
            return Err(OrderValidationError::QuantityTooLarge);
        }
        if total_weight.is_nan() || total_weight <= 0.0 {
            return Err(OrderValidationError::WeightNotPositive);
        }
        let package_size = PackageSize::from_weight(total_weight)
            .ok_or(OrderValidationError::WeightExceedsServiceLimit)?;

        Ok(Self {
            id: OrderId::random(),
            client_id,
            origin,
            destination,
            origin_address,
            destination_address,
            product_quantity,
            total_weight,
            package_size,
            status: OrderStatus::Created,
            revision: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate an order previously persisted.
    pub fn restore(record: OrderRecord) -> Self {
        let OrderRecord {
            id,
            client_id,
            origin,
            destination,
            origin_address,
            destination_address,
            product_quantity,
            total_weight,
            package_size,
            status,
            revision,
            created_at,
            updated_at,
        } = record;
        Self {
            id,
            client_id,
            origin,
            destination,
            origin_address,
            destination_address,
            product_quantity,
            total_weight,
            package_size,
            status,
            revision,
            created_at,
            updated_at,
        }
    }

    /// Move to `next` if the lifecycle allows it.
    ///
    /// On failure the order is left exactly as it was.
    pub fn update_status(
        &mut self,
        next: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<(), InvalidTransition> {
        if !self.status.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = now;
        self.revision = self.revision.saturating_add(1);
        Ok(())
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn client_id(&self) -> &UserId {
        &self.client_id
    }

    pub fn origin(&self) -> Coordinates {
        self.origin
    }

    pub fn destination(&self) -> Coordinates {
        self.destination
    }

    pub fn origin_address(&self) -> &Address {
        &self.origin_address
    }

    pub fn destination_address(&self) -> &Address {
        &self.destination_address
    }

    pub fn product_quantity(&self) -> u32 {
        self.product_quantity
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn package_size(&self) -> PackageSize {
        self.package_size
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Optimistic concurrency counter.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests;
