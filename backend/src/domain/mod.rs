//! Domain primitives, aggregates and use cases.
//!
//! Purpose: define the identity and order model, the order lifecycle, the
//! authorization rules and the request throttle independently of any
//! transport or storage. Inbound adapters call the driving ports in
//! [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure with a stable tag.
//! - User, Email, Role, Password: identity model.
//! - Order, OrderStatus, PackageSize, Coordinates, Address: shipment model.
//! - AuthService, OrderService: use-case implementations of the driving ports.
//! - RateLimiter: per-address token buckets.

pub mod auth;
pub mod auth_service;
pub mod deadline;
pub mod error;
pub mod order;
pub mod order_service;
pub mod ports;
pub mod rate_limiter;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    AuthenticatedUser, AuthorizationGate, INVALID_CREDENTIALS, IssuedToken, LoginCredentials,
    LoginValidationError, TokenClaims, bearer_token,
};
pub use self::auth_service::AuthService;
pub use self::deadline::{DEFAULT_PERSISTENCE_TIMEOUT, Deadline};
pub use self::error::{Error, ErrorCode};
pub use self::order::{
    Address, AddressParts, AddressValidationError, CoordinateValidationError, Coordinates,
    InvalidTransition, MAX_PRODUCT_QUANTITY, MAX_STANDARD_WEIGHT_KG, Order, OrderDraft, OrderId,
    OrderRecord, OrderStatus, OrderValidationError, PackageSize, UnknownOrderStatus,
};
pub use self::order_service::OrderService;
pub use self::rate_limiter::{
    DEFAULT_SWEEP_INTERVAL, RateLimitPolicy, RateLimitPolicyError, RateLimiter,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, PASSWORD_MIN_CHARS, Password, PasswordDigest, Role, User, UserId, UserRecord,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use logistics_api::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("forbidden access"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
