//! Domain ports defining the edges of the hexagon.
//!
//! Driving ports (`*Command`, `*Query`) are what inbound adapters call.
//! Driven ports (repositories, token signing, hashing, geography) are what
//! the domain calls out to. Each driven port exposes strongly typed errors so
//! adapters map their failures into predictable variants.

mod auth_command;
mod coordinate_service;
mod macros;
mod order_command;
mod order_query;
mod order_repository;
mod password_hasher;
mod persistence_probe;
mod token_service;
mod user_repository;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use auth_command::MockAuthCommand;
pub use auth_command::{
    AuthCommand, LoginRequest, RegisterRequest, SessionResponse, UpdatePasswordRequest,
    UserPayload,
};
#[cfg(test)]
pub use coordinate_service::MockCoordinateService;
pub use coordinate_service::{CoordinateError, CoordinateService};
#[cfg(test)]
pub use order_command::MockOrderCommand;
pub use order_command::{
    CreateOrderRequest, CreateOrderResponse, OrderCommand, OrderPayload, UpdateOrderStatusRequest,
};
#[cfg(test)]
pub use order_query::MockOrderQuery;
pub use order_query::{GetOrderRequest, ListOrdersRequest, OrderQuery};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use persistence_probe::MockPersistenceProbe;
pub use persistence_probe::{PersistenceProbe, ProbeError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
