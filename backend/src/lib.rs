//! Logistics order API: identities, orders and their delivery lifecycle.
//!
//! The crate follows a hexagonal layout. [`domain`] owns the model, the use
//! cases and the ports; [`inbound`] exposes them over HTTP; [`outbound`]
//! implements the driven ports against PostgreSQL, in-memory maps, JWT,
//! Argon2 and a haversine distance model.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::{CorsPolicy, RateLimit, Trace};
