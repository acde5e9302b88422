//! Request middleware.
//!
//! Purpose: define middleware components for request lifecycle concerns:
//! trace correlation with access logging, per-address throttling and
//! cross-origin access for browser clients.

pub mod cors;
pub mod rate_limit;
pub mod trace;

pub use cors::{CorsPolicy, CorsPolicyError};
pub use rate_limit::RateLimit;
pub use trace::Trace;
