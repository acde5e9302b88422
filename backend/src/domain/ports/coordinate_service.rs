//! Port for geographic checks and distances.

use async_trait::async_trait;

use crate::domain::Coordinates;

use super::define_port_error;

define_port_error! {
    /// Failures raised by coordinate adapters.
    pub enum CoordinateError {
        /// The point is not a valid location.
        Invalid { message: String } => "{message}",
        /// The backing provider could not answer.
        Unavailable { message: String } => "coordinate service unavailable: {message}",
    }
}

/// Geographic collaborator used while creating orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CoordinateService: Send + Sync {
    /// Reject points that are not valid locations.
    async fn validate(&self, point: Coordinates) -> Result<(), CoordinateError>;

    /// Great-circle distance between two points, in kilometres.
    async fn distance_km(&self, from: Coordinates, to: Coordinates)
    -> Result<f64, CoordinateError>;
}
