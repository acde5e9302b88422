//! Offline coordinate service using the haversine great-circle formula.

use async_trait::async_trait;

use crate::domain::Coordinates;
use crate::domain::ports::{CoordinateError, CoordinateService};

/// Mean Earth radius used for distance estimates.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Validates ranges locally and measures distance on a spherical Earth.
#[derive(Debug, Default, Clone, Copy)]
pub struct HaversineCoordinateService;

impl HaversineCoordinateService {
    pub fn new() -> Self {
        Self
    }
}

fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

#[async_trait]
impl CoordinateService for HaversineCoordinateService {
    async fn validate(&self, point: Coordinates) -> Result<(), CoordinateError> {
        point
            .validate()
            .map_err(|err| CoordinateError::invalid(err.to_string()))
    }

    async fn distance_km(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> Result<f64, CoordinateError> {
        self.validate(from).await?;
        self.validate(to).await?;
        Ok(haversine_km(from, to))
    }
}
