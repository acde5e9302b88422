//! Geographic adapters for the `CoordinateService` port.

mod haversine;

pub use haversine::{EARTH_RADIUS_KM, HaversineCoordinateService};
