use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::shared::constants::EARTH_RADIUS_KM;

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("Latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),
}

impl From<GeoError> for AppError {
    fn from(e: GeoError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Validated constructor for coordinates that come from user input
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Unchecked constructor for coordinates already stored in the database
    pub const fn from_stored(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(*self, *other)
    }
}

/// Great-circle distance between two points in kilometers (Haversine formula).
///
/// NaN inputs propagate to a NaN result.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const TUNIS: GeoPoint = GeoPoint::from_stored(36.8065, 10.1815);
    const SFAX: GeoPoint = GeoPoint::from_stored(34.7406, 10.7603);

    #[test]
    fn test_identical_points_are_zero_km_apart() {
        assert_eq!(haversine_km(TUNIS, TUNIS), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        assert_eq!(haversine_km(TUNIS, SFAX), haversine_km(SFAX, TUNIS));
    }

    #[test]
    fn test_known_distance() {
        // Tunis to Sfax is roughly 235 km as the crow flies
        let d = haversine_km(TUNIS, SFAX);
        assert!(d > 225.0 && d < 245.0, "got {d}");
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine_km(GeoPoint::from_stored(0.0, 0.0), GeoPoint::from_stored(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_nan_propagates() {
        let d = haversine_km(GeoPoint::from_stored(f64::NAN, 0.0), TUNIS);
        assert!(d.is_nan());
    }

    #[test]
    fn test_boundary_coordinates_are_valid() {
        tokio_test::assert_ok!(GeoPoint::new(90.0, 180.0));
        tokio_test::assert_ok!(GeoPoint::new(-90.0, -180.0));
        tokio_test::assert_err!(GeoPoint::new(0.0, f64::INFINITY));
    }

    #[test]
    fn test_point_validation() {
        assert!(GeoPoint::new(36.8, 10.1).is_ok());
        assert_eq!(
            GeoPoint::new(91.0, 0.0),
            Err(GeoError::InvalidLatitude(91.0))
        );
        assert_eq!(
            GeoPoint::new(0.0, -180.5),
            Err(GeoError::InvalidLongitude(-180.5))
        );
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }
}
