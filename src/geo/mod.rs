//! Coordinate types and geodesic math
//!
//! Pure value types and functions; no I/O or shared state. Distances
//! are great-circle kilometers on a spherical Earth.

pub mod distance;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use distance::{bounding_box, distance_km, format_distance, BoundingBox};

/// Geographic coordinates (latitude, longitude) in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    ///
    /// Non-finite values (NaN, infinities) are rejected as well.
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || self.lat < -90.0 || self.lat > 90.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }

        if !self.lon.is_finite() || self.lon < -180.0 || self.lon > 180.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lon
            )));
        }

        Ok(())
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_new() {
        let coords = Coordinates::new(5.6037, -0.1870);
        assert_eq!(coords.lat, 5.6037);
        assert_eq!(coords.lon, -0.1870);
    }

    #[test]
    fn test_validate_valid_coordinates() {
        assert!(Coordinates::new(5.6037, -0.1870).validate().is_ok());
        assert!(Coordinates::new(90.0, 180.0).validate().is_ok());
        assert!(Coordinates::new(-90.0, -180.0).validate().is_ok());
        assert!(Coordinates::new(0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_validate_latitude_out_of_range() {
        let result = Coordinates::new(91.0, 0.0).validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Latitude"));

        assert!(Coordinates::new(-90.001, 0.0).validate().is_err());
    }

    #[test]
    fn test_validate_longitude_out_of_range() {
        let result = Coordinates::new(0.0, 180.5).validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Longitude"));

        assert!(Coordinates::new(0.0, -200.0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, f64::NAN).validate().is_err());
        assert!(Coordinates::new(f64::INFINITY, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, f64::NEG_INFINITY).validate().is_err());
    }

    #[test]
    fn test_display_format() {
        let coords = Coordinates::new(5.6037, -0.187);
        assert_eq!(coords.to_string(), "5.603700, -0.187000");
    }

    #[test]
    fn test_coordinates_serialization() {
        let coords = Coordinates::new(5.6037, -0.1870);
        let json = serde_json::to_string(&coords).unwrap();
        let parsed: Coordinates = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, coords);
    }
}
