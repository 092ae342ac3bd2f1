//! Great-circle distance and viewport math
//!
//! Haversine distance, bounding boxes for provider viewport queries,
//! and human-readable distance labels.

use crate::constants::geo::{EARTH_RADIUS_KM, KM_PER_DEGREE_LAT};
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};

/// Great-circle distance between two points in kilometers
///
/// Uses the haversine formula on a spherical Earth. Symmetric in its
/// arguments and zero for identical points.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Float error can push h just past 1.0 near antipodal points
    let h = h.min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// A rectangular latitude/longitude viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Check whether a point lies within the box (inclusive)
    pub fn contains(&self, point: Coordinates) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lon
            && point.lon <= self.max_lon
    }

    /// Render as a Nominatim `viewbox` parameter: `lon1,lat1,lon2,lat2`
    pub fn viewbox(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// Build a bounding box spanning `radius_km` around a center point
///
/// Flat-earth approximation: one degree of latitude is ~111 km, one
/// degree of longitude is ~111 km scaled by cos(latitude). Good enough
/// to bound a provider search viewport; results still need haversine
/// filtering for exact radii.
pub fn bounding_box(center: Coordinates, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE_LAT;

    // Longitude degrees shrink toward the poles; keep the scale positive
    // so a polar center cannot divide by zero
    let km_per_degree_lon = (KM_PER_DEGREE_LAT * center.lat.to_radians().cos().abs()).max(1e-6);
    let lon_delta = radius_km / km_per_degree_lon;

    BoundingBox {
        min_lat: center.lat - lat_delta,
        max_lat: center.lat + lat_delta,
        min_lon: center.lon - lon_delta,
        max_lon: center.lon + lon_delta,
    }
}

/// Format a distance for display: meters below 1 km, otherwise km with
/// one decimal
///
/// Examples: 0.35 -> "350m", 4.21 -> "4.2km"
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m", (km * 1000.0).round() as i64)
    } else {
        format!("{:.1}km", km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Accra city center
    const ACCRA: Coordinates = Coordinates {
        lat: 5.6037,
        lon: -0.1870,
    };

    #[test]
    fn test_distance_zero_for_identical_points() {
        assert_eq!(distance_km(ACCRA, ACCRA), 0.0);
    }

    #[test]
    fn test_distance_symmetry() {
        let kumasi = Coordinates::new(6.6885, -1.6244);
        let there = distance_km(ACCRA, kumasi);
        let back = distance_km(kumasi, ACCRA);
        assert_relative_eq!(there, back, max_relative = 1e-12);
    }

    #[test]
    fn test_one_degree_of_latitude_is_about_111_km() {
        let a = Coordinates::new(5.0, -0.1870);
        let b = Coordinates::new(6.0, -0.1870);
        let d = distance_km(a, b);
        assert!((d - 111.0).abs() < 1.0, "expected ~111 km, got {}", d);
    }

    #[test]
    fn test_known_distance_london_paris() {
        let london = Coordinates::new(51.5074, -0.1278);
        let paris = Coordinates::new(48.8566, 2.3522);
        let d = distance_km(london, paris);
        assert!((d - 344.0).abs() < 5.0, "expected ~344 km, got {}", d);
    }

    #[test]
    fn test_antipodal_points_do_not_produce_nan() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 180.0);
        let d = distance_km(a, b);
        assert!(d.is_finite());
        // Half the Earth's circumference
        assert!((d - 20015.0).abs() < 10.0, "got {}", d);
    }

    #[test]
    fn test_bounding_box_contains_center() {
        let viewport = bounding_box(ACCRA, 5.0);
        assert!(viewport.contains(ACCRA));
    }

    #[test]
    fn test_bounding_box_spans() {
        let viewport = bounding_box(ACCRA, 111.0);
        // 111 km is about one degree of latitude
        assert_relative_eq!(viewport.max_lat - viewport.min_lat, 2.0, max_relative = 1e-9);
        // Longitude span is wider than latitude span away from the equator
        assert!(viewport.max_lon - viewport.min_lon >= 2.0);
    }

    #[test]
    fn test_bounding_box_degenerates_at_zero_radius() {
        let viewport = bounding_box(ACCRA, 0.0);
        assert_eq!(viewport.min_lat, viewport.max_lat);
        assert_eq!(viewport.min_lon, viewport.max_lon);
        assert!(viewport.contains(ACCRA));
    }

    #[test]
    fn test_bounding_box_excludes_distant_point() {
        let viewport = bounding_box(ACCRA, 5.0);
        let kumasi = Coordinates::new(6.6885, -1.6244);
        assert!(!viewport.contains(kumasi));
    }

    #[test]
    fn test_viewbox_parameter_order() {
        let viewport = BoundingBox {
            min_lat: 5.0,
            max_lat: 6.0,
            min_lon: -1.0,
            max_lon: 0.0,
        };
        assert_eq!(viewport.viewbox(), "-1,5,0,6");
    }

    #[test]
    fn test_format_distance_meters_below_one_km() {
        assert_eq!(format_distance(0.0), "0m");
        assert_eq!(format_distance(0.35), "350m");
        assert_eq!(format_distance(0.0354), "35m");
        assert_eq!(format_distance(0.999), "999m");
    }

    #[test]
    fn test_format_distance_km_with_one_decimal() {
        assert_eq!(format_distance(1.0), "1.0km");
        assert_eq!(format_distance(4.21), "4.2km");
        assert_eq!(format_distance(4.9), "4.9km");
        assert_eq!(format_distance(60.04), "60.0km");
    }
}
