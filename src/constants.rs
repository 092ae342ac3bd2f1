//! Centralized constants for the whereabouts crate
//!
//! This module consolidates constants used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Approximate kilometers per degree of latitude
    ///
    /// Also the per-degree longitude scale at the equator; longitude
    /// degrees shrink with cos(latitude).
    pub const KM_PER_DEGREE_LAT: f64 = 111.0;
}

/// API endpoints and limits
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Maximum places requested from a viewport-bounded nearby search
    pub const NEARBY_SEARCH_LIMIT: usize = 10;
}
