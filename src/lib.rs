//! whereabouts: location enrichment and proximity search
//!
//! The geospatial core of a service-marketplace backend built for markets
//! where a postal code is a GPS-derived digital address rather than a
//! street grid. Four concerns live here:
//!
//! - **Geodesy**: coordinates, haversine distances, bounding boxes
//! - **Geocoding**: a rate-limited OpenStreetMap Nominatim client behind
//!   the [`geocode::GeocodeProvider`] trait
//! - **Enrichment & verification**: turning partial caller input into
//!   structured addresses, and checking claimed coordinates against
//!   postal codes
//! - **Proximity**: pure distance ranking over arbitrary candidate sets
//!
//! Provider failures are values, not panics: operations return outcome
//! structs with a `success` flag and a classified error.
//!
//! ## Quick Start
//!
//! ```rust
//! use whereabouts::geo::Coordinates;
//! use whereabouts::proximity::find_nearest;
//!
//! let origin = Coordinates::new(5.6037, -0.1870); // Accra
//! let shops = vec![
//!     ("Osu bakery", Some(Coordinates::new(5.6100, -0.1800))),
//!     ("Unlocated stall", None),
//! ];
//!
//! let ranked = find_nearest(origin, shops, |shop| shop.1, Some(25.0), Some(10));
//! assert_eq!(ranked.len(), 1);
//! println!("{} is {} away", ranked[0].entity.0, ranked[0].distance_label);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod enrich;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod proximity;
pub mod verify;

// Re-export commonly used types
pub use config::Config;
pub use enrich::{EnrichmentRequest, LocationEnricher};
pub use error::{Error, Result};
pub use geo::{BoundingBox, Coordinates};
pub use geocode::{
    EnrichmentResult, GeocodeProvider, GeocodeResult, NominatimClient, ProviderError,
    StructuredAddress,
};
pub use proximity::{find_nearest, ProximityMatch};
pub use verify::{LocationVerifier, VerificationResult};
