//! Geocoding provider integration
//!
//! Defines the outcome models shared by every geocoding operation, the
//! provider failure taxonomy, and the [`GeocodeProvider`] trait that the
//! enrichment and verification layers are generic over. The real
//! implementation is the rate-limited Nominatim client in [`nominatim`];
//! tests inject offline doubles through the trait.

pub mod limiter;
pub mod nominatim;

use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use nominatim::NominatimClient;

/// Source tag for addresses assembled purely from caller input
pub const CALLER_SOURCE: &str = "caller";

/// Classified failure from a geocoding provider
///
/// Public operations return these inside their result values instead of
/// propagating them as hard errors, so callers can branch on the kind
/// without the provider taking the process down.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ProviderError {
    /// HTTP 429: the provider is throttling us; never auto-retried
    #[error("rate limited by provider: {0}")]
    RateLimited(String),

    /// HTTP 403: identification headers missing or rejected
    #[error("provider refused the request: {0}")]
    Forbidden(String),

    /// Transport failure: timeout, DNS, connection reset
    #[error("network failure: {0}")]
    Network(String),

    /// The provider answered but had nothing usable for the query
    #[error("no data: {0}")]
    NoData(String),

    /// A caller-supplied deadline expired before the operation finished
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Caller input rejected before any network traffic
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Anything the classifier could not place
    #[error("unexpected provider response: {0}")]
    Unknown(String),
}

/// Raw address components as reported by the provider
///
/// Every field is optional; an absent component is normal, not an
/// error. This bag is the input for building a [`StructuredAddress`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressFields {
    pub road: Option<String>,
    pub house_number: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub region: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

/// A structured, possibly partial, address for a marketplace entity
///
/// Partially populated fields are legal. `is_verified` is only ever true
/// for addresses confirmed by the provider, and such addresses always
/// carry coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredAddress {
    pub region: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub locality: Option<String>,
    pub street_name: Option<String>,
    pub house_number: Option<String>,
    /// Caller-side location code (e.g. a GhanaPostGPS digital address);
    /// enrichment stamps this from the request, not the provider
    pub postal_code: String,
    pub nearby_landmark: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub is_verified: bool,
    pub source_provider: String,
}

impl StructuredAddress {
    /// Build a provider-confirmed address from raw components
    pub fn from_provider(
        fields: AddressFields,
        coordinates: Coordinates,
        source_provider: &str,
    ) -> Self {
        Self {
            region: fields.region,
            city: fields.city,
            district: fields.district,
            locality: fields.suburb,
            street_name: fields.road,
            house_number: fields.house_number,
            postal_code: fields.postcode.unwrap_or_default(),
            nearby_landmark: None,
            coordinates: Some(coordinates),
            is_verified: true,
            source_provider: source_provider.to_string(),
        }
    }

    /// Address carrying only caller-supplied data; never verified
    pub fn unverified(
        postal_code: String,
        nearby_landmark: Option<String>,
        coordinates: Option<Coordinates>,
    ) -> Self {
        Self {
            postal_code,
            nearby_landmark,
            coordinates,
            is_verified: false,
            source_provider: CALLER_SOURCE.to_string(),
            ..Self::default()
        }
    }
}

/// Outcome of a forward geocode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub success: bool,
    pub coordinates: Option<Coordinates>,
    /// Provider display label for the best match
    pub display_label: Option<String>,
    /// Raw address components, when the provider reported them
    pub address: Option<AddressFields>,
    /// Provider-reported match relevance in [0, 1]; this measures how
    /// well the query matched, not geographic accuracy
    pub confidence: Option<f64>,
    pub error: Option<ProviderError>,
}

impl GeocodeResult {
    /// Successful match
    pub fn hit(
        coordinates: Coordinates,
        display_label: impl Into<String>,
        address: Option<AddressFields>,
        confidence: Option<f64>,
    ) -> Self {
        Self {
            success: true,
            coordinates: Some(coordinates),
            display_label: Some(display_label.into()),
            address,
            confidence,
            error: None,
        }
    }

    /// Failed geocode carrying its classified cause
    pub fn miss(error: ProviderError) -> Self {
        Self {
            success: false,
            coordinates: None,
            display_label: None,
            address: None,
            confidence: None,
            error: Some(error),
        }
    }
}

/// Outcome of reverse geocoding, place lookup, or enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub success: bool,
    pub address: Option<StructuredAddress>,
    pub coordinates: Option<Coordinates>,
    /// Raw provider payload, kept for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<serde_json::Value>,
    pub error: Option<ProviderError>,
}

impl EnrichmentResult {
    /// Successful resolution
    pub fn found(address: StructuredAddress, raw_response: Option<serde_json::Value>) -> Self {
        let coordinates = address.coordinates;
        Self {
            success: true,
            address: Some(address),
            coordinates,
            raw_response,
            error: None,
        }
    }

    /// Failed resolution carrying its classified cause
    pub fn failure(error: ProviderError) -> Self {
        Self {
            success: false,
            address: None,
            coordinates: None,
            raw_response: None,
            error: Some(error),
        }
    }
}

/// The three OpenStreetMap element kinds a place lookup can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsmKind {
    Node,
    Way,
    Relation,
}

impl OsmKind {
    /// One-letter prefix used in the provider's `osm_ids` parameter
    pub fn prefix(&self) -> char {
        match self {
            OsmKind::Node => 'N',
            OsmKind::Way => 'W',
            OsmKind::Relation => 'R',
        }
    }
}

impl std::fmt::Display for OsmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsmKind::Node => write!(f, "node"),
            OsmKind::Way => write!(f, "way"),
            OsmKind::Relation => write!(f, "relation"),
        }
    }
}

impl std::str::FromStr for OsmKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "node" | "n" => Ok(OsmKind::Node),
            "way" | "w" => Ok(OsmKind::Way),
            "relation" | "r" => Ok(OsmKind::Relation),
            _ => Err(format!("Unknown OSM element kind: {}", s)),
        }
    }
}

/// Trait for geocoding providers
///
/// Implementations must be thread-safe (Send + Sync) so a single client
/// can be shared across request handlers. Operations return outcome
/// values rather than errors; see [`ProviderError`].
pub trait GeocodeProvider: Send + Sync {
    /// Forward-geocode a free-text query to its single best match
    ///
    /// `country_filter` restricts matches to an ISO country code.
    fn geocode(
        &self,
        query: &str,
        country_filter: Option<&str>,
    ) -> impl std::future::Future<Output = GeocodeResult> + Send;

    /// Resolve coordinates to a structured address
    fn reverse_geocode(
        &self,
        coords: Coordinates,
    ) -> impl std::future::Future<Output = EnrichmentResult> + Send;
}
