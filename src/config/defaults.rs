//! Default configuration values
//!
//! Named constants for all tunable parameters, referenced by the serde
//! defaults in the config structures.

/// Default client identifier sent as the User-Agent header
pub const DEFAULT_USER_AGENT: &str = "whereabouts/0.1 (location enrichment)";

/// Default contact URL sent as the Referer header
pub const DEFAULT_REFERER: &str = "https://whereabouts.dev";

/// Default home country ISO code used to filter forward geocodes
pub const DEFAULT_COUNTRY_CODE: &str = "gh";

/// Default home country name appended to landmark queries
pub const DEFAULT_COUNTRY: &str = "Ghana";

/// Default minimum interval between provider requests in milliseconds
///
/// The public Nominatim instance allows one request per second; 1500 ms
/// keeps a safety margin.
pub const DEFAULT_MIN_REQUEST_INTERVAL_MS: u64 = 1500;

/// Default per-request HTTP timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Default verification acceptance radius in kilometers
pub const DEFAULT_VERIFIED_WITHIN_KM: f64 = 0.5;

/// Default distance at which verification confidence decays to zero
pub const DEFAULT_ZERO_CONFIDENCE_KM: f64 = 5.0;
