//! Nominatim geocoding client (OpenStreetMap)
//!
//! The only integration point with the external geocoding provider. The
//! free Nominatim API allows one request per second and rejects anonymous
//! traffic, so every operation goes through a shared [`RequestPacer`] and
//! carries the configured `User-Agent` and `Referer` headers.

use crate::config::GeocoderConfig;
use crate::constants::api::NEARBY_SEARCH_LIMIT;
use crate::error::{Error, Result};
use crate::geo::{bounding_box, BoundingBox, Coordinates};
use crate::geocode::limiter::RequestPacer;
use crate::geocode::{
    AddressFields, EnrichmentResult, GeocodeProvider, GeocodeResult, OsmKind, ProviderError,
    StructuredAddress,
};
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Name reported in `StructuredAddress::source_provider`
pub const PROVIDER_NAME: &str = "nominatim";

/// Rate-limited Nominatim client
///
/// Cloning is cheap and clones share the same request pacer, so every
/// copy draws from one provider budget.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    pacer: Arc<RequestPacer>,
    base_url: String,
    /// Per-call budget covering the pacing wait and the HTTP round trip
    deadline: Option<Duration>,
}

impl NominatimClient {
    /// Build a client from configuration
    ///
    /// Fails when the identification headers are empty or unusable; the
    /// provider rejects requests without `User-Agent` and `Referer`.
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let user_agent = header_value("geocoder.user_agent", &config.user_agent)?;
        let referer = header_value("geocoder.referer", &config.referer)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, user_agent);
        headers.insert(REFERER, referer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            pacer: Arc::new(RequestPacer::new(Duration::from_millis(
                config.min_request_interval_ms,
            ))),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            deadline: None,
        })
    }

    /// A copy of this client whose operations give up after `deadline`
    ///
    /// The budget covers the pacing wait plus the HTTP round trip; expiry
    /// surfaces as [`ProviderError::Cancelled`]. The pacer is shared with
    /// the original, and a call cancelled mid-wait has still consumed its
    /// request slot.
    pub fn with_deadline(&self, deadline: Duration) -> Self {
        let mut client = self.clone();
        client.deadline = Some(deadline);
        client
    }

    /// Number of request slots the shared pacer has handed out
    pub fn request_count(&self) -> u64 {
        self.pacer.request_count()
    }

    /// Resolve coordinates to a structured address
    ///
    /// Coordinates are validated before a request slot is consumed.
    pub async fn reverse(&self, coords: Coordinates) -> EnrichmentResult {
        if let Err(e) = coords.validate() {
            return EnrichmentResult::failure(ProviderError::InvalidInput(e.to_string()));
        }

        match self.bounded(self.fetch_reverse(coords)).await {
            Ok((address, raw)) => EnrichmentResult::found(address, Some(raw)),
            Err(error) => {
                warn!(%error, lat = coords.lat, lon = coords.lon, "reverse geocode failed");
                EnrichmentResult::failure(error)
            }
        }
    }

    /// Forward-geocode a free-text query to its single best match
    pub async fn search(&self, query: &str, country_filter: Option<&str>) -> GeocodeResult {
        let query = query.trim();
        if query.is_empty() {
            return GeocodeResult::miss(ProviderError::InvalidInput(
                "empty geocoding query".to_string(),
            ));
        }

        match self
            .bounded(self.fetch_search(query, country_filter, 1, None))
            .await
        {
            Ok(places) => match places.into_iter().next() {
                Some(place) => place_to_result(place),
                None => GeocodeResult::miss(ProviderError::NoData(format!(
                    "no match for query: {}",
                    query
                ))),
            },
            Err(error) => {
                warn!(%error, query, "forward geocode failed");
                GeocodeResult::miss(error)
            }
        }
    }

    /// Text search constrained to a viewport of `radius_km` around `center`
    ///
    /// Best-effort: provider failures and unusable entries yield an empty
    /// or shorter list, never an error.
    pub async fn search_nearby(
        &self,
        center: Coordinates,
        query: &str,
        radius_km: f64,
    ) -> Vec<GeocodeResult> {
        if let Err(e) = center.validate() {
            warn!(%e, "nearby search skipped");
            return Vec::new();
        }
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let viewport = bounding_box(center, radius_km);
        match self
            .bounded(self.fetch_search(query, None, NEARBY_SEARCH_LIMIT, Some(&viewport)))
            .await
        {
            Ok(places) => places
                .into_iter()
                .map(place_to_result)
                .filter(|r| r.success)
                .collect(),
            Err(error) => {
                warn!(%error, query, "nearby search failed");
                Vec::new()
            }
        }
    }

    /// Geocode many queries, one result per distinct input string
    ///
    /// Sequential by design: every call draws from the same single-quota
    /// pacer, so parallel submission would only reorder the waits. Failed
    /// queries are present in the output with their error attached.
    pub async fn batch_geocode(&self, queries: &[String]) -> HashMap<String, GeocodeResult> {
        let mut results = HashMap::with_capacity(queries.len());
        for query in queries {
            if results.contains_key(query) {
                continue;
            }
            let result = self.search(query, None).await;
            results.insert(query.clone(), result);
        }
        results
    }

    /// Look up a single OSM element by kind and id
    pub async fn lookup_place(&self, kind: OsmKind, id: i64) -> EnrichmentResult {
        match self.bounded(self.fetch_lookup(kind, id)).await {
            Ok((address, raw)) => EnrichmentResult::found(address, Some(raw)),
            Err(error) => {
                warn!(%error, %kind, id, "place lookup failed");
                EnrichmentResult::failure(error)
            }
        }
    }

    /// Apply the per-call deadline, when one is set, to an operation
    async fn bounded<T>(
        &self,
        op: impl std::future::Future<Output = std::result::Result<T, ProviderError>>,
    ) -> std::result::Result<T, ProviderError> {
        match self.deadline {
            Some(limit) => match tokio::time::timeout(limit, op).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Cancelled(format!(
                    "deadline of {}ms exceeded",
                    limit.as_millis()
                ))),
            },
            None => op.await,
        }
    }

    /// Issue a paced GET and return the JSON body
    ///
    /// All provider traffic funnels through here: one pacer slot per
    /// call, transport and status failures classified on the way out.
    async fn paced_get(&self, url: String) -> std::result::Result<Value, ProviderError> {
        self.pacer.acquire().await;

        debug!(%url, "geocoding request");
        let response = self.http.get(&url).send().await.map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::NoData(format!("unreadable provider payload: {}", e)))
    }

    async fn fetch_reverse(
        &self,
        coords: Coordinates,
    ) -> std::result::Result<(StructuredAddress, Value), ProviderError> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1&zoom=18",
            self.base_url, coords.lat, coords.lon
        );

        let raw = self.paced_get(url).await?;
        let body: ReverseResponse = serde_json::from_value(raw.clone())
            .map_err(|e| ProviderError::NoData(format!("malformed reverse payload: {}", e)))?;

        // Nominatim reports "nothing here" as an error field in a 200 body
        if let Some(message) = body.error {
            return Err(ProviderError::NoData(message));
        }

        let (lat, lon) = match (body.lat.as_deref(), body.lon.as_deref()) {
            (Some(lat), Some(lon)) => parse_coords(lat, lon)?,
            _ => {
                return Err(ProviderError::NoData(
                    "reverse response without coordinates".to_string(),
                ))
            }
        };

        let fields = body
            .address
            .map(NominatimAddress::into_fields)
            .unwrap_or_default();
        let address =
            StructuredAddress::from_provider(fields, Coordinates::new(lat, lon), PROVIDER_NAME);
        Ok((address, raw))
    }

    async fn fetch_search(
        &self,
        query: &str,
        country_filter: Option<&str>,
        limit: usize,
        viewport: Option<&BoundingBox>,
    ) -> std::result::Result<Vec<NominatimPlace>, ProviderError> {
        let mut url = format!(
            "{}/search?q={}&format=json&addressdetails=1&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        );
        if let Some(country) = country_filter {
            url.push_str(&format!("&countrycodes={}", urlencoding::encode(country)));
        }
        if let Some(viewport) = viewport {
            url.push_str(&format!("&viewbox={}&bounded=1", viewport.viewbox()));
        }

        let raw = self.paced_get(url).await?;
        serde_json::from_value(raw)
            .map_err(|e| ProviderError::NoData(format!("malformed search payload: {}", e)))
    }

    async fn fetch_lookup(
        &self,
        kind: OsmKind,
        id: i64,
    ) -> std::result::Result<(StructuredAddress, Value), ProviderError> {
        let url = format!(
            "{}/lookup?osm_ids={}{}&format=json&addressdetails=1",
            self.base_url,
            kind.prefix(),
            id
        );

        let raw = self.paced_get(url).await?;
        let places: Vec<NominatimPlace> = serde_json::from_value(raw.clone())
            .map_err(|e| ProviderError::NoData(format!("malformed lookup payload: {}", e)))?;
        let place = places.into_iter().next().ok_or_else(|| {
            ProviderError::NoData(format!("no such place: {}{}", kind.prefix(), id))
        })?;

        let (lat, lon) = parse_coords(&place.lat, &place.lon)?;
        let fields = place
            .address
            .map(NominatimAddress::into_fields)
            .unwrap_or_default();
        let address =
            StructuredAddress::from_provider(fields, Coordinates::new(lat, lon), PROVIDER_NAME);
        Ok((address, raw))
    }
}

impl GeocodeProvider for NominatimClient {
    async fn geocode(&self, query: &str, country_filter: Option<&str>) -> GeocodeResult {
        self.search(query, country_filter).await
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> EnrichmentResult {
        self.reverse(coords).await
    }
}

/// One place in a Nominatim search or lookup response
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
    #[serde(default)]
    importance: Option<f64>,
}

/// Reverse geocoding response
///
/// Nominatim answers "nothing at these coordinates" with HTTP 200 and an
/// `error` field instead of a place, so every field here is optional.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    lat: Option<String>,
    #[serde(default)]
    lon: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

/// Address details object from `addressdetails=1`
///
/// Nominatim files settlement names under different keys depending on
/// place size; `into_fields` collapses them.
#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    #[serde(default)]
    road: Option<String>,
    #[serde(default)]
    house_number: Option<String>,
    #[serde(default)]
    suburb: Option<String>,
    #[serde(default)]
    neighbourhood: Option<String>,
    #[serde(default)]
    quarter: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    municipality: Option<String>,
    #[serde(default)]
    city_district: Option<String>,
    #[serde(default)]
    county: Option<String>,
    #[serde(default)]
    state_district: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    postcode: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
}

impl NominatimAddress {
    fn into_fields(self) -> AddressFields {
        AddressFields {
            road: self.road,
            house_number: self.house_number,
            suburb: self.suburb.or(self.neighbourhood).or(self.quarter),
            city: self.city.or(self.town).or(self.village).or(self.municipality),
            district: self.city_district.or(self.county).or(self.state_district),
            region: self.state.or(self.region),
            postcode: self.postcode,
            country: self.country,
            country_code: self.country_code,
        }
    }
}

/// Convert a parsed place into a geocode outcome
fn place_to_result(place: NominatimPlace) -> GeocodeResult {
    match parse_coords(&place.lat, &place.lon) {
        Ok((lat, lon)) => GeocodeResult::hit(
            Coordinates::new(lat, lon),
            place.display_name,
            place.address.map(NominatimAddress::into_fields),
            place.importance.map(|i| i.clamp(0.0, 1.0)),
        ),
        Err(error) => GeocodeResult::miss(error),
    }
}

/// Parse the provider's string-typed lat/lon pair
fn parse_coords(lat: &str, lon: &str) -> std::result::Result<(f64, f64), ProviderError> {
    let lat: f64 = lat
        .parse()
        .map_err(|_| ProviderError::NoData(format!("invalid latitude in response: {}", lat)))?;
    let lon: f64 = lon
        .parse()
        .map_err(|_| ProviderError::NoData(format!("invalid longitude in response: {}", lon)))?;
    Ok((lat, lon))
}

/// Map a transport-level failure (timeout, DNS, reset) to the taxonomy
fn classify_transport(error: reqwest::Error) -> ProviderError {
    ProviderError::Network(error.to_string())
}

/// Map an HTTP status to the taxonomy
fn classify_status(status: StatusCode) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            ProviderError::RateLimited("provider returned 429; slow down before retrying".to_string())
        }
        StatusCode::FORBIDDEN => ProviderError::Forbidden(
            "provider returned 403; check the User-Agent and Referer configuration".to_string(),
        ),
        StatusCode::NOT_FOUND => ProviderError::NoData("provider returned 404".to_string()),
        _ => ProviderError::Unknown(format!("provider returned status {}", status)),
    }
}

fn header_value(key: &str, raw: &str) -> Result<HeaderValue> {
    if raw.trim().is_empty() {
        return Err(Error::Config(format!("{} must not be empty", key)));
    }
    HeaderValue::from_str(raw)
        .map_err(|e| Error::Config(format!("{} is not a valid header value: {}", key, e)))
}
