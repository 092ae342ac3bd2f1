//! Location enrichment
//!
//! Turns whatever partial location input a caller has (a digital address
//! code, maybe coordinates, maybe a landmark) into the richest structured
//! address the provider can produce. When every strategy misses, the
//! result degrades to an unverified address built from the caller's own
//! fields; profile creation is never blocked on a flaky third party.

use crate::geo::Coordinates;
use crate::geocode::{EnrichmentResult, GeocodeProvider, StructuredAddress};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Caller-supplied location input for enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRequest {
    /// Location code in the marketplace's home region (e.g. a GhanaPostGPS
    /// digital address like "GA-183-8164"); treated as an opaque geocoding
    /// query
    pub postal_code: String,

    /// Claimed coordinates, when the caller has them
    #[serde(default)]
    pub coordinates: Option<Coordinates>,

    /// Free-text nearby landmark, when the caller supplied one
    #[serde(default)]
    pub landmark: Option<String>,
}

/// Enrichment strategies in the order they are attempted
///
/// Each strategy has a precondition on the request and an attempt that
/// can miss; the enricher walks the list and stops at the first hit. New
/// strategies slot into `ALL` without touching the control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// Reverse-geocode the caller's claimed coordinates
    ReverseFromCoords,
    /// Geocode the postal code, then reverse the matched point for the
    /// full address fields
    PostalCodeThenReverse,
    /// Geocode "<landmark>, <country>", then reverse the matched point
    LandmarkThenReverse,
}

impl Strategy {
    const ALL: [Strategy; 3] = [
        Strategy::ReverseFromCoords,
        Strategy::PostalCodeThenReverse,
        Strategy::LandmarkThenReverse,
    ];
}

/// Runs the enrichment waterfall against a geocoding provider
#[derive(Debug, Clone)]
pub struct LocationEnricher<P> {
    provider: P,
    /// ISO country code used to filter forward geocodes
    country_code: String,
    /// Country name appended to landmark queries
    country: String,
}

impl<P: GeocodeProvider> LocationEnricher<P> {
    /// Create an enricher for the marketplace's home country
    pub fn new(provider: P, country_code: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            provider,
            country_code: country_code.into(),
            country: country.into(),
        }
    }

    /// Produce the richest address the provider allows for this input
    ///
    /// Strategies run in a fixed order and the first hit wins. This never
    /// fails outright: when everything misses, the result still has
    /// `success = true` and carries an unverified address assembled from
    /// the caller's own fields.
    pub async fn enrich(&self, request: &EnrichmentRequest) -> EnrichmentResult {
        for strategy in Strategy::ALL {
            if let Some(result) = self.attempt(strategy, request).await {
                debug!(?strategy, "enrichment strategy succeeded");
                return result;
            }
        }

        debug!(
            postal_code = %request.postal_code,
            "all enrichment strategies missed, returning unverified address"
        );
        EnrichmentResult::found(
            StructuredAddress::unverified(
                request.postal_code.clone(),
                request.landmark.clone(),
                request.coordinates,
            ),
            None,
        )
    }

    /// Run one strategy; `None` means precondition unmet or provider miss
    async fn attempt(
        &self,
        strategy: Strategy,
        request: &EnrichmentRequest,
    ) -> Option<EnrichmentResult> {
        match strategy {
            Strategy::ReverseFromCoords => {
                let coords = request.coordinates?;
                if coords.validate().is_err() {
                    debug!(lat = coords.lat, lon = coords.lon, "skipping invalid claimed coordinates");
                    return None;
                }
                let result = self.provider.reverse_geocode(coords).await;
                stamped(result, request)
            }
            Strategy::PostalCodeThenReverse => {
                if request.postal_code.trim().is_empty() {
                    return None;
                }
                self.geocode_then_reverse(&request.postal_code, request).await
            }
            Strategy::LandmarkThenReverse => {
                let landmark = request.landmark.as_deref()?;
                let query = format!("{}, {}", landmark, self.country);
                self.geocode_then_reverse(&query, request).await
            }
        }
    }

    /// Forward-geocode `query`, then reverse the matched point
    ///
    /// Forward geocoding alone yields little more than a display label;
    /// the follow-up reverse call is what produces structured fields.
    async fn geocode_then_reverse(
        &self,
        query: &str,
        request: &EnrichmentRequest,
    ) -> Option<EnrichmentResult> {
        let hit = self
            .provider
            .geocode(query, Some(self.country_code.as_str()))
            .await;
        if !hit.success {
            return None;
        }

        let coords = hit.coordinates?;
        let result = self.provider.reverse_geocode(coords).await;
        stamped(result, request)
    }
}

/// Overlay caller-supplied fields on a successful reverse result
///
/// The provider knows nothing about the marketplace's location codes or
/// landmark hints, so a hit keeps the caller's values for those.
fn stamped(mut result: EnrichmentResult, request: &EnrichmentRequest) -> Option<EnrichmentResult> {
    if !result.success {
        return None;
    }

    if let Some(address) = result.address.as_mut() {
        address.postal_code = request.postal_code.clone();
        address.nearby_landmark = request.landmark.clone();
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::{AddressFields, GeocodeResult, ProviderError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const OSU: Coordinates = Coordinates {
        lat: 5.5560,
        lon: -0.1820,
    };
    const POSTAL_POINT: Coordinates = Coordinates {
        lat: 5.6500,
        lon: -0.1000,
    };
    const LANDMARK_POINT: Coordinates = Coordinates {
        lat: 5.5900,
        lon: -0.1500,
    };

    /// Offline provider scripted per test: forward geocoding matches
    /// query substrings, reverse geocoding resolves listed points only
    #[derive(Default)]
    struct ScriptedProvider {
        forward: Vec<(&'static str, Coordinates)>,
        reverse: Vec<Coordinates>,
        geocode_calls: AtomicUsize,
        reverse_calls: AtomicUsize,
        seen_queries: Mutex<Vec<String>>,
    }

    impl GeocodeProvider for ScriptedProvider {
        async fn geocode(&self, query: &str, _country_filter: Option<&str>) -> GeocodeResult {
            self.geocode_calls.fetch_add(1, Ordering::SeqCst);
            self.seen_queries.lock().unwrap().push(query.to_string());

            for (needle, coords) in &self.forward {
                if query.contains(needle) {
                    return GeocodeResult::hit(*coords, query.to_string(), None, Some(0.8));
                }
            }
            GeocodeResult::miss(ProviderError::NoData("not found".to_string()))
        }

        async fn reverse_geocode(&self, coords: Coordinates) -> EnrichmentResult {
            self.reverse_calls.fetch_add(1, Ordering::SeqCst);

            if self.reverse.contains(&coords) {
                let fields = AddressFields {
                    road: Some("Cantonments Road".to_string()),
                    suburb: Some("Osu".to_string()),
                    city: Some("Accra".to_string()),
                    region: Some("Greater Accra Region".to_string()),
                    postcode: Some("GA000".to_string()),
                    ..Default::default()
                };
                EnrichmentResult::found(
                    StructuredAddress::from_provider(fields, coords, "scripted"),
                    None,
                )
            } else {
                EnrichmentResult::failure(ProviderError::NoData("unable to geocode".to_string()))
            }
        }
    }

    fn enricher(provider: ScriptedProvider) -> LocationEnricher<ScriptedProvider> {
        LocationEnricher::new(provider, "gh", "Ghana")
    }

    fn request(coords: Option<Coordinates>, landmark: Option<&str>) -> EnrichmentRequest {
        EnrichmentRequest {
            postal_code: "GA-183-8164".to_string(),
            coordinates: coords,
            landmark: landmark.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_claimed_coordinates_win_without_forward_geocoding() {
        let enricher = enricher(ScriptedProvider {
            reverse: vec![OSU],
            ..Default::default()
        });

        let result = enricher.enrich(&request(Some(OSU), None)).await;
        assert!(result.success);

        let address = result.address.unwrap();
        assert!(address.is_verified);
        assert_eq!(address.city.as_deref(), Some("Accra"));
        assert_eq!(enricher.provider.geocode_calls.load(Ordering::SeqCst), 0);
        assert_eq!(enricher.provider.reverse_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_postal_code_path_when_no_coordinates() {
        let enricher = enricher(ScriptedProvider {
            forward: vec![("GA-183-8164", POSTAL_POINT)],
            reverse: vec![POSTAL_POINT],
            ..Default::default()
        });

        let result = enricher.enrich(&request(None, None)).await;
        assert!(result.success);
        assert_eq!(result.coordinates, Some(POSTAL_POINT));
        assert_eq!(enricher.provider.geocode_calls.load(Ordering::SeqCst), 1);
        assert_eq!(enricher.provider.reverse_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_reverse_falls_through_to_postal_code() {
        // Claimed coordinates do not reverse-resolve; the postal point does
        let enricher = enricher(ScriptedProvider {
            forward: vec![("GA-183-8164", POSTAL_POINT)],
            reverse: vec![POSTAL_POINT],
            ..Default::default()
        });

        let result = enricher.enrich(&request(Some(OSU), None)).await;
        assert!(result.success);
        assert_eq!(result.coordinates, Some(POSTAL_POINT));
        assert_eq!(enricher.provider.reverse_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_landmark_query_carries_the_country_name() {
        let enricher = enricher(ScriptedProvider {
            forward: vec![("Labadi Beach", LANDMARK_POINT)],
            reverse: vec![LANDMARK_POINT],
            ..Default::default()
        });

        let result = enricher.enrich(&request(None, Some("Labadi Beach"))).await;
        assert!(result.success);

        let queries = enricher.provider.seen_queries.lock().unwrap();
        assert!(queries.contains(&"Labadi Beach, Ghana".to_string()));
    }

    #[tokio::test]
    async fn test_unresolvable_input_degrades_to_unverified_success() {
        let enricher = enricher(ScriptedProvider::default());
        let result = enricher
            .enrich(&request(Some(OSU), Some("Danquah Circle")))
            .await;

        // Degraded, not failed
        assert!(result.success);
        assert!(result.error.is_none());

        let address = result.address.unwrap();
        assert!(!address.is_verified);
        assert_eq!(address.postal_code, "GA-183-8164");
        assert_eq!(address.nearby_landmark.as_deref(), Some("Danquah Circle"));
        assert_eq!(address.coordinates, Some(OSU));
    }

    #[tokio::test]
    async fn test_postal_code_alone_unresolvable_still_succeeds() {
        let enricher = enricher(ScriptedProvider::default());
        let result = enricher.enrich(&request(None, None)).await;

        assert!(result.success);
        assert!(result.error.is_none());

        let address = result.address.unwrap();
        assert!(!address.is_verified);
        assert_eq!(address.postal_code, "GA-183-8164");
        assert_eq!(address.coordinates, None);

        // Only the postal-code strategy had its precondition met
        assert_eq!(enricher.provider.geocode_calls.load(Ordering::SeqCst), 1);
        assert_eq!(enricher.provider.reverse_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_caller_fields_stamped_over_provider_values() {
        let enricher = enricher(ScriptedProvider {
            reverse: vec![OSU],
            ..Default::default()
        });

        let result = enricher
            .enrich(&request(Some(OSU), Some("Danquah Circle")))
            .await;
        let address = result.address.unwrap();

        // Provider reported GA000; the caller's code wins
        assert_eq!(address.postal_code, "GA-183-8164");
        assert_eq!(address.nearby_landmark.as_deref(), Some("Danquah Circle"));
    }

    #[tokio::test]
    async fn test_invalid_claimed_coordinates_skip_to_postal_code() {
        let enricher = enricher(ScriptedProvider {
            forward: vec![("GA-183-8164", POSTAL_POINT)],
            reverse: vec![POSTAL_POINT],
            ..Default::default()
        });

        let bad = Coordinates::new(123.0, 456.0);
        let result = enricher.enrich(&request(Some(bad), None)).await;
        assert!(result.success);
        assert_eq!(result.coordinates, Some(POSTAL_POINT));
        // The invalid point never reached the provider
        assert_eq!(enricher.provider.reverse_calls.load(Ordering::SeqCst), 1);
    }
}
