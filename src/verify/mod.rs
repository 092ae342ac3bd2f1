//! Postal code / coordinate claim verification
//!
//! Fraud and typo check for user-submitted locations: geocode the claimed
//! postal code independently, then score the claimed coordinates by their
//! distance from that reference point.

use crate::config::VerifyConfig;
use crate::geo::{distance_km, Coordinates};
use crate::geocode::GeocodeProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of verifying a claimed location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether the claim sits within the acceptance radius of the
    /// reference point
    pub verified: bool,
    /// Distance-derived score in [0, 1]; not comparable to the geocode
    /// match confidence
    pub confidence: f64,
    /// Display label of the geocoded reference point, when one was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_label: Option<String>,
    /// Great-circle distance between claim and reference in kilometers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl VerificationResult {
    /// Negative result for claims with no usable ground truth
    fn unverifiable() -> Self {
        Self {
            verified: false,
            confidence: 0.0,
            reference_label: None,
            distance_km: None,
        }
    }
}

/// Checks claimed coordinates against independently geocoded postal codes
#[derive(Debug, Clone)]
pub struct LocationVerifier<P> {
    provider: P,
    config: VerifyConfig,
    /// ISO country code used to filter the reference geocode
    country_code: String,
}

impl<P: GeocodeProvider> LocationVerifier<P> {
    pub fn new(provider: P, config: VerifyConfig, country_code: impl Into<String>) -> Self {
        Self {
            provider,
            config,
            country_code: country_code.into(),
        }
    }

    /// Verify that `claimed` plausibly matches `postal_code`
    ///
    /// The postal code is geocoded for a reference point; the claim passes
    /// when it lies within `verified_within_km` of it, and confidence
    /// decays linearly from 1.0 at zero distance to 0.0 at
    /// `zero_confidence_km`. A claim that cannot be checked (invalid
    /// coordinates, unresolvable postal code) is a negative result, not
    /// an error.
    pub async fn verify(&self, postal_code: &str, claimed: Coordinates) -> VerificationResult {
        if claimed.validate().is_err() {
            debug!(lat = claimed.lat, lon = claimed.lon, "claimed coordinates invalid");
            return VerificationResult::unverifiable();
        }

        let reference = self
            .provider
            .geocode(postal_code, Some(self.country_code.as_str()))
            .await;
        let reference_coords = match reference.coordinates.filter(|_| reference.success) {
            Some(coords) => coords,
            None => {
                debug!(postal_code, "no reference point for verification");
                return VerificationResult::unverifiable();
            }
        };

        let d = distance_km(claimed, reference_coords);
        let confidence = (1.0 - d / self.config.zero_confidence_km).clamp(0.0, 1.0);

        VerificationResult {
            verified: d < self.config.verified_within_km,
            confidence,
            reference_label: reference.display_label,
            distance_km: Some(d),
        }
    }
}
