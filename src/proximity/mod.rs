//! Proximity ranking over candidate entities
//!
//! Pure distance math: callers fetch their candidate set (providers,
//! clients, listings) elsewhere and hand it in together with a coordinate
//! extractor. No I/O happens here, so ranking works the same over any
//! entity type.

use crate::geo::{distance_km, format_distance, Coordinates};
use serde::{Deserialize, Serialize};

/// A candidate ranked by its distance from the query origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityMatch<T> {
    pub entity: T,
    /// Great-circle distance from the query origin; never negative
    pub distance_km: f64,
    /// Human-readable form of `distance_km` ("350m", "4.2km")
    pub distance_label: String,
}

/// Rank candidates by distance from `origin`, nearest first
///
/// Candidates without a coordinate cannot be ranked and are dropped.
/// The result is sorted ascending by distance with ties keeping their
/// input order, filtered to `max_distance_km` when given (inclusive),
/// and truncated to `limit` when given. Absent bounds mean unbounded.
pub fn find_nearest<T, F>(
    origin: Coordinates,
    candidates: Vec<T>,
    coords_of: F,
    max_distance_km: Option<f64>,
    limit: Option<usize>,
) -> Vec<ProximityMatch<T>>
where
    F: Fn(&T) -> Option<Coordinates>,
{
    let mut matches: Vec<ProximityMatch<T>> = candidates
        .into_iter()
        .filter_map(|entity| {
            let coords = coords_of(&entity)?;
            let distance = distance_km(origin, coords);
            if let Some(max) = max_distance_km {
                if distance > max {
                    return None;
                }
            }
            Some(ProximityMatch {
                distance_label: format_distance(distance),
                distance_km: distance,
                entity,
            })
        })
        .collect();

    matches.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    if let Some(limit) = limit {
        matches.truncate(limit);
    }

    matches
}
