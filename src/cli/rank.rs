//! Rank command handler
//!
//! Offline proximity ranking over a JSON file of candidates; no provider
//! traffic involved.

use crate::error::Result;
use crate::geo::Coordinates;
use crate::proximity::find_nearest;
use clap::Args;
use serde::{Deserialize, Serialize};

/// Rank command arguments
#[derive(Args)]
pub struct RankArgs {
    /// JSON file holding an array of candidates with
    /// {"name": ..., "lat": ..., "lon": ...}
    pub file: String,

    /// Origin latitude
    #[arg(long)]
    pub lat: f64,

    /// Origin longitude
    #[arg(long)]
    pub lon: f64,

    /// Drop candidates farther than this many kilometers
    #[arg(long)]
    pub max_km: Option<f64>,

    /// Keep only the nearest N candidates
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// A candidate entity as read from the input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Run the rank command
pub fn run(args: RankArgs) -> Result<()> {
    let origin = Coordinates::new(args.lat, args.lon);
    origin.validate()?;

    let content = std::fs::read_to_string(&args.file)?;
    let candidates: Vec<CandidateRecord> = serde_json::from_str(&content)?;

    let ranked = find_nearest(
        origin,
        candidates,
        |c| match (c.lat, c.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        },
        args.max_km,
        args.limit,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No candidates in range");
        return Ok(());
    }

    for (i, m) in ranked.iter().enumerate() {
        println!("{}. {} [{}]", i + 1, m.entity.name, m.distance_label);
    }
    Ok(())
}
