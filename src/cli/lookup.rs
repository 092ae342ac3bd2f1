//! Place lookup command handler

use crate::cli::build_client;
use crate::cli::reverse::print_address;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geocode::OsmKind;
use clap::Args;
use std::str::FromStr;

/// Lookup command arguments
#[derive(Args)]
pub struct LookupArgs {
    /// OSM element kind: node, way, or relation
    pub kind: String,

    /// OSM element id
    pub id: i64,

    /// Give up after this many milliseconds
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the lookup command
pub async fn run(args: LookupArgs) -> Result<()> {
    let kind = OsmKind::from_str(&args.kind).map_err(Error::Config)?;

    let config = Config::load()?;
    let client = build_client(&config, args.deadline_ms)?;

    let result = client.lookup_place(kind, args.id).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match (&result.address, &result.error) {
        (Some(address), _) => {
            println!("{}{}", kind.prefix(), args.id);
            print_address(address);
        }
        (None, Some(error)) => {
            eprintln!("Error: {}", error);
            std::process::exit(1);
        }
        (None, None) => println!("No such place"),
    }
    Ok(())
}
