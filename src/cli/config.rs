//! Config command handler

use crate::config::Config;
use crate::error::Result;
use clap::{Args, Subcommand};

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Dot-separated key, e.g. "geocoder.country_code"
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Dot-separated key, e.g. "verify.verified_within_km"
        key: String,
        /// New value
        value: String,
    },

    /// List all configuration values
    List,

    /// Show the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        Some(ConfigCommands::Get { key }) => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        Some(ConfigCommands::Set { key, value }) => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("Set {} = {}", key, value);
        }
        Some(ConfigCommands::List) | None => {
            let config = Config::load()?;
            show_all(&config);
        }
        Some(ConfigCommands::Path) => {
            println!("{}", Config::config_path()?.display());
        }
        Some(ConfigCommands::Reset { yes }) => {
            if !yes {
                eprintln!("This will reset all configuration to defaults.");
                eprintln!("Run with --yes to confirm.");
                std::process::exit(1);
            }
            Config::default().save()?;
            println!("Configuration reset to defaults");
        }
    }
    Ok(())
}

fn show_all(config: &Config) {
    println!("[geocoder]");
    println!("base_url = {}", config.geocoder.base_url);
    println!("user_agent = {}", config.geocoder.user_agent);
    println!("referer = {}", config.geocoder.referer);
    println!("country_code = {}", config.geocoder.country_code);
    println!("country = {}", config.geocoder.country);
    println!(
        "min_request_interval_ms = {}",
        config.geocoder.min_request_interval_ms
    );
    println!(
        "request_timeout_secs = {}",
        config.geocoder.request_timeout_secs
    );
    println!();
    println!("[verify]");
    println!("verified_within_km = {}", config.verify.verified_within_km);
    println!("zero_confidence_km = {}", config.verify.zero_confidence_km);
}
