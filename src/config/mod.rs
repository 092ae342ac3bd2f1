//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/whereabouts/config.toml

pub mod defaults;

use crate::constants::api::NOMINATIM_URL;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Geocoding provider settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Location verification thresholds
    #[serde(default)]
    pub verify: VerifyConfig,
}

/// Geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Provider base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Client identifier sent as the User-Agent header; the provider
    /// rejects anonymous traffic
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Contact or application URL sent as the Referer header
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Home country ISO code used to filter forward geocodes
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Home country name appended to landmark queries
    #[serde(default = "default_country")]
    pub country: String,

    /// Minimum interval between outgoing provider requests
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Location verification thresholds
///
/// Product tuning values, not engineering constants; adjust per market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Claims within this many kilometers of the reference point pass
    #[serde(default = "default_verified_within_km")]
    pub verified_within_km: f64,

    /// Distance at which verification confidence decays to zero
    #[serde(default = "default_zero_confidence_km")]
    pub zero_confidence_km: f64,
}

fn default_base_url() -> String {
    NOMINATIM_URL.to_string()
}

fn default_user_agent() -> String {
    defaults::DEFAULT_USER_AGENT.to_string()
}

fn default_referer() -> String {
    defaults::DEFAULT_REFERER.to_string()
}

fn default_country_code() -> String {
    defaults::DEFAULT_COUNTRY_CODE.to_string()
}

fn default_country() -> String {
    defaults::DEFAULT_COUNTRY.to_string()
}

fn default_min_request_interval_ms() -> u64 {
    defaults::DEFAULT_MIN_REQUEST_INTERVAL_MS
}

fn default_request_timeout_secs() -> u64 {
    defaults::DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_verified_within_km() -> f64 {
    defaults::DEFAULT_VERIFIED_WITHIN_KM
}

fn default_zero_confidence_km() -> f64 {
    defaults::DEFAULT_ZERO_CONFIDENCE_KM
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoder: GeocoderConfig::default(),
            verify: VerifyConfig::default(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            referer: default_referer(),
            country_code: default_country_code(),
            country: default_country(),
            min_request_interval_ms: default_min_request_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            verified_within_km: default_verified_within_km(),
            zero_confidence_km: default_zero_confidence_km(),
        }
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("whereabouts"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk, or return defaults if no file exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(Self::config_path()?, content)?;
        Ok(())
    }

    /// Get a configuration value by dot-separated key path
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "geocoder.base_url" => Ok(self.geocoder.base_url.clone()),
            "geocoder.user_agent" => Ok(self.geocoder.user_agent.clone()),
            "geocoder.referer" => Ok(self.geocoder.referer.clone()),
            "geocoder.country_code" => Ok(self.geocoder.country_code.clone()),
            "geocoder.country" => Ok(self.geocoder.country.clone()),
            "geocoder.min_request_interval_ms" => {
                Ok(self.geocoder.min_request_interval_ms.to_string())
            }
            "geocoder.request_timeout_secs" => Ok(self.geocoder.request_timeout_secs.to_string()),
            "verify.verified_within_km" => Ok(self.verify.verified_within_km.to_string()),
            "verify.zero_confidence_km" => Ok(self.verify.zero_confidence_km.to_string()),
            _ => Err(Error::Config(format!("Unknown config key: {}", key))),
        }
    }

    /// Set a configuration value by dot-separated key path
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "geocoder.base_url" => self.geocoder.base_url = value.to_string(),
            "geocoder.user_agent" => self.geocoder.user_agent = value.to_string(),
            "geocoder.referer" => self.geocoder.referer = value.to_string(),
            "geocoder.country_code" => self.geocoder.country_code = value.to_lowercase(),
            "geocoder.country" => self.geocoder.country = value.to_string(),
            "geocoder.min_request_interval_ms" => {
                self.geocoder.min_request_interval_ms = parse_number(key, value)?;
            }
            "geocoder.request_timeout_secs" => {
                self.geocoder.request_timeout_secs = parse_number(key, value)?;
            }
            "verify.verified_within_km" => {
                self.verify.verified_within_km = parse_positive_km(key, value)?;
            }
            "verify.zero_confidence_km" => {
                self.verify.zero_confidence_km = parse_positive_km(key, value)?;
            }
            _ => return Err(Error::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }

    /// List all available configuration keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "geocoder.base_url",
            "geocoder.user_agent",
            "geocoder.referer",
            "geocoder.country_code",
            "geocoder.country",
            "geocoder.min_request_interval_ms",
            "geocoder.request_timeout_secs",
            "verify.verified_within_km",
            "verify.zero_confidence_km",
        ]
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

fn parse_positive_km(key: &str, value: &str) -> Result<f64> {
    let km: f64 = value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))?;
    if !km.is_finite() || km <= 0.0 {
        return Err(Error::Config(format!(
            "Value for {} must be a positive distance in km: {}",
            key, value
        )));
    }
    Ok(km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Serializes the tests that redirect XDG_CONFIG_HOME
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_temp_config<F, T>(f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        let result = f();
        std::env::remove_var("XDG_CONFIG_HOME");
        result
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.geocoder.base_url, NOMINATIM_URL);
        assert_eq!(config.geocoder.country_code, "gh");
        assert_eq!(config.geocoder.country, "Ghana");
        assert_eq!(config.geocoder.min_request_interval_ms, 1500);
        assert_eq!(config.verify.verified_within_km, 0.5);
        assert_eq!(config.verify.zero_confidence_km, 5.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[geocoder]"));
        assert!(toml_str.contains("[verify]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.geocoder.base_url, config.geocoder.base_url);
        assert_eq!(
            parsed.verify.verified_within_km,
            config.verify.verified_within_km
        );
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("[geocoder]\ncountry_code = \"ng\"\n").unwrap();
        assert_eq!(parsed.geocoder.country_code, "ng");
        assert_eq!(parsed.geocoder.base_url, NOMINATIM_URL);
        assert_eq!(parsed.verify.zero_confidence_km, 5.0);
    }

    #[test]
    fn test_get_known_keys() {
        let config = Config::default();
        assert_eq!(config.get("geocoder.country_code").unwrap(), "gh");
        assert_eq!(config.get("verify.verified_within_km").unwrap(), "0.5");
    }

    #[test]
    fn test_get_unknown_key() {
        let config = Config::default();
        assert!(config.get("geocoder.nope").is_err());
    }

    #[test]
    fn test_every_available_key_is_readable() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_ok(), "key {} not readable", key);
        }
    }

    #[test]
    fn test_set_values() {
        let mut config = Config::default();

        config.set("geocoder.country_code", "NG").unwrap();
        assert_eq!(config.geocoder.country_code, "ng");

        config.set("geocoder.min_request_interval_ms", "2000").unwrap();
        assert_eq!(config.geocoder.min_request_interval_ms, 2000);

        config.set("verify.verified_within_km", "1.5").unwrap();
        assert_eq!(config.verify.verified_within_km, 1.5);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("geocoder.min_request_interval_ms", "soon").is_err());
        assert!(config.set("verify.verified_within_km", "-1").is_err());
        assert!(config.set("verify.zero_confidence_km", "0").is_err());
        assert!(config.set("unknown.key", "x").is_err());
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        with_temp_config(|| {
            let config = Config::load().unwrap();
            assert_eq!(config.geocoder.country_code, "gh");
        });
    }

    #[test]
    fn test_save_and_load() {
        with_temp_config(|| {
            let mut config = Config::default();
            config.set("geocoder.country_code", "ke").unwrap();
            config.set("verify.zero_confidence_km", "8").unwrap();
            config.save().unwrap();

            let loaded = Config::load().unwrap();
            assert_eq!(loaded.geocoder.country_code, "ke");
            assert_eq!(loaded.verify.zero_confidence_km, 8.0);
        });
    }

    #[test]
    fn test_config_path_location() {
        with_temp_config(|| {
            let path = Config::config_path().unwrap();
            assert!(path.ends_with("whereabouts/config.toml"));
        });
    }
}
