//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client and retry behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Where inputs and outputs live on disk
    #[serde(default)]
    pub paths: PathsConfig,

    /// Fetch windows and cache lifetimes
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Pauses between successive requests to one API
    #[serde(default)]
    pub rate_limits: RateLimitConfig,

    /// Release-calendar driven scheduling
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.max_attempts == 0 {
            return Err(AppError::validation("http.max_attempts must be > 0"));
        }
        if self.fetch.start_year < 1990 {
            return Err(AppError::validation("fetch.start_year must be >= 1990"));
        }
        if self.fetch.bls_chunk_years == 0 {
            return Err(AppError::validation("fetch.bls_chunk_years must be > 0"));
        }
        if chrono::NaiveDate::parse_from_str(&self.fetch.observation_start, "%Y-%m-%d").is_err() {
            return Err(AppError::validation(format!(
                "fetch.observation_start '{}' is not YYYY-MM-DD",
                self.fetch.observation_start
            )));
        }
        if self.paths.data_dir.as_os_str().is_empty() {
            return Err(AppError::validation("paths.data_dir is empty"));
        }
        Ok(())
    }
}

/// HTTP client settings shared by every fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent to every agency
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Attempts per request, including the first
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Backoff unit; attempt `n` waits `n * retry_delay_ms`
    #[serde(default = "defaults::retry_delay")]
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_attempts: defaults::max_attempts(),
            retry_delay_ms: defaults::retry_delay(),
        }
    }
}

/// Filesystem layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Crosswalks, secrets and the release calendar
    #[serde(default = "defaults::config_dir")]
    pub config_dir: PathBuf,

    /// Root of the published JSON tree
    #[serde(default = "defaults::data_dir")]
    pub data_dir: PathBuf,

    /// Flat-file download cache
    #[serde(default = "defaults::raw_dir")]
    pub raw_dir: PathBuf,
}

impl PathsConfig {
    pub fn api_keys(&self) -> PathBuf {
        self.config_dir.join("api_keys.json")
    }

    pub fn calendar(&self) -> PathBuf {
        self.config_dir.join("release_calendar.json")
    }

    pub fn ces_map(&self) -> PathBuf {
        self.config_dir.join("ces_naics_map.json")
    }

    pub fn m3_map(&self) -> PathBuf {
        self.config_dir.join("m3_naics_map.json")
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            config_dir: defaults::config_dir(),
            data_dir: defaults::data_dir(),
            raw_dir: defaults::raw_dir(),
        }
    }
}

/// Fetch windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// First year requested from the Census and BLS APIs
    #[serde(default = "defaults::start_year")]
    pub start_year: i32,

    /// Years per BLS API request (the API caps one call at 20)
    #[serde(default = "defaults::bls_chunk_years")]
    pub bls_chunk_years: i32,

    /// First observation date requested from FRED
    #[serde(default = "defaults::observation_start")]
    pub observation_start: String,

    /// Reuse cached flat files younger than this
    #[serde(default = "defaults::cache_max_age")]
    pub cache_max_age_hours: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            start_year: defaults::start_year(),
            bls_chunk_years: defaults::bls_chunk_years(),
            observation_start: defaults::observation_start(),
            cache_max_age_hours: defaults::cache_max_age(),
        }
    }
}

/// Per-API pauses, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "defaults::census_delay")]
    pub census_ms: u64,
    #[serde(default = "defaults::fred_delay")]
    pub fred_ms: u64,
    #[serde(default = "defaults::bea_delay")]
    pub bea_ms: u64,
    #[serde(default = "defaults::bls_delay")]
    pub bls_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            census_ms: defaults::census_delay(),
            fred_ms: defaults::fred_delay(),
            bea_ms: defaults::bea_delay(),
            bls_ms: defaults::bls_delay(),
        }
    }
}

/// Scheduler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Minutes to wait after an official release time before fetching
    #[serde(default = "defaults::fetch_delay")]
    pub fetch_delay_minutes: i64,

    /// Upcoming releases listed when nothing is due
    #[serde(default = "defaults::upcoming")]
    pub upcoming_count: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fetch_delay_minutes: defaults::fetch_delay(),
            upcoming_count: defaults::upcoming(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // HTTP defaults
    pub fn user_agent() -> String {
        "econdata/0.1 (economic data pipeline)".into()
    }
    pub fn timeout() -> u64 {
        120
    }
    pub fn max_attempts() -> u32 {
        3
    }
    pub fn retry_delay() -> u64 {
        2000
    }

    // Path defaults
    pub fn config_dir() -> PathBuf {
        PathBuf::from("config")
    }
    pub fn data_dir() -> PathBuf {
        PathBuf::from("data/json")
    }
    pub fn raw_dir() -> PathBuf {
        PathBuf::from("data/raw")
    }

    // Fetch defaults
    pub fn start_year() -> i32 {
        2015
    }
    pub fn bls_chunk_years() -> i32 {
        15
    }
    pub fn observation_start() -> String {
        "2000-01-01".into()
    }
    pub fn cache_max_age() -> u64 {
        24
    }

    // Rate limits
    pub fn census_delay() -> u64 {
        500
    }
    pub fn fred_delay() -> u64 {
        600
    }
    pub fn bea_delay() -> u64 {
        8000
    }
    pub fn bls_delay() -> u64 {
        2000
    }

    // Scheduler
    pub fn fetch_delay() -> i64 {
        5
    }
    pub fn upcoming() -> usize {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_attempts() {
        let mut config = Config::default();
        config.http.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_observation_start() {
        let mut config = Config::default();
        config.fetch.observation_start = "01/01/2000".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [http]
            timeout_secs = 30

            [rate_limits]
            bea_ms = 1000
            "#,
        )
        .unwrap();

        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.max_attempts, 3);
        assert_eq!(config.rate_limits.bea_ms, 1000);
        assert_eq!(config.rate_limits.census_ms, 500);
        assert_eq!(config.paths.data_dir, PathBuf::from("data/json"));
        assert_eq!(config.scheduler.fetch_delay_minutes, 5);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config.fetch.start_year, 2015);
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/pipeline.toml");
        let config = Config::load(path).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.rate_limits.bls_ms, 2000);
    }
}
