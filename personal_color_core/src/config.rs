//! Matcher configuration via TOML files.
//!
//! Every key is optional; a missing section falls back to defaults.
//!
//! ```toml
//! [matcher]
//! default_limit = 10
//! max_delta_e = 40.0
//! cache_capacity = 128
//! parallel_threshold = 256
//!
//! [logging]
//! enabled = true
//! directory = "logs"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::matcher::DEFAULT_PARALLEL_THRESHOLD;
use crate::query_cache::DEFAULT_CACHE_CAPACITY;

/// Matcher configuration loaded from a TOML file.
///
/// # Examples
///
/// ```
/// use personal_color_core::MatcherConfig;
///
/// let config = MatcherConfig::load_from_file("config/matcher.toml")
///     .unwrap_or_else(|_| MatcherConfig::default());
///
/// println!("cache capacity: {}", config.cache_capacity);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatcherConfig {
    /// Number of results returned when a query does not set its own limit
    pub default_limit: Option<usize>,
    /// Results with a larger ΔE are dropped when a query does not set its own cutoff
    pub max_delta_e: Option<f64>,
    /// Capacity of the sRGB → Lab query cache
    pub cache_capacity: usize,
    /// Catalogs at least this large are scored in parallel
    pub parallel_threshold: usize,
    pub logging: LoggingConfig,
}

/// JSON-lines audit log settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub directory: PathBuf,
}

impl MatcherConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;

        let matcher = &raw.matcher;
        if let Some(limit) = matcher.default_limit {
            if limit == 0 {
                return Err(ConfigError::Parse("matcher.default_limit must be ≥ 1".into()));
            }
        }
        if let Some(max) = matcher.max_delta_e {
            if !max.is_finite() || max < 0.0 {
                return Err(ConfigError::Parse(
                    "matcher.max_delta_e must be a finite value ≥ 0".into(),
                ));
            }
        }
        if matcher.cache_capacity == 0 {
            return Err(ConfigError::Parse("matcher.cache_capacity must be ≥ 1".into()));
        }
        if raw.logging.directory.trim().is_empty() {
            return Err(ConfigError::Parse("logging.directory must not be empty".into()));
        }

        Ok(Self {
            default_limit: matcher.default_limit,
            max_delta_e: matcher.max_delta_e,
            cache_capacity: matcher.cache_capacity,
            parallel_threshold: matcher.parallel_threshold,
            logging: LoggingConfig {
                enabled: raw.logging.enabled,
                directory: PathBuf::from(&raw.logging.directory),
            },
        })
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            default_limit: None,
            max_delta_e: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            parallel_threshold: default_parallel_threshold(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: PathBuf::from(default_log_directory()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    matcher: RawMatcher,
    #[serde(default)]
    logging: RawLogging,
}

#[derive(Debug, Deserialize)]
struct RawMatcher {
    #[serde(default)]
    default_limit: Option<usize>,
    #[serde(default)]
    max_delta_e: Option<f64>,
    #[serde(default = "default_cache_capacity")]
    cache_capacity: usize,
    #[serde(default = "default_parallel_threshold")]
    parallel_threshold: usize,
}

impl Default for RawMatcher {
    fn default() -> Self {
        Self {
            default_limit: None,
            max_delta_e: None,
            cache_capacity: default_cache_capacity(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawLogging {
    #[serde(default)]
    enabled: bool,
    #[serde(default = "default_log_directory")]
    directory: String,
}

impl Default for RawLogging {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: default_log_directory(),
        }
    }
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

fn default_log_directory() -> String {
    "logs".to_string()
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_sections_missing() {
        let config = MatcherConfig::from_str("").unwrap();
        assert_eq!(config, MatcherConfig::default());
        assert_eq!(config.cache_capacity, 128);
        assert_eq!(config.parallel_threshold, 256);
        assert!(!config.logging.enabled);
    }

    #[test]
    fn parses_custom_values() {
        let toml = r#"
            [matcher]
            default_limit = 5
            max_delta_e = 40.0
            cache_capacity = 8

            [logging]
            enabled = true
            directory = "out/logs"
        "#;
        let config = MatcherConfig::from_str(toml).unwrap();
        assert_eq!(config.default_limit, Some(5));
        assert_eq!(config.max_delta_e, Some(40.0));
        assert_eq!(config.cache_capacity, 8);
        assert!(config.logging.enabled);
        assert_eq!(config.logging.directory, PathBuf::from("out/logs"));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            MatcherConfig::from_str("[matcher]\nmax_delta_e = -1.0"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MatcherConfig::from_str("[matcher]\ncache_capacity = 0"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MatcherConfig::from_str("[matcher]\ndefault_limit = 0"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MatcherConfig::from_str("[matcher\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            MatcherConfig::load_from_file("does/not/exist.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
