//! Configuration loading and resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (config file path only)
//! 2. Environment variables (`REVERIE_*`)
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! A missing config file is not an error: a warning is logged and defaults
//! are used. A config file that exists but cannot be parsed is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const ENV_CONFIG_PATH: &str = "REVERIE_CONFIG";
/// Environment variable overriding `analysis.api_key`
pub const ENV_API_KEY: &str = "REVERIE_API_KEY";
/// Environment variable overriding `analysis.endpoint`
pub const ENV_ANALYSIS_ENDPOINT: &str = "REVERIE_ANALYSIS_ENDPOINT";
/// Environment variable overriding `logging.level`
pub const ENV_LOG_LEVEL: &str = "REVERIE_LOG_LEVEL";

/// Upper bound for any cache `ttl_hours` (100 years)
pub const MAX_TTL_HOURS: i64 = 24 * 365 * 100;

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Journal analysis settings (optional)
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Practice scenario settings (optional)
    #[serde(default)]
    pub scenarios: ScenarioSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// External analysis service and analysis cache settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSettings {
    /// Chat-completions endpoint; `None` runs the engine offline
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Model name sent to the endpoint
    #[serde(default = "default_model")]
    pub model: String,

    /// API key for the endpoint
    #[serde(default)]
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Jaccard threshold for near-duplicate cache hits
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Maximum cached analyses before FIFO eviction
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Analysis cache time-to-live in hours
    #[serde(default = "default_analysis_ttl_hours")]
    pub ttl_hours: i64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: default_model(),
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            similarity_threshold: default_similarity_threshold(),
            max_entries: default_max_entries(),
            ttl_hours: default_analysis_ttl_hours(),
        }
    }
}

impl AnalysisSettings {
    /// True when both an endpoint and a usable API key are present
    pub fn is_online(&self) -> bool {
        self.endpoint.as_deref().map(is_valid_value).unwrap_or(false)
            && self.api_key.as_deref().map(is_valid_value).unwrap_or(false)
    }
}

/// Practice scenario cache settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioSettings {
    /// Scenario cache time-to-live in hours
    #[serde(default = "default_scenario_ttl_hours")]
    pub ttl_hours: i64,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            ttl_hours: default_scenario_ttl_hours(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_similarity_threshold() -> f64 {
    0.8
}

fn default_max_entries() -> usize {
    100
}

fn default_analysis_ttl_hours() -> i64 {
    24 * 7
}

fn default_scenario_ttl_hours() -> i64 {
    24
}

/// Non-empty, non-whitespace value
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Resolve which config file to read
///
/// **Priority:** CLI argument → `REVERIE_CONFIG` → user config dir → `/etc`
///
/// Returns `None` when no candidate file exists.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
        if is_valid_value(&path) {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config locations
    if let Some(path) = default_config_path() {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/reverie/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Per-user config file location (`<config dir>/reverie/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("reverie").join("config.toml"))
}

/// Parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load configuration with environment overrides applied
///
/// Missing files degrade to defaults with a warning.
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    let mut config = match resolve_config_path(cli_arg) {
        Some(path) if path.exists() => {
            info!(path = %path.display(), "Loading configuration");
            read_toml_config(&path)?
        }
        Some(path) => {
            warn!(path = %path.display(), "Config file not found, using defaults");
            TomlConfig::default()
        }
        None => {
            debug!("No config file found, using defaults");
            TomlConfig::default()
        }
    };

    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Apply `REVERIE_*` environment variables on top of file values
pub fn apply_env_overrides(config: &mut TomlConfig) {
    if let Ok(key) = std::env::var(ENV_API_KEY) {
        if is_valid_value(&key) {
            if config.analysis.api_key.is_some() {
                warn!("API key found in both TOML and environment. Using environment.");
            }
            info!("API key loaded from environment variable");
            config.analysis.api_key = Some(key);
        }
    }

    if let Ok(endpoint) = std::env::var(ENV_ANALYSIS_ENDPOINT) {
        if is_valid_value(&endpoint) {
            config.analysis.endpoint = Some(endpoint);
        }
    }

    if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
        if is_valid_value(&level) {
            config.logging.level = level;
        }
    }
}

/// Reject values the engine cannot run with
pub fn validate(config: &TomlConfig) -> Result<()> {
    let analysis = &config.analysis;
    if !(0.0..=1.0).contains(&analysis.similarity_threshold) {
        return Err(Error::Config(format!(
            "analysis.similarity_threshold must be within 0.0..=1.0 (got {})",
            analysis.similarity_threshold
        )));
    }
    if analysis.max_entries == 0 {
        return Err(Error::Config("analysis.max_entries must be at least 1".to_string()));
    }
    for (section, ttl_hours) in [
        ("analysis", analysis.ttl_hours),
        ("scenarios", config.scenarios.ttl_hours),
    ] {
        if !(1..=MAX_TTL_HOURS).contains(&ttl_hours) {
            return Err(Error::Config(format!(
                "{}.ttl_hours must be within 1..={} (got {})",
                section, MAX_TTL_HOURS, ttl_hours
            )));
        }
    }
    Ok(())
}

/// Write configuration atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, target: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize config failed: {}", e)))?;

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = target.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, target)?;
    Ok(())
}
