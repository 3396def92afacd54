//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::analysis::AnalysisConfig;
use crate::journal::StoreConfig;
use crate::scoring::ScoringConfig;

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "HEALTH_JOURNAL_";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub journal: JournalConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Entries accepted in a single request
    #[serde(default = "default_max_entries")]
    pub max_entries_per_request: usize,

    /// Window used when a request names none
    #[serde(default = "default_timeframe")]
    pub default_timeframe_days: i64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10 MB
}

fn default_max_entries() -> usize {
    10_000
}

fn default_timeframe() -> i64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_body_size: default_max_body_size(),
            max_entries_per_request: default_max_entries(),
            default_timeframe_days: default_timeframe(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Entry store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Keep a JSON snapshot of the journal in `data_dir`
    #[serde(default = "default_persist")]
    pub persist: bool,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("health-journal").to_string_lossy().to_string())
        .unwrap_or_else(|| "./health_journal_data".to_string())
}

fn default_persist() -> bool {
    true
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            persist: default_persist(),
        }
    }
}

impl JournalConfig {
    /// Store configuration this section describes
    pub fn store_config(&self) -> StoreConfig {
        if self.persist {
            StoreConfig::persistent(expand_home(&self.data_dir))
        } else {
            StoreConfig::in_memory()
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Check if the JSON formatter was requested
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("health-journal").join("config.toml")),
            Some(PathBuf::from("/etc/health-journal/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Check the analysis and scoring thresholds and the API limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.scoring
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        crate::analysis::check_timeframe(self.api.default_timeframe_days)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.api.max_entries_per_request == 0 {
            return Err(ConfigError::Invalid(
                "max_entries_per_request must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok());
    }

    /// Apply overrides looked up by key without the prefix
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Journal overrides
        if let Some(data_dir) = lookup("DATA_DIR") {
            self.journal.data_dir = data_dir;
        }
        if let Some(persist) = lookup("PERSIST") {
            self.journal.persist = parse_flag(&persist);
        }

        // API overrides
        if let Some(host) = lookup("API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }
        if let Some(max) = lookup("MAX_ENTRIES") {
            if let Ok(m) = max.parse() {
                self.api.max_entries_per_request = m;
            }
        }

        // Analysis overrides
        if let Some(min) = lookup("MIN_COOCCURRENCES") {
            if let Ok(m) = min.parse() {
                self.analysis.min_cooccurrences = m;
            }
        }

        // Logging overrides
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !(value.eq_ignore_ascii_case("false") || value == "0")
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Health Journal Configuration
#
# Environment variables override these settings:
# - HEALTH_JOURNAL_DATA_DIR
# - HEALTH_JOURNAL_PERSIST
# - HEALTH_JOURNAL_API_HOST
# - HEALTH_JOURNAL_API_PORT
# - HEALTH_JOURNAL_MAX_ENTRIES
# - HEALTH_JOURNAL_MIN_COOCCURRENCES
# - HEALTH_JOURNAL_LOG_LEVEL
# - HEALTH_JOURNAL_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8082

# Allowed CORS origins
cors_origins = ["http://localhost:3000", "http://127.0.0.1:3000"]

# Maximum request body size (bytes)
max_body_size = 10485760

# Maximum number of entries in one request
max_entries_per_request = 10000

# Analysis window when a request does not name one (days)
default_timeframe_days = 30

[journal]
# Directory holding the entries.json snapshot
data_dir = "~/.local/share/health-journal"

# Persist entries to disk; false keeps them in memory only
persist = true

[analysis]
# |slope| in severity/day at or below which a trend is stable
stable_slope = 0.05

# Trend significance: high needs |slope| >= high_slope over high_min_points,
# medium needs |slope| >= medium_slope over medium_min_points
high_slope = 0.3
high_min_points = 5
medium_slope = 0.1
medium_min_points = 3

# Distinct dated observations needed for a trend
min_trend_points = 2

# Entries two symptoms must share before they are correlated
min_cooccurrences = 3

# Correlations below medium_correlation need this many samples to be kept
noise_min_sample = 5

# Correlation significance buckets
high_correlation = 0.7
medium_correlation = 0.4

# |r| a correlation needs to join a pattern
pattern_min_correlation = 0.4

# Severity treated as clinically notable by predictions
notable_severity = 7.0

# Distinct symptoms considered for pairwise correlation
max_correlated_symptoms = 64

[scoring]
# Daily logging target for the frequency factor
expected_entries_per_day = 1.0

# Score change between window halves that counts as a trend
score_trend_threshold = 5.0

# Critical insight: average severity over at least critical_min_entries
critical_average_severity = 7.0
critical_min_entries = 3

# Severity of a single observation that raises a warning
high_severity = 7

# Entries shown on the dashboard
recent_entries_limit = 10

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
