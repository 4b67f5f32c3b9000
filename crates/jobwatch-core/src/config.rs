//! Configuration management for the job discovery pipeline.
//!
//! Provides TOML-based configuration with platform-specific paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "JOBWATCH_CONFIG";

/// Main application configuration.
///
/// Loaded from `~/.config/jobwatch/config.toml` (or platform equivalent), or
/// from the path in `JOBWATCH_CONFIG`. If the file doesn't exist, default
/// values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Batch scheduling settings
    pub scheduler: SchedulerConfig,
    /// Page fetching settings
    pub fetch: FetchConfig,
    /// AI extraction settings
    pub extraction: ExtractionConfig,
    /// AI backend settings
    pub llm: LlmConfig,
    /// Durable job storage settings
    pub storage: StorageConfig,
    /// Operational HTTP surface settings
    pub server: ServerConfig,
    /// Source registry settings
    pub sources: SourcesConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML or fail validation
    pub fn load() -> ConfigResult<Self> {
        let config_path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => Self::config_path()?,
        };
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file, falling back to defaults if absent.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let config: Self = if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `JOBWATCH_INTERVAL_SECS`: Override the batch interval
    /// - `JOBWATCH_BATCH_SIZE`: Override the number of sources per batch
    /// - `JOBWATCH_BIND`: Override the HTTP bind address
    /// - `JOBWATCH_DATABASE`: Override the database path
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(secs) = lookup("JOBWATCH_INTERVAL_SECS").and_then(|v| v.parse().ok()) {
            self.scheduler.interval_secs = secs;
            tracing::debug!("Override scheduler.interval_secs from env: {}", secs);
        }

        if let Some(size) = lookup("JOBWATCH_BATCH_SIZE").and_then(|v| v.parse().ok()) {
            self.scheduler.batch_size = size;
            tracing::debug!("Override scheduler.batch_size from env: {}", size);
        }

        if let Some(bind) = lookup("JOBWATCH_BIND") {
            tracing::debug!("Override server.bind from env: {}", bind);
            self.server.bind = bind;
        }

        if let Some(path) = lookup("JOBWATCH_DATABASE") {
            tracing::debug!("Override storage.database_path from env: {}", path);
            self.storage.database_path = Some(PathBuf::from(path));
        }
    }

    /// Check value constraints that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scheduler.batch_size == 0 {
            return Err(invalid("scheduler.batch_size", "must be at least 1"));
        }
        if self.scheduler.interval_secs == 0 {
            return Err(invalid("scheduler.interval_secs", "must be at least 1"));
        }
        if self.fetch.max_attempts == 0 {
            return Err(invalid("fetch.max_attempts", "must be at least 1"));
        }
        if self.extraction.max_html_chars == 0 {
            return Err(invalid("extraction.max_html_chars", "must be at least 1"));
        }
        if !(1..=MAX_DEADLINE_DAYS).contains(&self.extraction.default_deadline_days) {
            return Err(invalid(
                "extraction.default_deadline_days",
                "must be between 1 and 3650",
            ));
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses platform base directories: `~/.config/jobwatch/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses platform base directories: `~/.local/share/jobwatch`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    /// Resolve the job database path, defaulting to `<data dir>/jobs.db`.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        match &self.storage.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("jobs.db")),
        }
    }
}

fn project_dirs() -> ConfigResult<ProjectDirs> {
    ProjectDirs::from("org", "jobwatch", "jobwatch").ok_or(ConfigError::NoConfigDir)
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Batch scheduling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between batch starts
    pub interval_secs: u64,
    /// Number of sources processed per batch
    pub batch_size: usize,
    /// Consecutive empty or failed runs before a source is reported degraded
    pub degraded_after: u32,
}

impl SchedulerConfig {
    /// Interval between batches as a `Duration`.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            batch_size: 5,
            degraded_after: 3,
        }
    }
}

/// Page fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
    /// Maximum attempts per URL
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds (doubles per retry)
    pub base_delay_ms: u64,
    /// Whether to check robots.txt before fetching
    pub respect_robots_txt: bool,
    /// User-agent token used when evaluating robots.txt rules
    pub robots_agent: String,
}

impl FetchConfig {
    /// Per-attempt timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base backoff delay as a `Duration`.
    #[must_use]
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_attempts: 3,
            base_delay_ms: 2000,
            respect_robots_txt: true,
            robots_agent: "*".to_string(),
        }
    }
}

/// Upper bound for `extraction.default_deadline_days`.
const MAX_DEADLINE_DAYS: i64 = 3650;

/// AI extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum HTML characters sent to the model
    pub max_html_chars: usize,
    /// Maximum job records kept per source per batch
    pub max_jobs_per_source: usize,
    /// Days from today used when a deadline is missing or unparseable
    pub default_deadline_days: i64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_html_chars: 12_000,
            max_jobs_per_source: 5,
            default_deadline_days: 60,
        }
    }
}

/// AI backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Gemini model name
    pub model: String,
    /// Completion request timeout in seconds
    pub timeout_secs: u64,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// API base URL
    pub base_url: String,
}

impl LlmConfig {
    /// Completion timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 60,
            api_key_env: "GOOGLE_GENERATIVE_AI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

/// Durable job storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file; defaults to `<data dir>/jobs.db`
    pub database_path: Option<PathBuf>,
}

/// Operational HTTP surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Serve the query endpoints
    pub enabled: bool,
    /// Socket address to bind
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Source registry settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// TOML file replacing the built-in source list
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scheduler.interval(), Duration::from_secs(300));
        assert_eq!(config.scheduler.batch_size, 5);
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.fetch.base_delay(), Duration::from_millis(2000));
        assert!(config.fetch.respect_robots_txt);
        assert_eq!(config.extraction.max_jobs_per_source, 5);
        assert_eq!(config.extraction.default_deadline_days, 60);
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[scheduler]"));
        assert!(toml_str.contains("[fetch]"));
        assert!(toml_str.contains("[llm]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.scheduler.batch_size, config.scheduler.batch_size);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.scheduler.batch_size = 3;
        config.fetch.timeout_secs = 10;
        fs::create_dir_all(tmp.path().join("nested")).expect("create config dir");
        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config");

        let loaded = AppConfig::load_from(&config_path).expect("load config");
        assert_eq!(loaded.scheduler.batch_size, 3);
        assert_eq!(loaded.fetch.timeout_secs, 10);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().expect("create temp dir");
        let loaded = AppConfig::load_from(&tmp.path().join("absent.toml")).expect("load config");
        assert_eq!(loaded.scheduler.interval_secs, 300);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[scheduler]
batch_size = 7

[fetch]
respect_robots_txt = false
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.scheduler.batch_size, 7);
        assert!(!config.fetch.respect_robots_txt);
        // These should be defaults
        assert_eq!(config.scheduler.interval_secs, 300);
        assert_eq!(config.fetch.max_attempts, 3);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("JOBWATCH_INTERVAL_SECS", "60"),
            ("JOBWATCH_BATCH_SIZE", "not-a-number"),
            ("JOBWATCH_BIND", "0.0.0.0:8080"),
            ("JOBWATCH_DATABASE", "/tmp/jobs.db"),
        ]);

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.scheduler.interval_secs, 60);
        // Unparseable values are ignored
        assert_eq!(config.scheduler.batch_size, 5);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(
            config.database_path().expect("database path"),
            PathBuf::from("/tmp/jobs.db")
        );
    }

    #[test]
    fn test_validation_rejects_zero_batch() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[scheduler]\nbatch_size = 0\n").expect("write config");

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "scheduler.batch_size"));
    }

    #[test]
    fn test_validation_bounds_default_deadline() {
        let config: AppConfig =
            toml::from_str("[extraction]\ndefault_deadline_days = 100000000\n").expect("parse");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "extraction.default_deadline_days"));

        let mut config = AppConfig::default();
        config.extraction.default_deadline_days = 0;
        assert!(config.validate().is_err());

        config.extraction.default_deadline_days = MAX_DEADLINE_DAYS;
        assert!(config.validate().is_ok());
    }
}
