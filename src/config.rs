//! Configuration types for the companion service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::analytics::DEFAULT_WINDOW_DAYS;
use crate::classifier::model::DEFAULT_MIN_MODEL_SCORE;
use crate::interaction::DEFAULT_MAX_RECORDS;
use crate::responder::ResponseTable;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MindMateConfig {
    /// Sentiment classifier settings.
    pub classifier: ClassifierConfig,
    /// HTTP action surface settings.
    pub server: ServerConfig,
    /// Interaction log and analytics settings.
    pub interactions: InteractionConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
    /// Response table. Sections missing from the file keep their defaults.
    pub responses: ResponseTable,
}

/// Which sentiment classifier sits behind the crisis screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierBackend {
    /// Keyword-count rules only.
    #[default]
    Keyword,
    /// Hosted model over HTTP, falling back to keyword rules.
    Http,
}

/// Sentiment classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub backend: ClassifierBackend,
    /// Inference URL for the `http` backend.
    pub model_url: Option<String>,
    /// Bearer token for the `http` backend.
    pub api_token: Option<String>,
    /// Deadline for one model call in milliseconds. On expiry the keyword
    /// rules answer instead.
    pub timeout_ms: u64,
    /// Minimum model score for a positive/negative verdict.
    pub model_min_score: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Keyword,
            model_url: None,
            api_token: None,
            timeout_ms: 1500,
            model_min_score: DEFAULT_MIN_MODEL_SCORE,
        }
    }
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// HTTP action surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind (default `127.0.0.1`).
    pub host: String,
    /// Port to bind (0 = auto-assign).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8787,
        }
    }
}

/// Interaction log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Records kept in memory before the oldest are dropped.
    pub max_records: usize,
    /// Window for `get_analytics`, in days.
    pub analytics_window_days: i64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
            analytics_window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Directory for daily-rotated log files. Stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            log_dir: None,
        }
    }
}

impl MindMateConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::MindMateError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::MindMateError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/mindmate/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("mindmate").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("mindmate")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/mindmate-config/config.toml")
        }
    }

    /// Check settings that can only be judged together.
    ///
    /// # Errors
    ///
    /// Returns [`MindMateError::Config`](crate::error::MindMateError::Config)
    /// for an `http` backend without a URL, a zero timeout, an out-of-range
    /// model score, or an invalid response table.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::MindMateError;

        if self.classifier.backend == ClassifierBackend::Http
            && self
                .classifier
                .model_url
                .as_deref()
                .is_none_or(|url| url.trim().is_empty())
        {
            return Err(MindMateError::Config(
                "classifier.backend = \"http\" requires classifier.model_url".to_owned(),
            ));
        }
        if self.classifier.timeout_ms == 0 {
            return Err(MindMateError::Config(
                "classifier.timeout_ms must be greater than zero".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&self.classifier.model_min_score) {
            return Err(MindMateError::Config(format!(
                "classifier.model_min_score must be within 0..=1, got {}",
                self.classifier.model_min_score
            )));
        }
        self.responses.validate()
    }
}
