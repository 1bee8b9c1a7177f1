use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use crate::models::{GradeTable, MatchWeights};

/// Application configuration
///
/// Every section has defaults so both binaries run without a config
/// file present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub grades: GradeTable,
    #[serde(default)]
    pub evaluation: EvaluationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_topk")]
    pub topk: usize,
    /// Pairs are only scored inside matching 대카테고리 buckets once the
    /// seller*buyer product exceeds this bound; unset scores everything
    #[serde(default)]
    pub bucket_threshold: Option<usize>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            topk: default_topk(),
            bucket_threshold: None,
        }
    }
}

fn default_topk() -> usize { 5 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: MatchWeights,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationSettings {
    #[serde(default = "default_pool")]
    pub pool: usize,
    #[serde(default = "default_target")]
    pub accuracy: f64,
    #[serde(default = "default_target")]
    pub precision: f64,
    #[serde(default = "default_target")]
    pub recall: f64,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            pool: default_pool(),
            accuracy: default_target(),
            precision: default_target(),
            recall: default_target(),
        }
    }
}

fn default_pool() -> usize { 50 }
fn default_target() -> f64 { 0.90 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with SAJANG_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with SAJANG_)
            // e.g., SAJANG_MATCHING__TOPK -> matching.topk
            .add_source(
                Environment::with_prefix("SAJANG")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SAJANG")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Initialize the tracing subscriber from the logging settings
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.clone()));

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(filter);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}
