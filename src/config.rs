use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{MatchTuning, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// L2 cache; the service runs on L1 alone when unset or unreachable
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_token_overlap_threshold")]
    pub token_overlap_threshold: f64,
    #[serde(default = "default_relocation_penalty")]
    pub relocation_penalty: f64,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            token_overlap_threshold: default_token_overlap_threshold(),
            relocation_penalty: default_relocation_penalty(),
            max_limit: default_max_limit(),
        }
    }
}

impl MatchingSettings {
    pub fn tuning(&self) -> MatchTuning {
        MatchTuning {
            token_overlap_threshold: self.token_overlap_threshold,
            relocation_penalty: self.relocation_penalty,
        }
    }
}

fn default_token_overlap_threshold() -> f64 { 0.4 }
fn default_relocation_penalty() -> f64 { 0.05 }
fn default_max_limit() -> u16 { 500 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_requirements_weight")]
    pub requirements: f64,
    #[serde(default = "default_text_weight")]
    pub text: f64,
    #[serde(default = "default_degree_weight")]
    pub degree: f64,
    #[serde(default = "default_study_mode_weight")]
    pub study_mode: f64,
    #[serde(default = "default_surplus_weight")]
    pub surplus: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            requirements: default_requirements_weight(),
            text: default_text_weight(),
            degree: default_degree_weight(),
            study_mode: default_study_mode_weight(),
            surplus: default_surplus_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            requirements: config.requirements,
            text: config.text,
            degree: config.degree,
            study_mode: config.study_mode,
            surplus: config.surplus,
        }
    }
}

fn default_requirements_weight() -> f64 { 0.45 }
fn default_text_weight() -> f64 { 0.30 }
fn default_degree_weight() -> f64 { 0.10 }
fn default_study_mode_weight() -> f64 { 0.10 }
fn default_surplus_weight() -> f64 { 0.05 }

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
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with UNIMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., UNIMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("UNIMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("UNIMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// `DATABASE_URL` wins over whatever the files say
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}
