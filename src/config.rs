use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub discovery: DiscoverySettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub profiles: ProfileSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_lifestyle_weight")]
    pub lifestyle: f64,
    #[serde(default = "default_budget_weight")]
    pub budget: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_preferences_weight")]
    pub preferences: f64,
    #[serde(default = "default_deal_breakers_weight")]
    pub deal_breakers: f64,
    #[serde(default = "default_interests_weight")]
    pub interests: f64,
    #[serde(default = "default_age_weight")]
    pub age: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            lifestyle: default_lifestyle_weight(),
            budget: default_budget_weight(),
            location: default_location_weight(),
            preferences: default_preferences_weight(),
            deal_breakers: default_deal_breakers_weight(),
            interests: default_interests_weight(),
            age: default_age_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            lifestyle: config.lifestyle,
            budget: config.budget,
            location: config.location,
            preferences: config.preferences,
            deal_breakers: config.deal_breakers,
            interests: config.interests,
            age: config.age,
        }
    }
}

fn default_lifestyle_weight() -> f64 { 0.25 }
fn default_budget_weight() -> f64 { 0.20 }
fn default_location_weight() -> f64 { 0.15 }
fn default_preferences_weight() -> f64 { 0.15 }
fn default_deal_breakers_weight() -> f64 { 0.10 }
fn default_interests_weight() -> f64 { 0.10 }
fn default_age_weight() -> f64 { 0.05 }

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverySettings {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// Drop profiles the viewer already swiped from the discovery pool
    #[serde(default = "default_true")]
    pub exclude_swiped: bool,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            exclude_swiped: true,
        }
    }
}

fn default_limit() -> usize { 20 }
fn default_max_limit() -> usize { 100 }
fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_capacity() -> u64 { 10_000 }
fn default_cache_ttl() -> u64 { 300 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileSettings {
    /// JSON array of profiles loaded at startup
    pub seed_path: Option<String>,
}

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
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ROOMLY__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ROOMLY__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.server.workers == Some(0) {
            return Err(ConfigError::Message(
                "server.workers must be at least 1".to_string(),
            ));
        }
        if self.discovery.default_limit == 0 || self.discovery.max_limit == 0 {
            return Err(ConfigError::Message(
                "discovery limits must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("ROOMLY")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.lifestyle, 0.25);
        assert_eq!(weights.budget, 0.20);
        assert_eq!(weights.location, 0.15);
        assert_eq!(weights.preferences, 0.15);
        assert_eq!(weights.deal_breakers, 0.10);
        assert_eq!(weights.interests, 0.10);
        assert_eq!(weights.age, 0.05);
        assert!(ScoringWeights::from(&weights).validate().is_ok());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("roomly-settings-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[server]\nport = 9090\n\n[discovery]\nmax_limit = 50\n\n[scoring.weights]\nlifestyle = 0.30\nage = 0.0\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.discovery.max_limit, 50);
        assert_eq!(settings.discovery.default_limit, 20);
        assert_eq!(settings.scoring_weights().lifestyle, 0.30);
        assert_eq!(settings.logging.format, "json");
    }

    #[test]
    fn test_zero_workers_rejected() {
        let path = std::env::temp_dir().join(format!("roomly-workers-{}.toml", std::process::id()));
        std::fs::write(&path, "[server]\nworkers = 0\n").unwrap();

        let result = Settings::load_from(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::Message(_))));
    }
}
