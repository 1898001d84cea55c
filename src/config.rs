use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{BlendWeights, HeuristicPenalties, NeighborPolicy, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
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

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    /// Without a URL the service runs on in-memory collaborators
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    /// JSON array of profiles loaded into the in-memory source when `url` is unset
    pub profiles_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,
    #[serde(default)]
    pub neighbor_policy: NeighborPolicy,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            neighbors: default_neighbors(),
            neighbor_policy: NeighborPolicy::default(),
        }
    }
}

fn default_limit() -> u16 { 5 }
fn default_max_limit() -> u16 { 50 }
fn default_neighbors() -> usize { 5 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_sleep_penalty")]
    pub sleep_penalty: u32,
    #[serde(default = "default_study_penalty")]
    pub study_penalty: u32,
    #[serde(default = "default_ordinal_step")]
    pub cleanliness_step: u32,
    #[serde(default = "default_ordinal_step")]
    pub noise_step: u32,
    #[serde(default = "default_heuristic_blend")]
    pub heuristic_blend: f64,
    #[serde(default = "default_similarity_blend")]
    pub similarity_blend: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            sleep_penalty: default_sleep_penalty(),
            study_penalty: default_study_penalty(),
            cleanliness_step: default_ordinal_step(),
            noise_step: default_ordinal_step(),
            heuristic_blend: default_heuristic_blend(),
            similarity_blend: default_similarity_blend(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            heuristic: HeuristicPenalties {
                sleep: config.sleep_penalty,
                study: config.study_penalty,
                cleanliness_step: config.cleanliness_step,
                noise_step: config.noise_step,
            },
            blend: BlendWeights {
                heuristic: config.heuristic_blend,
                similarity: config.similarity_blend,
            },
        }
    }
}

fn default_sleep_penalty() -> u32 { 25 }
fn default_study_penalty() -> u32 { 15 }
fn default_ordinal_step() -> u32 { 5 }
fn default_heuristic_blend() -> f64 { 0.6 }
fn default_similarity_blend() -> f64 { 0.4 }

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
    /// 4. Environment variables (prefixed with ROOMIE__)
    /// 5. DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ROOMIE__SERVER__PORT -> server.port
            .add_source(environment());

        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("ROOMIE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.sleep_penalty, 25);
        assert_eq!(weights.study_penalty, 15);
        assert_eq!(weights.cleanliness_step, 5);
        assert_eq!(weights.noise_step, 5);
        assert_eq!(weights.heuristic_blend, 0.6);
        assert_eq!(weights.similarity_blend, 0.4);

        assert_eq!(ScoringWeights::from(&weights), ScoringWeights::default());
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
        let path = std::env::temp_dir().join("roomie_algo_config_test.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 9000

[matching]
neighbor_policy = "nearest_only"

[database]
profiles_file = "config/profiles.json"

[scoring.weights]
sleep_penalty = 30
"#
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.matching.neighbor_policy, NeighborPolicy::NearestOnly);
        assert_eq!(settings.matching.default_limit, 5);
        assert!(settings.database.url.is_none());
        assert_eq!(settings.database.profiles_file.as_deref(), Some("config/profiles.json"));

        let weights = settings.scoring_weights();
        assert_eq!(weights.heuristic.sleep, 30);
        assert_eq!(weights.heuristic.study, 15);
        assert_eq!(weights.blend.similarity, 0.4);
    }
}
