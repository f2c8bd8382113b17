use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub redis: RedisSettings,
    pub solver: SolverSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisSettings {
    pub url: String,
}

/// The external-solver endpoint plus the knobs and objective weights pinned in
/// spec.md §6 — config-overridable, but defaulting to the spec's pinned values.
#[derive(Debug, Deserialize, Clone)]
pub struct SolverSettings {
    pub endpoint_url: String,
    #[serde(default = "default_max_time_in_seconds")]
    pub max_time_in_seconds: u32,
    #[serde(default = "default_num_workers")]
    pub num_workers: u32,
    #[serde(default = "default_understaffing_weight")]
    pub understaffing_weight: u32,
    #[serde(default = "default_pattern_weight")]
    pub pattern_weight: u32,
}

fn default_max_time_in_seconds() -> u32 {
    30
}

fn default_num_workers() -> u32 {
    8
}

fn default_understaffing_weight() -> u32 {
    1000
}

fn default_pattern_weight() -> u32 {
    100
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
