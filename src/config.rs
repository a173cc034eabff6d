use crate::cli::Cli;
use crate::leaderboard::EvictionScope;
use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::Display;
use tracing::Level;

const LOCAL_SETTINGS_YAML_FILE: &str = ".env.local.yaml";
const ENV_PREFIX: &str = "MAZE_";

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

// Settings are built once in main and handed to whoever needs them. Any field
// may be set through a MAZE_ prefixed environment variable, e.g.
// MAZE_CAPACITY=50 sets capacity to 50. Command line flags win over both the
// environment and the local yaml file.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Settings {
    #[serde(default = "default_trace_level")]
    trace_level: String,
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    // Maximum number of retained entries, also the default list size
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub eviction_scope: EvictionScope,
}

impl Settings {
    pub fn new() -> Result<Self, figment::Error> {
        Settings::from_figment(Settings::figment(Cli::parse()))
    }

    pub fn figment(cli: Cli) -> Figment {
        let mut figment = Figment::new();
        if Path::new(LOCAL_SETTINGS_YAML_FILE).exists() {
            // Logging is not set up yet at this point.
            println!("Found '{LOCAL_SETTINGS_YAML_FILE}' file, loading local configuration.");
            figment = figment.merge(Yaml::file(LOCAL_SETTINGS_YAML_FILE));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(cli))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        let settings: Settings = figment.extract()?;
        if settings.capacity == 0 {
            return Err(figment::Error::from(
                "capacity must be at least 1".to_string(),
            ));
        }
        Ok(settings)
    }

    pub fn trace_level(&self) -> Level {
        get_trace_level(&self.trace_level)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Case-insensitive level name, INFO when unrecognized.
fn get_trace_level(level_str: &str) -> Level {
    level_str.trim().parse::<Level>().unwrap_or(Level::INFO)
}

fn default_trace_level() -> String {
    "INFO".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("storage.json")
}

fn default_capacity() -> usize {
    100
}
