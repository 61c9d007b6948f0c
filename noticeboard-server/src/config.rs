use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path, time::Duration};

use crate::{models::Note, repository::NoteStore};

const DEFAULT_ADDR: &str = "0.0.0.0:9000";
const DEFAULT_STREAM_BUFFER: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the gRPC listener binds to
    pub addr: String,
    /// Capacity of the per-stream channel between producer and transport
    pub stream_buffer: usize,
    /// Pause after each streamed note, in milliseconds
    pub stream_delay_ms: u64,
    /// Replaces the built-in example notes when set
    pub notes: Option<Vec<Note>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            stream_buffer: DEFAULT_STREAM_BUFFER,
            stream_delay_ms: 0,
            notes: None,
        }
    }
}

impl Config {
    pub const fn stream_delay(&self) -> Duration {
        Duration::from_millis(self.stream_delay_ms)
    }

    /// Builds the note store this config describes.
    pub fn store(&self) -> NoteStore {
        self.notes
            .clone()
            .map_or_else(NoteStore::seeded, NoteStore::new)
    }

    pub fn validate(self) -> Result<Self, Box<dyn std::error::Error>> {
        if self.stream_buffer == 0 {
            return Err("stream_buffer must be at least 1".into());
        }
        if self.addr.trim().is_empty() {
            return Err("addr must not be empty".into());
        }
        Ok(self)
    }
}

pub fn parse_config(contents: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let config: Config = serde_yaml::from_str(contents)?;
    config.validate()
}

fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::default();

    if let Ok(addr) = env::var("NOTICEBOARD_ADDR") {
        config.addr = addr;
    }

    if let Ok(buffer) = env::var("NOTICEBOARD_STREAM_BUFFER") {
        config.stream_buffer = buffer
            .parse::<usize>()
            .map_err(|e| format!("Failed to parse NOTICEBOARD_STREAM_BUFFER: {e}"))?;
    }

    config.validate()
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("NOTICEBOARD_SERVER_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        let contents = fs::read_to_string(&config_path)?;
        return parse_config(&contents);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!("Config file '{config_path}' not found, falling back to 'config.yaml'");
        let contents = fs::read_to_string("config.yaml")?;
        return parse_config(&contents);
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{config_path}' and 'config.yaml' not found, falling back to 'config.example.yaml'"
        );
        let contents = fs::read_to_string("config.example.yaml")?;
        return parse_config(&contents);
    }

    // Fallback to environment variables and defaults
    tracing::info!("No config file found, using environment variables and defaults");
    load_from_env()
}
