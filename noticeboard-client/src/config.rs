use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// gRPC endpoint of the noticeboard server
    pub server_addr: String,
    /// Title looked up with the unary call
    pub title: String,
    /// Author mail used as the streaming filter
    pub author_mail: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "http://127.0.0.1:9000".to_string(),
            title: "What up".to_string(),
            author_mail: "hans@gmail.com".to_string(),
        }
    }
}

pub fn parse_config(contents: &str) -> Result<Config, Box<dyn std::error::Error>> {
    serde_yaml::from_str(contents).map_err(Into::into)
}

fn load_from_env() -> Config {
    let mut config = Config::default();

    if let Ok(addr) = env::var("NOTICEBOARD_SERVER_ADDR") {
        config.server_addr = addr;
    }

    config
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("NOTICEBOARD_CLIENT_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

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

    // Fallback to environment variables and defaults
    tracing::info!("No config file found, using environment variables and defaults");
    Ok(load_from_env())
}
