use crate::core::StreamingError;
use crate::request::Model;
use serde::Deserialize;
use std::fs;
use std::path::Path;

include!(concat!(env!("OUT_DIR"), "/config_embedded.rs"));

/// Client configuration.
///
/// The streaming endpoint is an explicit configuration value handed to
/// [`ChatClient`](crate::ChatClient) at construction time; there is no global
/// base URL.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub endpoint: String,
    pub model: Option<Model>,
    pub system_prompt: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("Invalid default config")
    }
}

impl Config {
    /// Loads `config.toml` from the working directory, falling back to the
    /// compiled-in defaults when the file does not exist.
    pub fn load() -> Result<Self, StreamingError> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, StreamingError> {
        if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| {
                StreamingError::Config(format!("Failed to read config file: {e}"))
            })?;

            toml::from_str(&contents)
                .map_err(|e| StreamingError::Config(format!("Failed to parse config file: {e}")))
        } else {
            Ok(Self::default())
        }
    }
}
