//! Console configuration loaded from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::error::{HarkError, Result};
use crate::permission::PermissionLevel;

/// Settings for an interactive console session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Printed before each input line.
    pub prompt: String,
    /// Optional line printed once at startup.
    pub greeting: Option<String>,
    /// Name of the acting user when the session starts.
    pub user: String,
    /// Match command names and aliases without regard to ASCII case.
    pub case_insensitive: bool,
    /// `env_logger` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Users to seed the user store with. Empty means the built-in set.
    #[serde(rename = "user_seed")]
    pub users: Vec<UserSeed>,
}

/// A user entry in the config file (`[[user_seed]]`).
#[derive(Debug, Clone, Deserialize)]
pub struct UserSeed {
    pub name: String,
    #[serde(default = "default_food")]
    pub favorite_food: String,
    #[serde(default = "default_level")]
    pub level: PermissionLevel,
}

fn default_food() -> String {
    "nothing".to_string()
}

fn default_level() -> PermissionLevel {
    PermissionLevel::DefaultUser
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            greeting: None,
            user: "Admin".to_string(),
            case_insensitive: false,
            log_filter: "info".to_string(),
            users: Vec::new(),
        }
    }
}

impl ConsoleConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: ConsoleConfig = toml::from_str(toml_str)?;
        if config.user.trim().is_empty() {
            return Err(HarkError::Config("user must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)
            .map_err(|e| HarkError::Config(format!("{}: {e}", path.display())))?;
        log::debug!("Loaded console config from {}", path.display());
        Ok(config)
    }
}
