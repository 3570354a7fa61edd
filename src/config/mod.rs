pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".hardena.toml";

/// Get the global config file path (~/.hardena.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Load configuration from file or use defaults.
///
/// An explicit path must exist and parse; the global file is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    match global_config_path() {
        Some(global) if global.exists() => read_config(&global),
        _ => Ok(types::Config::default()),
    }
}

fn read_config(path: &Path) -> Result<types::Config> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content).map_err(|message| {
        ConfigError::ParsingFailed {
            path: path.display().to_string(),
            message,
        }
        .into()
    })
}

/// Parse TOML config content.
pub fn parse_config(content: &str) -> std::result::Result<types::Config, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}
