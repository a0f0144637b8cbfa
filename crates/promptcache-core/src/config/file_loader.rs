//! File-based settings loading

use crate::config::settings::Settings;
use crate::error::{PromptCacheError, PromptCacheResult};
use std::fs;
use std::path::Path;

/// Load settings from a file
///
/// Supports JSON, TOML, and YAML formats based on file extension.
/// Returns default settings if the file doesn't exist.
pub fn load_from_file(path: &Path) -> PromptCacheResult<Settings> {
    if !path.exists() {
        tracing::debug!("Config file {} not found, using defaults", path.display());
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        PromptCacheError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let settings: Settings = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            PromptCacheError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            PromptCacheError::config_with_context(
                format!("Failed to parse YAML config: {}", e),
                format!("Deserializing YAML configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            PromptCacheError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(settings)
}
