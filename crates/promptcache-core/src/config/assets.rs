//! Static request assets: system preamble, reference document, tool catalog

use crate::config::settings::AssetPaths;
use crate::error::{PromptCacheError, PromptCacheResult};
use crate::llm::messages::ToolDefinition;
use std::fs;
use std::path::Path;

/// Preamble used when no file is configured
pub const DEFAULT_SYSTEM_PREAMBLE: &str = "You are a helpful assistant.";

/// Fixed content placed ahead of the conversation on every request.
///
/// Read-only for the lifetime of a session; shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticAssets {
    pub system_preamble: String,
    pub document: Option<String>,
    pub tools: Vec<ToolDefinition>,
}

impl Default for StaticAssets {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PREAMBLE)
    }
}

impl StaticAssets {
    pub fn new(system_preamble: impl Into<String>) -> Self {
        Self {
            system_preamble: system_preamble.into(),
            document: None,
            tools: Vec::new(),
        }
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Load assets from the configured paths
    pub fn load(paths: &AssetPaths) -> PromptCacheResult<Self> {
        let system_preamble = match &paths.system_preamble {
            Some(path) => read_text(path)?,
            None => DEFAULT_SYSTEM_PREAMBLE.to_string(),
        };
        if system_preamble.trim().is_empty() {
            return Err(PromptCacheError::config("System preamble must not be empty"));
        }

        let document = paths.document.as_deref().map(read_text).transpose()?;

        let tools = match &paths.tools {
            Some(path) => {
                let raw = read_text(path)?;
                serde_json::from_str::<Vec<ToolDefinition>>(&raw).map_err(|e| {
                    PromptCacheError::json_with_context(
                        format!("Failed to parse tool catalog: {}", e),
                        format!("Reading tool definitions from '{}'", path.display()),
                    )
                })?
            }
            None => Vec::new(),
        };

        tracing::debug!(
            preamble_bytes = system_preamble.len(),
            document_bytes = document.as_ref().map_or(0, String::len),
            tools = tools.len(),
            "Loaded static assets"
        );

        Ok(Self {
            system_preamble,
            document,
            tools,
        })
    }
}

fn read_text(path: &Path) -> PromptCacheResult<String> {
    fs::read_to_string(path).map_err(|e| {
        PromptCacheError::io_at(
            format!("Failed to read asset: {}", e),
            path.display().to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_all_assets() {
        let dir = TempDir::new().unwrap();
        let preamble = dir.path().join("system.md");
        let document = dir.path().join("reference.md");
        let tools = dir.path().join("tools.json");
        fs::write(&preamble, "You are a telemetry analyst.").unwrap();
        fs::write(&document, "Large reference material").unwrap();
        fs::write(
            &tools,
            r#"[
                {"name": "read_gauge", "description": "Read a gauge", "input_schema": {"type": "object"}},
                {"name": "set_gain", "input_schema": {"type": "object"}}
            ]"#,
        )
        .unwrap();

        let assets = StaticAssets::load(&AssetPaths {
            system_preamble: Some(preamble),
            document: Some(document),
            tools: Some(tools),
        })
        .unwrap();

        assert_eq!(assets.system_preamble, "You are a telemetry analyst.");
        assert_eq!(assets.document.as_deref(), Some("Large reference material"));
        assert_eq!(assets.tools.len(), 2);
        assert_eq!(assets.tools[1].description, "");
        assert!(assets.tools.iter().all(|t| t.cache.is_none()));
    }

    #[test]
    fn test_defaults_without_paths() {
        let assets = StaticAssets::load(&AssetPaths::default()).unwrap();
        assert_eq!(assets, StaticAssets::default());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = StaticAssets::load(&AssetPaths {
            document: Some("/nonexistent/reference.md".into()),
            ..AssetPaths::default()
        })
        .unwrap_err();
        assert_eq!(err.context(), Some("/nonexistent/reference.md"));
    }

    #[test]
    fn test_malformed_tool_catalog() {
        let dir = TempDir::new().unwrap();
        let tools = dir.path().join("tools.json");
        fs::write(&tools, r#"{"name": "not-an-array"}"#).unwrap();

        let err = StaticAssets::load(&AssetPaths {
            tools: Some(tools),
            ..AssetPaths::default()
        })
        .unwrap_err();
        assert_eq!(err.error_code(), "JSON");
    }
}
