//! Top-level settings

use crate::cache::BreakpointOverflow;
use crate::config::provider::ProviderSettings;
use crate::error::{PromptCacheError, PromptCacheResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Provider ceiling on `cache_control` blocks per request
pub const DEFAULT_MAX_BREAKPOINTS: usize = 4;

/// Everything needed to run conversations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub cache: CacheSettings,
    pub session: SessionSettings,
    pub assets: AssetPaths,
}

impl Settings {
    /// Validate every section; fails on the first problem
    pub fn validate(&self) -> PromptCacheResult<()> {
        self.provider.validate()?;
        self.cache.validate()?;
        self.session.validate()
    }
}

/// Breakpoint placement limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum annotated blocks in one request
    pub max_breakpoints: usize,
    /// Policy applied when a request would exceed `max_breakpoints`
    pub overflow: BreakpointOverflow,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_breakpoints: DEFAULT_MAX_BREAKPOINTS,
            overflow: BreakpointOverflow::default(),
        }
    }
}

impl CacheSettings {
    pub fn validate(&self) -> PromptCacheResult<()> {
        // The turn marker always needs a slot.
        if self.max_breakpoints == 0 {
            return Err(PromptCacheError::config(
                "cache.max_breakpoints must be at least 1",
            ));
        }
        Ok(())
    }
}

/// How a conversation treats a second exchange while one is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyPolicy {
    /// Wait for the in-flight exchange to finish
    #[default]
    Queue,
    /// Fail immediately with a busy error
    Reject,
}

/// Per-conversation runtime settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Upper bound on one transport round trip
    pub request_timeout_secs: u64,
    pub concurrency: ConcurrencyPolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 120,
            concurrency: ConcurrencyPolicy::default(),
        }
    }
}

impl SessionSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> PromptCacheResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(PromptCacheError::config(
                "session.request_timeout_secs must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Locations of the static assets on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    /// File holding the system preamble; an inline default is used when unset
    pub system_preamble: Option<PathBuf>,
    /// Large reference document
    pub document: Option<PathBuf>,
    /// JSON array of tool definitions
    pub tools: Option<PathBuf>,
}
