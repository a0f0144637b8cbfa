//! Breakpoint annotation, TTL classes and placement sites

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache lifetime class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CacheTtl {
    /// Standard 5-minute cache, refreshed on every hit
    #[default]
    #[serde(rename = "5m")]
    Short,
    /// Extended 1-hour cache
    #[serde(rename = "1h")]
    Long,
}

impl CacheTtl {
    /// Pick the TTL class for a request
    pub fn from_long(use_long: bool) -> Self {
        if use_long { Self::Long } else { Self::Short }
    }

    /// Value of the `ttl` field on the wire
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Self::Short => "5m",
            Self::Long => "1h",
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Self::Short => Duration::from_secs(300),
            Self::Long => Duration::from_secs(3600),
        }
    }
}

impl std::fmt::Display for CacheTtl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// Cache-control annotation carried by a content block or tool definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheBreakpoint {
    pub ttl: CacheTtl,
}

impl CacheBreakpoint {
    pub fn new(ttl: CacheTtl) -> Self {
        Self { ttl }
    }

    pub fn short() -> Self {
        Self::new(CacheTtl::Short)
    }

    pub fn long() -> Self {
        Self::new(CacheTtl::Long)
    }
}

/// What to do when a request would carry more breakpoints than allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BreakpointOverflow {
    /// Remove breakpoints from the lowest-priority sites until the request fits
    #[default]
    DropLowestPriority,
    /// Fail the build
    Reject,
}

/// Where in an outbound request a breakpoint sits
///
/// Variants are ordered from lowest to highest retention priority. The
/// trailing turn marker ranks highest: it alone covers the entire prefix,
/// so it is never dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BreakpointSite {
    /// The large reference document
    Document,
    /// The last tool definition
    ToolCatalog,
    /// The system preamble
    SystemPreamble,
    /// The empty marker block closing the new user turn
    TurnMarker,
}

impl BreakpointSite {
    /// Whether overflow handling may remove this breakpoint
    pub fn is_droppable(&self) -> bool {
        !matches!(self, Self::TurnMarker)
    }
}

impl std::fmt::Display for BreakpointSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Document => "document",
            Self::ToolCatalog => "tool_catalog",
            Self::SystemPreamble => "system_preamble",
            Self::TurnMarker => "turn_marker",
        };
        f.write_str(name)
    }
}
