//! Outbound request shape and per-call options

use crate::cache::{BreakpointSite, CacheBreakpoint, CacheTtl};
use crate::llm::messages::{Role, ToolDefinition, Turn};
use serde::{Deserialize, Serialize};

/// Per-call switches supplied by the caller; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Use the 1-hour cache instead of the 5-minute one
    pub use_1h_cache: bool,
    /// Append the large reference document after the system preamble
    pub include_large_document: bool,
    /// Send the static tool catalog
    pub include_tools: bool,
    /// Start from an empty transcript for this call
    pub reset_conversation: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_1h_cache(mut self, enabled: bool) -> Self {
        self.use_1h_cache = enabled;
        self
    }

    pub fn with_large_document(mut self, enabled: bool) -> Self {
        self.include_large_document = enabled;
        self
    }

    pub fn with_tools(mut self, enabled: bool) -> Self {
        self.include_tools = enabled;
        self
    }

    pub fn with_reset(mut self, enabled: bool) -> Self {
        self.reset_conversation = enabled;
        self
    }

    /// TTL applied to every breakpoint of the request
    pub fn ttl(&self) -> CacheTtl {
        CacheTtl::from_long(self.use_1h_cache)
    }
}

/// Model generation parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub stop_sequences: Vec<String>,
}

/// Which static asset a system block holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemBlockKind {
    Preamble,
    Document,
}

/// A block of the system section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemBlock {
    pub kind: SystemBlockKind,
    pub text: String,
    pub cache: Option<CacheBreakpoint>,
}

/// Fully assembled request, ready for a transport
///
/// Section order is fixed: system blocks, tools, then messages. The last
/// message is always the new user turn closed by its marker block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundRequest {
    pub model: String,
    pub params: GenerationParams,
    pub system: Vec<SystemBlock>,
    pub tools: Vec<ToolDefinition>,
    pub messages: Vec<Turn>,
}

impl OutboundRequest {
    /// Replayed transcript turns (everything but the new user turn)
    pub fn history(&self) -> &[Turn] {
        match self.messages.split_last() {
            Some((_, history)) => history,
            None => &[],
        }
    }

    /// The new user turn
    pub fn pending_turn(&self) -> Option<&Turn> {
        self.messages.last().filter(|t| t.role == Role::User)
    }

    /// Total annotated blocks across all sections
    pub fn breakpoint_count(&self) -> usize {
        self.breakpoint_sites().len()
    }

    /// Annotated locations in request order
    pub fn breakpoint_sites(&self) -> Vec<BreakpointSite> {
        let mut sites = Vec::new();
        for block in &self.system {
            if block.cache.is_some() {
                sites.push(match block.kind {
                    SystemBlockKind::Preamble => BreakpointSite::SystemPreamble,
                    SystemBlockKind::Document => BreakpointSite::Document,
                });
            }
        }
        sites.extend(
            self.tools
                .iter()
                .filter(|t| t.cache.is_some())
                .map(|_| BreakpointSite::ToolCatalog),
        );
        // Replayed history never carries annotations; see `Transcript`.
        if let Some(turn) = self.pending_turn() {
            sites.extend(std::iter::repeat_n(
                BreakpointSite::TurnMarker,
                turn.breakpoint_count(),
            ));
        }
        sites
    }

    /// Whether any breakpoint asks for the 1-hour cache
    pub fn uses_long_ttl(&self) -> bool {
        let system = self.system.iter().filter_map(|b| b.cache);
        let tools = self.tools.iter().filter_map(|t| t.cache);
        let messages = self
            .messages
            .iter()
            .flat_map(|t| t.content.iter())
            .filter_map(|b| b.breakpoint().copied());
        system
            .chain(tools)
            .chain(messages)
            .any(|bp| bp.ttl == CacheTtl::Long)
    }

    /// Remove one breakpoint at `site`; returns false if none was found.
    ///
    /// The turn marker is never removed.
    pub(crate) fn strip_breakpoint(&mut self, site: BreakpointSite) -> bool {
        match site {
            BreakpointSite::SystemPreamble | BreakpointSite::Document => {
                let kind = if site == BreakpointSite::Document {
                    SystemBlockKind::Document
                } else {
                    SystemBlockKind::Preamble
                };
                match self
                    .system
                    .iter_mut()
                    .find(|b| b.kind == kind && b.cache.is_some())
                {
                    Some(block) => {
                        block.cache = None;
                        true
                    }
                    None => false,
                }
            }
            BreakpointSite::ToolCatalog => match self.tools.iter_mut().find(|t| t.cache.is_some()) {
                Some(tool) => {
                    tool.cache = None;
                    true
                }
                None => false,
            },
            BreakpointSite::TurnMarker => false,
        }
    }
}
