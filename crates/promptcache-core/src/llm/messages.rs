//! Conversation message types

use crate::cache::{CacheBreakpoint, CacheTtl};
use crate::types::UsageCounters;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a turn in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message (human input)
    User,
    /// Assistant message (model reply)
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A typed piece of turn content
///
/// Closed set of block kinds: every place that inspects or serializes content
/// matches exhaustively, so adding a kind is checked at each call site.
///
/// Reply blocks of any other provider type (thinking, server tool results)
/// have no variant here and are not stored; [`ModelReply::skipped_blocks`]
/// counts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cache: Option<CacheBreakpoint>,
    },
    /// A tool invocation requested by the model
    ToolUse {
        id: String,
        name: String,
        input: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cache: Option<CacheBreakpoint>,
    },
}

impl ContentBlock {
    /// Create a plain text block
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            cache: None,
        }
    }

    /// Create a tool invocation block
    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
            cache: None,
        }
    }

    /// Create the synthetic empty block that closes a user turn with a breakpoint
    pub fn cache_marker(ttl: CacheTtl) -> Self {
        Self::Text {
            text: String::new(),
            cache: Some(CacheBreakpoint::new(ttl)),
        }
    }

    pub fn breakpoint(&self) -> Option<&CacheBreakpoint> {
        match self {
            Self::Text { cache, .. } | Self::ToolUse { cache, .. } => cache.as_ref(),
        }
    }

    pub fn set_breakpoint(&mut self, breakpoint: Option<CacheBreakpoint>) {
        match self {
            Self::Text { cache, .. } | Self::ToolUse { cache, .. } => *cache = breakpoint,
        }
    }

    /// Attach a breakpoint to this block
    pub fn with_breakpoint(mut self, breakpoint: CacheBreakpoint) -> Self {
        self.set_breakpoint(Some(breakpoint));
        self
    }

    /// True for the empty, breakpoint-carrying text block appended by the builder
    pub fn is_cache_marker(&self) -> bool {
        match self {
            Self::Text { text, cache } => text.is_empty() && cache.is_some(),
            Self::ToolUse { .. } => false,
        }
    }

    /// Text payload, if this is a text block
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::ToolUse { .. } => None,
        }
    }
}

/// One side of an exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Turn {
    /// Create a user turn holding a single text block
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
        }
    }

    /// Create an assistant turn from reply blocks
    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// Number of annotated blocks in this turn
    pub fn breakpoint_count(&self) -> usize {
        self.content
            .iter()
            .filter(|b| b.breakpoint().is_some())
            .count()
    }

    /// Concatenated text of all text blocks
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Tool invocations in this turn
    pub fn tool_uses(&self) -> impl Iterator<Item = &ContentBlock> {
        self.content
            .iter()
            .filter(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}

/// Tool definition from the static tool catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub input_schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheBreakpoint>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            cache: None,
        }
    }
}

/// Reply returned by the transport for one round trip
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReply {
    /// Provider-assigned reply id
    pub id: Option<String>,
    /// Model that produced the reply
    pub model: String,
    /// Reply content in provider order
    pub content: Vec<ContentBlock>,
    /// Why generation stopped (`end_turn`, `tool_use`, `max_tokens`, ...)
    pub stop_reason: Option<String>,
    pub usage: UsageCounters,
    /// Reply blocks of unsupported types left out of `content`
    pub skipped_blocks: usize,
}

impl ModelReply {
    /// Create a text-only reply
    pub fn text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: None,
            model: model.into(),
            content: vec![ContentBlock::text(text)],
            stop_reason: Some("end_turn".to_string()),
            usage: UsageCounters::default(),
            skipped_blocks: 0,
        }
    }

    pub fn with_usage(mut self, usage: UsageCounters) -> Self {
        self.usage = usage;
        self
    }

    /// Build the assistant turn that goes into the transcript.
    ///
    /// Block structure is kept verbatim; breakpoints are cleared because the
    /// assistant side is never cache-annotated.
    pub fn to_turn(&self) -> Turn {
        let content = self
            .content
            .iter()
            .cloned()
            .map(|mut block| {
                block.set_breakpoint(None);
                block
            })
            .collect();
        Turn::assistant(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_marker_detection() {
        assert!(ContentBlock::cache_marker(CacheTtl::Short).is_cache_marker());
        assert!(!ContentBlock::text("").is_cache_marker());
        assert!(
            !ContentBlock::text("Hi")
                .with_breakpoint(CacheBreakpoint::short())
                .is_cache_marker()
        );
    }

    #[test]
    fn test_reply_turn_drops_annotations_and_keeps_structure() {
        let reply = ModelReply {
            id: Some("msg_1".to_string()),
            model: "claude-test".to_string(),
            content: vec![
                ContentBlock::text("Let me look").with_breakpoint(CacheBreakpoint::long()),
                ContentBlock::tool_use("toolu_1", "search", json!({"q": "rust"})),
            ],
            stop_reason: Some("tool_use".to_string()),
            usage: UsageCounters::default(),
            skipped_blocks: 0,
        };

        let turn = reply.to_turn();
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content.len(), 2);
        assert_eq!(turn.breakpoint_count(), 0);
        assert_eq!(turn.tool_uses().count(), 1);
        assert_eq!(turn.text(), "Let me look");
    }

    #[test]
    fn test_block_serde_shape() {
        let block = ContentBlock::text("Hi");
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"type": "text", "text": "Hi"})
        );
        let parsed: ContentBlock =
            serde_json::from_value(json!({"type": "tool_use", "id": "t", "name": "n", "input": {}}))
                .unwrap();
        assert!(parsed.breakpoint().is_none());
    }
}
