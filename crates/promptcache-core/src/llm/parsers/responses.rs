//! Anthropic reply parsing

use crate::error::{PromptCacheError, PromptCacheResult};
use crate::llm::messages::{ContentBlock, ModelReply};
use crate::llm::parsers::redact::sanitize_provider_error_text;
use crate::types::UsageCounters;
use serde_json::{Map, Value};

const PROVIDER: &str = "anthropic";

/// Response parser for the Messages API
pub struct ResponseParser;

impl ResponseParser {
    /// Parse a raw reply body.
    ///
    /// Non-JSON bodies are reported as transport failures with the body
    /// redacted, so a proxy's HTML error page never leaks credentials.
    pub fn parse_anthropic_str(body: &str) -> PromptCacheResult<ModelReply> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            PromptCacheError::transport_with_provider(
                format!(
                    "Malformed reply ({}): {}",
                    e,
                    sanitize_provider_error_text(body)
                ),
                PROVIDER,
            )
        })?;
        Self::parse_anthropic(value)
    }

    /// Parse Anthropic response
    ///
    /// Anthropic responses have a content array that may contain:
    /// - {"type": "text", "text": "..."} - Text content
    /// - {"type": "tool_use", "id": "...", "name": "...", "input": {...}} - Tool calls
    ///
    /// The usage object may carry cache counters; the per-TTL split lives
    /// under `cache_creation` and falls back to the 5-minute class when only
    /// the aggregate `cache_creation_input_tokens` is present.
    pub fn parse_anthropic(response: Value) -> PromptCacheResult<ModelReply> {
        if response["type"].as_str() == Some("error") {
            let detail = sanitize_provider_error_text(&response["error"].to_string());
            return Err(PromptCacheError::transport_with_provider(
                format!("Provider returned an error: {}", detail),
                PROVIDER,
            ));
        }

        let blocks = response["content"].as_array().ok_or_else(|| {
            PromptCacheError::transport_with_provider(
                "Malformed reply: missing content array",
                PROVIDER,
            )
        })?;

        let mut content = Vec::with_capacity(blocks.len());
        let mut skipped_blocks = 0;
        for block in blocks {
            match block["type"].as_str() {
                Some("text") => {
                    let text = block["text"].as_str().ok_or_else(|| {
                        PromptCacheError::transport_with_provider(
                            "Malformed reply: text block without text",
                            PROVIDER,
                        )
                    })?;
                    content.push(ContentBlock::text(text));
                }
                Some("tool_use") => {
                    let (Some(id), Some(name)) = (block["id"].as_str(), block["name"].as_str())
                    else {
                        return Err(PromptCacheError::transport_with_provider(
                            "Malformed reply: tool_use block without id or name",
                            PROVIDER,
                        ));
                    };
                    let input = match &block["input"] {
                        Value::Null => Value::Object(Map::new()),
                        other => other.clone(),
                    };
                    content.push(ContentBlock::tool_use(id, name, input));
                }
                other => {
                    skipped_blocks += 1;
                    tracing::warn!(block_type = ?other, "Skipping unsupported reply content block");
                }
            }
        }

        // An empty assistant turn would be rejected on every later replay.
        if content.is_empty() {
            return Err(PromptCacheError::transport_with_provider(
                format!(
                    "Malformed reply: no usable content blocks ({} skipped, stop_reason {:?})",
                    skipped_blocks,
                    response["stop_reason"].as_str()
                ),
                PROVIDER,
            ));
        }

        let usage = response["usage"]
            .as_object()
            .map(Self::parse_usage)
            .unwrap_or_default();

        if usage.has_cache_activity() {
            tracing::debug!(
                cache_read = usage.cache_read_tokens,
                cache_write_5m = usage.cache_creation_5m_tokens,
                cache_write_1h = usage.cache_creation_1h_tokens,
                hit_ratio = usage.cache_hit_ratio(),
                "Anthropic cache metrics"
            );
        }

        Ok(ModelReply {
            id: response["id"].as_str().map(str::to_string),
            model: response["model"].as_str().unwrap_or_default().to_string(),
            content,
            stop_reason: response["stop_reason"].as_str().map(str::to_string),
            usage,
            skipped_blocks,
        })
    }

    fn parse_usage(usage: &Map<String, Value>) -> UsageCounters {
        let count = |map: &Map<String, Value>, key: &str| {
            map.get(key)
                .and_then(Value::as_u64)
                .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX))
        };

        let (creation_5m, creation_1h) = match usage.get("cache_creation").and_then(Value::as_object)
        {
            Some(split) => (
                count(split, "ephemeral_5m_input_tokens"),
                count(split, "ephemeral_1h_input_tokens"),
            ),
            None => (count(usage, "cache_creation_input_tokens"), 0),
        };

        UsageCounters {
            input_tokens: count(usage, "input_tokens"),
            output_tokens: count(usage, "output_tokens"),
            cache_creation_5m_tokens: creation_5m,
            cache_creation_1h_tokens: creation_1h,
            cache_read_tokens: count(usage, "cache_read_input_tokens"),
        }
    }
}
