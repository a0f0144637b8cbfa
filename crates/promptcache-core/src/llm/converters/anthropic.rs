//! Anthropic Messages API request encoding

use crate::cache::CacheBreakpoint;
use crate::llm::messages::{ContentBlock, ToolDefinition, Turn};
use crate::llm::request::{OutboundRequest, SystemBlock};
use serde_json::{Map, Value, json};

/// Beta flag the provider requires before it honors `"ttl": "1h"`
pub const EXTENDED_CACHE_TTL_BETA: &str = "extended-cache-ttl-2025-04-11";

/// Encodes an [`OutboundRequest`] as a Messages API body
pub struct AnthropicEncoder;

impl AnthropicEncoder {
    /// Build the JSON request body.
    ///
    /// Output is deterministic: the same request always encodes to the same
    /// bytes, which is what lets the provider match the cached prefix.
    pub fn request_body(request: &OutboundRequest) -> Value {
        let mut body = json!({
            "model": request.model,
            "max_tokens": request.params.max_tokens,
            "system": request.system.iter().map(Self::system_block).collect::<Vec<_>>(),
            "messages": request.messages.iter().map(Self::turn).collect::<Vec<_>>(),
        });

        // Anthropic API doesn't allow both temperature and top_p - use temperature if set
        if let Some(temperature) = request.params.temperature {
            body["temperature"] = json!(temperature);
        } else if let Some(top_p) = request.params.top_p {
            body["top_p"] = json!(top_p);
        }
        if !request.params.stop_sequences.is_empty() {
            body["stop_sequences"] = json!(request.params.stop_sequences);
        }

        if !request.tools.is_empty() {
            body["tools"] = json!(request.tools.iter().map(Self::tool).collect::<Vec<_>>());
        }

        body
    }

    /// Value for the `anthropic-beta` header, when one is needed
    pub fn beta_header(request: &OutboundRequest) -> Option<&'static str> {
        request.uses_long_ttl().then_some(EXTENDED_CACHE_TTL_BETA)
    }

    /// Non-credential headers a transport sends with this request.
    ///
    /// `api_version` is the configured `anthropic-version`. The API key header
    /// is left to the transport.
    pub fn request_headers(
        request: &OutboundRequest,
        api_version: &str,
    ) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("anthropic-version", api_version.to_string()),
            ("content-type", "application/json".to_string()),
        ];
        if let Some(beta) = Self::beta_header(request) {
            headers.push(("anthropic-beta", beta.to_string()));
        }
        headers
    }

    fn cache_control(breakpoint: &CacheBreakpoint) -> Value {
        json!({"type": "ephemeral", "ttl": breakpoint.ttl.as_wire_str()})
    }

    fn annotated(mut object: Map<String, Value>, cache: Option<&CacheBreakpoint>) -> Value {
        if let Some(breakpoint) = cache {
            object.insert("cache_control".to_string(), Self::cache_control(breakpoint));
        }
        Value::Object(object)
    }

    fn system_block(block: &SystemBlock) -> Value {
        let mut object = Map::new();
        object.insert("type".to_string(), json!("text"));
        object.insert("text".to_string(), json!(block.text));
        Self::annotated(object, block.cache.as_ref())
    }

    fn tool(tool: &ToolDefinition) -> Value {
        let mut object = Map::new();
        object.insert("name".to_string(), json!(tool.name));
        if !tool.description.is_empty() {
            object.insert("description".to_string(), json!(tool.description));
        }
        object.insert("input_schema".to_string(), tool.input_schema.clone());
        Self::annotated(object, tool.cache.as_ref())
    }

    /// Encode one content block
    pub fn content_block(block: &ContentBlock) -> Value {
        let mut object = Map::new();
        match block {
            ContentBlock::Text { text, .. } => {
                object.insert("type".to_string(), json!("text"));
                object.insert("text".to_string(), json!(text));
            }
            ContentBlock::ToolUse {
                id, name, input, ..
            } => {
                object.insert("type".to_string(), json!("tool_use"));
                object.insert("id".to_string(), json!(id));
                object.insert("name".to_string(), json!(name));
                object.insert("input".to_string(), input.clone());
            }
        }
        Self::annotated(object, block.breakpoint())
    }

    /// Encode one turn; content is always an array of typed blocks
    pub fn turn(turn: &Turn) -> Value {
        json!({
            "role": turn.role.to_string(),
            "content": turn.content.iter().map(Self::content_block).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheTtl;
    use crate::llm::request::{GenerationParams, SystemBlockKind};

    fn request(ttl: CacheTtl) -> OutboundRequest {
        let breakpoint = CacheBreakpoint::new(ttl);
        let mut tool = ToolDefinition::new("read_gauge", "Read a gauge", json!({"type": "object"}));
        tool.cache = Some(breakpoint);
        OutboundRequest {
            model: "claude-test".to_string(),
            params: GenerationParams {
                max_tokens: 512,
                temperature: Some(0.2),
                top_p: Some(0.9),
                stop_sequences: Vec::new(),
            },
            system: vec![SystemBlock {
                kind: SystemBlockKind::Preamble,
                text: "Be brief.".to_string(),
                cache: Some(breakpoint),
            }],
            tools: vec![tool],
            messages: vec![Turn {
                role: crate::llm::messages::Role::User,
                content: vec![ContentBlock::text("Hi"), ContentBlock::cache_marker(ttl)],
            }],
        }
    }

    #[test]
    fn test_request_body_layout() {
        let body = AnthropicEncoder::request_body(&request(CacheTtl::Short));

        assert_eq!(body["model"], "claude-test");
        assert_eq!(body["max_tokens"], 512);
        assert!(body.get("top_p").is_none());
        assert_eq!(
            body["system"][0]["cache_control"],
            json!({"type": "ephemeral", "ttl": "5m"})
        );
        assert_eq!(body["tools"][0]["cache_control"]["ttl"], "5m");

        let content = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0], json!({"type": "text", "text": "Hi"}));
        assert_eq!(content[1]["text"], "");
        assert_eq!(content[1]["cache_control"]["type"], "ephemeral");
    }

    #[test]
    fn test_beta_header_only_for_long_ttl() {
        assert_eq!(AnthropicEncoder::beta_header(&request(CacheTtl::Short)), None);
        assert_eq!(
            AnthropicEncoder::beta_header(&request(CacheTtl::Long)),
            Some(EXTENDED_CACHE_TTL_BETA)
        );
    }

    #[test]
    fn test_request_headers_carry_version_and_beta() {
        let short = AnthropicEncoder::request_headers(&request(CacheTtl::Short), "2023-06-01");
        assert_eq!(
            short,
            vec![
                ("anthropic-version", "2023-06-01".to_string()),
                ("content-type", "application/json".to_string()),
            ]
        );

        let long = AnthropicEncoder::request_headers(&request(CacheTtl::Long), "2023-06-01");
        assert_eq!(
            long.last(),
            Some(&("anthropic-beta", EXTENDED_CACHE_TTL_BETA.to_string()))
        );
    }

    #[test]
    fn test_tool_use_block_encoding() {
        let block = ContentBlock::tool_use("toolu_1", "set_gain", json!({"db": 3}));
        assert_eq!(
            AnthropicEncoder::content_block(&block),
            json!({"type": "tool_use", "id": "toolu_1", "name": "set_gain", "input": {"db": 3}})
        );
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let first = serde_json::to_string(&AnthropicEncoder::request_body(&request(CacheTtl::Long)))
            .unwrap();
        let second =
            serde_json::to_string(&AnthropicEncoder::request_body(&request(CacheTtl::Long)))
                .unwrap();
        assert_eq!(first, second);
    }
}
