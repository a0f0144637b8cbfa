//! Transport seam to the remote model

use crate::error::PromptCacheResult;
use crate::llm::messages::ModelReply;
use crate::llm::request::OutboundRequest;
use async_trait::async_trait;

/// Sends an assembled request and returns the model's reply.
///
/// Implemented by the host application (HTTP client, proxy, test double).
/// Any failure (network error, non-success status, malformed reply) is
/// reported as an error; the conversation then leaves its transcript as it
/// was. Implementations should not retry on their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> PromptCacheResult<ModelReply>;
}
