//! promptcache core library
//!
//! Shapes requests for prefix-caching LLM backends and keeps the
//! conversation transcript faithful to what the model actually received:
//!
//! - [`llm::RequestBuilder`] lays out system preamble, reference document,
//!   tool catalog, history and the new user turn, with cache breakpoints at
//!   the boundaries that keep the shared prefix byte-identical between turns.
//! - [`session::ConversationStore`] records completed exchanges with the
//!   bookkeeping marker stripped, and discards replies that arrive after a
//!   reset.
//! - [`session::Conversation`] serializes exchanges per session and bounds
//!   each round trip by a timeout and an optional cancellation token.
//!
//! The transport to the provider is injected through [`llm::Transport`].

pub mod cache;
pub mod config;
pub mod error;
pub mod llm;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use cache::{BreakpointOverflow, BreakpointSite, CacheBreakpoint, CacheTtl};
pub use config::{
    CacheSettings, ConcurrencyPolicy, ProviderSettings, SessionSettings, Settings, StaticAssets,
};
pub use error::{PromptCacheError, PromptCacheResult};
pub use llm::{
    AnthropicEncoder, ContentBlock, ModelReply, OutboundRequest, RequestBuilder, RequestOptions,
    ResponseParser, Role, ToolDefinition, Transport, Turn,
};
pub use session::{
    Conversation, ConversationStore, ExchangeOutcome, RecordOutcome, SessionRegistry, Transcript,
};
pub use types::UsageCounters;
