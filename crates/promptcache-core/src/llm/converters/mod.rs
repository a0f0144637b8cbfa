//! Wire format conversion for outbound requests

pub mod anthropic;

pub use anthropic::{AnthropicEncoder, EXTENDED_CACHE_TTL_BETA};
