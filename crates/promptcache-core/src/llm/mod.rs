//! Request assembly, wire encoding and reply parsing

pub mod builder;
pub mod converters;
pub mod messages;
pub mod parsers;
pub mod request;
pub mod transport;


pub use builder::RequestBuilder;
pub use converters::{AnthropicEncoder, EXTENDED_CACHE_TTL_BETA};
pub use messages::{ContentBlock, ModelReply, Role, ToolDefinition, Turn};
pub use parsers::ResponseParser;
pub use request::{GenerationParams, OutboundRequest, RequestOptions, SystemBlock, SystemBlockKind};
pub use transport::Transport;

#[cfg(test)]
pub use transport::MockTransport;
