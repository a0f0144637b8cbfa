//! Error types for promptcache
//!
//! A single error enum covers configuration, transport, input validation and
//! the session-level failures (busy, timeout, cancellation). Transport
//! failures are deliberately opaque: callers only learn that the round trip
//! failed and that the transcript was left untouched.

mod constructors;
mod conversions;
mod types;

pub use types::{PromptCacheError, PromptCacheResult};
