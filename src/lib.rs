//! promptcache
//!
//! Prompt-cache aware request assembly and conversation state for
//! prefix-caching LLM backends. See [`promptcache_core`] for the full API.

pub use promptcache_core::*;
