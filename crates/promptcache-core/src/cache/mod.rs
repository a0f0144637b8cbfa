//! Cache breakpoint primitives
//!
//! A breakpoint marks the end of a cacheable prefix. The provider caches
//! everything up to and including the annotated block, so one breakpoint
//! placed late in the request covers all content before it.

pub mod breakpoint;

pub use breakpoint::{BreakpointOverflow, BreakpointSite, CacheBreakpoint, CacheTtl};
