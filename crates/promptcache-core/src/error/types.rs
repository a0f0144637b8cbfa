//! Core error type

use thiserror::Error;

/// Result type alias for promptcache operations
pub type PromptCacheResult<T> = Result<T, PromptCacheError>;

/// Main error type for promptcache
#[derive(Error, Debug, Clone)]
pub enum PromptCacheError {
    /// Configuration related errors (including missing credentials)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// The remote round trip failed (network, non-success status, malformed reply)
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        provider: Option<String>,
    },

    /// Invalid caller input
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// More cache breakpoints than the provider accepts
    #[error("Cache breakpoint limit exceeded: {count} breakpoints, maximum is {max}")]
    BreakpointLimit { count: usize, max: usize },

    /// Another exchange is already in flight for the conversation
    #[error("Conversation {session_id} already has an exchange in flight")]
    Busy { session_id: String },

    /// The transport did not answer in time
    #[error("Exchange timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The caller cancelled the exchange
    #[error("Exchange was cancelled")]
    Cancelled,

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },
}

impl PromptCacheError {
    /// Short stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "CONFIG",
            Self::Transport { .. } => "TRANSPORT",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::BreakpointLimit { .. } => "BREAKPOINT_LIMIT",
            Self::Busy { .. } => "BUSY",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Cancelled => "CANCELLED",
            Self::Json { .. } => "JSON",
            Self::Io { .. } => "IO",
        }
    }

    /// Whether issuing the same exchange again may succeed.
    ///
    /// A retry must go through `Conversation::exchange` again so the request
    /// is rebuilt from the current transcript, never resent as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::Busy { .. }
        )
    }

    /// Attached context, if any
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } | Self::Json { context, .. } => context.as_deref(),
            Self::Transport { provider, .. } => provider.as_deref(),
            Self::InvalidInput { field, .. } => field.as_deref(),
            Self::Io { path, .. } => path.as_deref(),
            _ => None,
        }
    }
}
