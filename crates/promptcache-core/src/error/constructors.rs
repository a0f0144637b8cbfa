//! Constructor methods for PromptCacheError

use super::types::PromptCacheError;

impl PromptCacheError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            provider: None,
        }
    }

    /// Create a transport error attributed to a provider
    pub fn transport_with_provider(message: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error for a named field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn busy(session_id: impl Into<String>) -> Self {
        Self::Busy {
            session_id: session_id.into(),
        }
    }

    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: None,
        }
    }

    /// Create a JSON error with context
    pub fn json_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create an IO error for a path
    pub fn io_at(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }
}
