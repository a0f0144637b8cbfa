//! From trait implementations for PromptCacheError conversions

use super::types::PromptCacheError;

impl From<std::io::Error> for PromptCacheError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for PromptCacheError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_are_retryable() {
        assert!(PromptCacheError::transport("connection reset").is_retryable());
        assert!(PromptCacheError::timeout(30).is_retryable());
        assert!(!PromptCacheError::config("missing api key").is_retryable());
        assert!(!PromptCacheError::Cancelled.is_retryable());
    }

    #[test]
    fn test_json_conversion_keeps_message() {
        let err: PromptCacheError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.error_code(), "JSON");
        assert!(err.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn test_breakpoint_limit_display() {
        let err = PromptCacheError::BreakpointLimit { count: 5, max: 4 };
        assert_eq!(
            err.to_string(),
            "Cache breakpoint limit exceeded: 5 breakpoints, maximum is 4"
        );
    }
}
