//! Common types shared across promptcache

use serde::{Deserialize, Serialize};

/// Token usage reported by the provider for one exchange
///
/// Cache creation is split by TTL class because the two classes are billed
/// differently: 5-minute writes cost 25% over base input, 1-hour writes 100%.
/// Cache reads cost 10% of base input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UsageCounters {
    /// Uncached input tokens (after the last breakpoint)
    pub input_tokens: u32,
    /// Generated tokens
    pub output_tokens: u32,
    /// Tokens written to the 5-minute cache
    pub cache_creation_5m_tokens: u32,
    /// Tokens written to the 1-hour cache
    pub cache_creation_1h_tokens: u32,
    /// Tokens served from cache
    pub cache_read_tokens: u32,
}

impl UsageCounters {
    /// Create counters without any cache activity
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            ..Self::default()
        }
    }

    /// Add usage from another exchange
    pub fn add(&mut self, other: &UsageCounters) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
        self.cache_creation_5m_tokens = self
            .cache_creation_5m_tokens
            .saturating_add(other.cache_creation_5m_tokens);
        self.cache_creation_1h_tokens = self
            .cache_creation_1h_tokens
            .saturating_add(other.cache_creation_1h_tokens);
        self.cache_read_tokens = self.cache_read_tokens.saturating_add(other.cache_read_tokens);
    }

    /// Tokens written to cache across both TTL classes
    pub fn cache_creation_tokens(&self) -> u32 {
        self.cache_creation_5m_tokens
            .saturating_add(self.cache_creation_1h_tokens)
    }

    /// Every input token the model processed, cached or not
    pub fn total_input_tokens(&self) -> u32 {
        self.input_tokens
            .saturating_add(self.cache_creation_tokens())
            .saturating_add(self.cache_read_tokens)
    }

    pub fn has_cache_activity(&self) -> bool {
        self.cache_creation_tokens() > 0 || self.cache_read_tokens > 0
    }

    /// Fraction of input tokens served from cache, in `[0, 1]`
    pub fn cache_hit_ratio(&self) -> f64 {
        let total = self.total_input_tokens();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.cache_read_tokens) / f64::from(total)
    }
}
