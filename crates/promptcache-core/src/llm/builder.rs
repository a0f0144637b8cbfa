//! Cache-aware request builder
//!
//! Section order decides which bytes are shared between consecutive requests
//! and therefore which prefix the provider can serve from cache:
//!
//! 1. system preamble (breakpoint)
//! 2. optional large document (breakpoint)
//! 3. optional tool catalog (breakpoint on the last tool only)
//! 4. transcript turns, unmodified
//! 5. new user turn: the real text, then an empty marker block (breakpoint)
//!
//! The marker block lets the whole request so far become the next cached
//! prefix without touching the user's text.

use crate::cache::{BreakpointOverflow, CacheBreakpoint};
use crate::config::{CacheSettings, ProviderSettings, StaticAssets};
use crate::error::{PromptCacheError, PromptCacheResult};
use crate::llm::messages::{ContentBlock, Role, Turn};
use crate::llm::request::{
    GenerationParams, OutboundRequest, RequestOptions, SystemBlock, SystemBlockKind,
};
use crate::session::transcript::Transcript;
use std::sync::Arc;
use tracing::instrument;

/// Assembles outbound requests from static assets and a transcript
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    assets: Arc<StaticAssets>,
    model: String,
    params: GenerationParams,
    cache: CacheSettings,
}

impl RequestBuilder {
    /// Create a builder; fails if the cache settings are unusable
    pub fn new(
        assets: Arc<StaticAssets>,
        provider: &ProviderSettings,
        cache: CacheSettings,
    ) -> PromptCacheResult<Self> {
        cache.validate()?;
        Ok(Self {
            assets,
            model: provider.model.clone(),
            params: provider.generation_params(),
            cache,
        })
    }

    pub fn assets(&self) -> &StaticAssets {
        &self.assets
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn cache_settings(&self) -> CacheSettings {
        self.cache
    }

    /// Build the request for a new user turn
    #[instrument(skip_all, fields(history_turns = transcript.len(), ttl = %options.ttl()))]
    pub fn build(
        &self,
        transcript: &Transcript,
        new_user_text: &str,
        options: &RequestOptions,
    ) -> PromptCacheResult<OutboundRequest> {
        if new_user_text.is_empty() {
            return Err(PromptCacheError::invalid_field(
                "new_user_text",
                "User text must not be empty",
            ));
        }

        let breakpoint = CacheBreakpoint::new(options.ttl());

        let mut system = vec![SystemBlock {
            kind: SystemBlockKind::Preamble,
            text: self.assets.system_preamble.clone(),
            cache: Some(breakpoint),
        }];

        if options.include_large_document {
            match &self.assets.document {
                Some(document) => system.push(SystemBlock {
                    kind: SystemBlockKind::Document,
                    text: document.clone(),
                    cache: Some(breakpoint),
                }),
                None => tracing::debug!("Large document requested but none is configured"),
            }
        }

        let mut tools = Vec::new();
        if options.include_tools {
            tools.extend(self.assets.tools.iter().cloned().map(|mut tool| {
                tool.cache = None;
                tool
            }));
            // One breakpoint on the last tool caches the whole catalog.
            if let Some(last) = tools.last_mut() {
                last.cache = Some(breakpoint);
            }
        }

        let history: &[Turn] = if options.reset_conversation {
            &[]
        } else {
            transcript.turns()
        };

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.extend_from_slice(history);
        messages.push(Turn {
            role: Role::User,
            content: vec![
                ContentBlock::text(new_user_text),
                ContentBlock::cache_marker(options.ttl()),
            ],
        });

        let mut request = OutboundRequest {
            model: self.model.clone(),
            params: self.params.clone(),
            system,
            tools,
            messages,
        };

        self.enforce_ceiling(&mut request)?;

        tracing::debug!(
            breakpoints = ?request.breakpoint_sites(),
            system_blocks = request.system.len(),
            tools = request.tools.len(),
            messages = request.messages.len(),
            "Assembled outbound request"
        );

        Ok(request)
    }

    /// Apply the overflow policy when the request carries too many breakpoints
    fn enforce_ceiling(&self, request: &mut OutboundRequest) -> PromptCacheResult<()> {
        let max = self.cache.max_breakpoints;
        let count = request.breakpoint_count();
        if count <= max {
            return Ok(());
        }

        if self.cache.overflow == BreakpointOverflow::Reject {
            return Err(PromptCacheError::BreakpointLimit { count, max });
        }

        let mut sites = request.breakpoint_sites();
        sites.sort();

        let mut remaining = count;
        for site in sites.into_iter().filter(|s| s.is_droppable()) {
            if remaining <= max {
                break;
            }
            if request.strip_breakpoint(site) {
                remaining -= 1;
                tracing::warn!(%site, max, "Dropped cache breakpoint to stay within the ceiling");
            }
        }

        if remaining > max {
            return Err(PromptCacheError::BreakpointLimit {
                count: remaining,
                max,
            });
        }
        Ok(())
    }
}
