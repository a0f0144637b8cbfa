//! Per-session exchange driver
//!
//! A [`Conversation`] owns one [`ConversationStore`] and runs
//! build → send → record for each user turn. At most one exchange is in
//! flight per conversation; the transcript lock is only held for the
//! synchronous build and record steps, never across the network await.

use crate::error::{PromptCacheError, PromptCacheResult};
use crate::llm::builder::RequestBuilder;
use crate::llm::messages::{ModelReply, Turn};
use crate::llm::request::{OutboundRequest, RequestOptions};
use crate::llm::transport::Transport;
use crate::session::store::{ConversationStore, RecordOutcome};
use crate::session::transcript::Transcript;
use crate::config::{ConcurrencyPolicy, SessionSettings};
use crate::types::UsageCounters;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Normalized result of a successful round trip
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeOutcome {
    /// Assistant turn as stored in the transcript
    pub reply: Turn,
    pub usage: UsageCounters,
    pub model_id: String,
    pub stop_reason: Option<String>,
    /// False when a reset arrived while the exchange was in flight
    pub recorded: bool,
    /// Reply blocks of unsupported types that the transcript does not keep
    pub skipped_blocks: usize,
}

/// One independent conversation
pub struct Conversation {
    id: String,
    created_at: DateTime<Utc>,
    builder: Arc<RequestBuilder>,
    transport: Arc<dyn Transport>,
    settings: SessionSettings,
    store: Mutex<ConversationStore>,
    usage: Mutex<UsageCounters>,
    in_flight: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("turns", &self.store.lock().transcript().len())
            .finish_non_exhaustive()
    }
}

impl Conversation {
    pub fn new(
        id: impl Into<String>,
        builder: Arc<RequestBuilder>,
        transport: Arc<dyn Transport>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            builder,
            transport,
            settings,
            store: Mutex::new(ConversationStore::new()),
            usage: Mutex::new(UsageCounters::default()),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Resume from a previously saved transcript
    pub fn with_transcript(self, transcript: Transcript) -> Self {
        *self.store.lock() = ConversationStore::with_transcript(transcript);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Snapshot of the current transcript
    pub fn transcript(&self) -> Transcript {
        self.store.lock().transcript().clone()
    }

    /// Usage accumulated over every successful exchange
    pub fn usage_totals(&self) -> UsageCounters {
        *self.usage.lock()
    }

    /// Whether an exchange is currently outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Clear the transcript.
    ///
    /// Does not wait for an in-flight exchange; that exchange's reply will
    /// be discarded instead of recorded.
    pub fn reset(&self) {
        self.store.lock().reset();
        tracing::info!(session_id = %self.id, "Conversation reset");
    }

    /// Preview the request the next exchange would send, without sending it
    pub fn preview(&self, text: &str, options: &RequestOptions) -> PromptCacheResult<OutboundRequest> {
        let store = self.store.lock();
        self.builder.build(store.transcript(), text, options)
    }

    /// Run one exchange
    pub async fn exchange(
        &self,
        text: &str,
        options: &RequestOptions,
    ) -> PromptCacheResult<ExchangeOutcome> {
        self.exchange_with_cancel(text, options, &CancellationToken::new())
            .await
    }

    /// Run one exchange that the caller can cancel.
    ///
    /// Cancellation is honored while queued behind another exchange as well as
    /// during the round trip. Timeout, cancellation and transport failure all
    /// leave the transcript exactly as it was before the call.
    #[instrument(skip_all, fields(session_id = %self.id))]
    pub async fn exchange_with_cancel(
        &self,
        text: &str,
        options: &RequestOptions,
        cancel: &CancellationToken,
    ) -> PromptCacheResult<ExchangeOutcome> {
        let _slot = match self.settings.concurrency {
            ConcurrencyPolicy::Queue => tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PromptCacheError::Cancelled),
                slot = self.in_flight.lock() => slot,
            },
            ConcurrencyPolicy::Reject => self
                .in_flight
                .try_lock()
                .map_err(|_| PromptCacheError::busy(&self.id))?,
        };

        let prepared = self.store.lock().prepare(&self.builder, text, options)?;

        let reply = match self.send(&prepared.request, cancel).await {
            // An empty assistant turn would poison every later replay.
            Ok(reply) if reply.content.is_empty() => {
                tracing::warn!("Reply carried no content; transcript unchanged");
                return Err(PromptCacheError::transport("Reply carried no content blocks"));
            }
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "Exchange failed; transcript unchanged");
                return Err(err);
            }
        };

        let outcome = self.store.lock().record_exchange(prepared.ticket, &reply);
        self.usage.lock().add(&reply.usage);

        tracing::debug!(
            recorded = outcome == RecordOutcome::Applied,
            cache_read = reply.usage.cache_read_tokens,
            cache_write = reply.usage.cache_creation_tokens(),
            "Exchange completed"
        );

        Ok(ExchangeOutcome {
            reply: reply.to_turn(),
            usage: reply.usage,
            model_id: reply.model,
            stop_reason: reply.stop_reason,
            recorded: outcome == RecordOutcome::Applied,
            skipped_blocks: reply.skipped_blocks,
        })
    }

    async fn send(
        &self,
        request: &OutboundRequest,
        cancel: &CancellationToken,
    ) -> PromptCacheResult<ModelReply> {
        let timeout = self.settings.request_timeout();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PromptCacheError::Cancelled),
            result = tokio::time::timeout(timeout, self.transport.send(request)) => match result {
                Ok(reply) => reply,
                Err(_) => Err(PromptCacheError::timeout(self.settings.request_timeout_secs)),
            },
        }
    }
}
