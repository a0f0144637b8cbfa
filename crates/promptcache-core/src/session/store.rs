//! Conversation store: owns the transcript and applies completed exchanges

use crate::error::PromptCacheResult;
use crate::llm::builder::RequestBuilder;
use crate::llm::messages::{ModelReply, Role, Turn};
use crate::llm::request::{OutboundRequest, RequestOptions};
use crate::session::transcript::Transcript;

/// What a built request needs to be recorded later
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeTicket {
    /// Transcript generation the request was built against
    pub generation: u64,
    /// The user turn exactly as sent, marker block included
    pub sent_user_turn: Turn,
    /// The request was built from an empty transcript
    pub reset_conversation: bool,
}

/// A request ready to send together with its recording ticket
#[derive(Debug, Clone)]
pub struct PreparedExchange {
    pub request: OutboundRequest,
    pub ticket: ExchangeTicket,
}

/// Result of trying to record an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The exchange was appended
    Applied,
    /// The transcript was reset after the request was built; nothing changed
    Discarded,
}

/// Canonical transcript for one session
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    transcript: Transcript,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing transcript
    pub fn with_transcript(transcript: Transcript) -> Self {
        Self { transcript }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn generation(&self) -> u64 {
        self.transcript.generation()
    }

    /// Clear the transcript unconditionally
    pub fn reset(&mut self) {
        let dropped = self.transcript.len();
        self.transcript.clear();
        tracing::debug!(
            dropped_turns = dropped,
            generation = self.transcript.generation(),
            "Transcript reset"
        );
    }

    /// Build the next request and the ticket needed to record its outcome
    pub fn prepare(
        &self,
        builder: &RequestBuilder,
        new_user_text: &str,
        options: &RequestOptions,
    ) -> PromptCacheResult<PreparedExchange> {
        let request = builder.build(&self.transcript, new_user_text, options)?;
        let sent_user_turn = request
            .pending_turn()
            .cloned()
            .unwrap_or_else(|| Turn::user(new_user_text));

        Ok(PreparedExchange {
            request,
            ticket: ExchangeTicket {
                generation: self.transcript.generation(),
                sent_user_turn,
                reset_conversation: options.reset_conversation,
            },
        })
    }

    /// Append a completed exchange.
    ///
    /// Call only after a successful round trip. The user turn is sanitized
    /// (marker block removed, annotations cleared) and the assistant turn is
    /// taken from the reply verbatim. A ticket from an older generation is
    /// discarded without touching the transcript.
    pub fn record_exchange(&mut self, ticket: ExchangeTicket, reply: &ModelReply) -> RecordOutcome {
        let current = self.transcript.generation();
        if ticket.generation != current {
            tracing::warn!(
                built = ticket.generation,
                current,
                "Discarding exchange built before a reset"
            );
            return RecordOutcome::Discarded;
        }

        if ticket.reset_conversation {
            self.transcript.clear();
        }

        let user = sanitize_user_turn(ticket.sent_user_turn);
        if let Err(err) = self.transcript.push_exchange(user, reply.to_turn()) {
            tracing::warn!(error = %err, "Refusing to record malformed exchange");
            return RecordOutcome::Discarded;
        }
        RecordOutcome::Applied
    }
}

/// Strip caching artifacts from a sent user turn.
///
/// Removes every empty marker block and clears any remaining breakpoint, so
/// the stored turn equals a plain user message.
pub fn sanitize_user_turn(turn: Turn) -> Turn {
    let content = turn
        .content
        .into_iter()
        .filter(|block| !block.is_cache_marker())
        .map(|mut block| {
            block.set_breakpoint(None);
            block
        })
        .collect();
    Turn {
        role: Role::User,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheBreakpoint, CacheTtl};
    use crate::config::{CacheSettings, ProviderSettings, StaticAssets};
    use crate::llm::messages::ContentBlock;
    use std::sync::Arc;

    fn builder() -> RequestBuilder {
        RequestBuilder::new(
            Arc::new(StaticAssets::new("You are terse.")),
            &ProviderSettings::default(),
            CacheSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_sanitize_removes_marker_and_annotations() {
        let turn = Turn {
            role: Role::User,
            content: vec![
                ContentBlock::text("Hi").with_breakpoint(CacheBreakpoint::short()),
                ContentBlock::cache_marker(CacheTtl::Long),
            ],
        };
        let once = sanitize_user_turn(turn);
        assert_eq!(once, Turn::user("Hi"));
        assert_eq!(sanitize_user_turn(once.clone()), once);
    }

    #[test]
    fn test_record_appends_sanitized_pair() {
        let mut store = ConversationStore::new();
        let prepared = store
            .prepare(&builder(), "Hi", &RequestOptions::default())
            .unwrap();
        assert_eq!(prepared.ticket.sent_user_turn.content.len(), 2);

        let outcome = store.record_exchange(prepared.ticket, &ModelReply::text("m", "Hello"));
        assert_eq!(outcome, RecordOutcome::Applied);
        assert_eq!(
            store.transcript().turns(),
            &[
                Turn::user("Hi"),
                Turn::assistant(vec![ContentBlock::text("Hello")])
            ]
        );
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut store = ConversationStore::new();
        let prepared = store
            .prepare(&builder(), "Hi", &RequestOptions::default())
            .unwrap();
        store.reset();

        let outcome = store.record_exchange(prepared.ticket, &ModelReply::text("m", "Hello"));
        assert_eq!(outcome, RecordOutcome::Discarded);
        assert!(store.transcript().is_empty());
    }

    #[test]
    fn test_reset_option_applies_only_on_record() {
        let builder = builder();
        let mut store = ConversationStore::new();
        let first = store
            .prepare(&builder, "One", &RequestOptions::default())
            .unwrap();
        store.record_exchange(first.ticket, &ModelReply::text("m", "1"));

        let options = RequestOptions::default().with_reset(true);
        let second = store.prepare(&builder, "Two", &options).unwrap();
        assert!(second.request.history().is_empty());
        // Still intact until the reply is recorded.
        assert_eq!(store.transcript().len(), 2);

        store.record_exchange(second.ticket, &ModelReply::text("m", "2"));
        assert_eq!(store.transcript().len(), 2);
        assert_eq!(store.transcript().turns()[0], Turn::user("Two"));
    }

    #[test]
    fn test_empty_reply_is_refused() {
        let builder = builder();
        let mut store = ConversationStore::new();
        let prepared = store
            .prepare(&builder, "Hi", &RequestOptions::default())
            .unwrap();

        let mut reply = ModelReply::text("m", "unused");
        reply.content.clear();
        let outcome = store.record_exchange(prepared.ticket, &reply);
        assert_eq!(outcome, RecordOutcome::Discarded);
        assert!(store.transcript().is_empty());

        let next = store
            .prepare(&builder, "Hi", &RequestOptions::default())
            .unwrap();
        assert!(next.request.history().is_empty());
    }
}
