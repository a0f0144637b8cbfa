//! Conversation state: transcript, store, per-session driver and registry

pub mod conversation;
pub mod registry;
pub mod store;
pub mod transcript;


pub use conversation::{Conversation, ExchangeOutcome};
pub use registry::SessionRegistry;
pub use store::{
    ConversationStore, ExchangeTicket, PreparedExchange, RecordOutcome, sanitize_user_turn,
};
pub use transcript::Transcript;
