//! Registry of independent conversations

use crate::config::{SessionSettings, Settings, StaticAssets};
use crate::error::PromptCacheResult;
use crate::llm::builder::RequestBuilder;
use crate::llm::transport::Transport;
use crate::session::conversation::Conversation;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Holds every live conversation of a process.
///
/// Conversations share the builder and transport, both read-only; each owns
/// its transcript, so exchanges on different sessions run fully in parallel.
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<Conversation>>,
    builder: Arc<RequestBuilder>,
    transport: Arc<dyn Transport>,
    settings: SessionSettings,
}

impl SessionRegistry {
    /// Validate settings and create an empty registry.
    ///
    /// Missing or invalid credentials fail here, before any request is
    /// accepted.
    pub fn from_settings(
        settings: &Settings,
        assets: Arc<StaticAssets>,
        transport: Arc<dyn Transport>,
    ) -> PromptCacheResult<Self> {
        settings.validate()?;
        let builder = RequestBuilder::new(assets, &settings.provider, settings.cache)?;
        tracing::info!(
            model = %settings.provider.model,
            max_breakpoints = settings.cache.max_breakpoints,
            "Session registry ready"
        );
        Ok(Self::new(Arc::new(builder), transport, settings.session))
    }

    pub fn new(
        builder: Arc<RequestBuilder>,
        transport: Arc<dyn Transport>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            builder,
            transport,
            settings,
        }
    }

    /// Create a conversation with a fresh id
    pub fn create(&self) -> Arc<Conversation> {
        let id = Uuid::new_v4().to_string();
        self.get_or_create(&id)
    }

    /// Look up a conversation, creating it if needed
    pub fn get_or_create(&self, id: &str) -> Arc<Conversation> {
        self.sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id = id, "Creating conversation");
                Arc::new(Conversation::new(
                    id,
                    Arc::clone(&self.builder),
                    Arc::clone(&self.transport),
                    self.settings,
                ))
            })
            .clone()
    }

    pub fn get(&self, id: &str) -> Option<Arc<Conversation>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop a conversation; an in-flight exchange still completes on its own handle
    pub fn remove(&self, id: &str) -> Option<Arc<Conversation>> {
        self.sessions.remove(id).map(|(_, conversation)| conversation)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Ids of all live conversations
    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }
}
