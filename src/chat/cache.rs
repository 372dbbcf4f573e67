use std::collections::HashMap;

use super::clock::{Clock, SystemClock};
use crate::common::{ChatError, ChatMessage, ConversationPartner, Result};
use crate::storage::KvStore;

pub const DEFAULT_CACHE_KEY: &str = "admin_chat";
pub const DEFAULT_RETENTION_MS: i64 = 60 * 60 * 1000;

#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Identity whose perspective defines who the partner of a message is.
    pub viewer: String,
    pub cache_key: String,
    pub retention_ms: i64,
}

impl CacheSettings {
    pub fn new(viewer: impl Into<String>) -> Self {
        Self {
            viewer: viewer.into(),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            retention_ms: DEFAULT_RETENTION_MS,
        }
    }
}

/// Bounded-lifetime message log for one viewer, persisted as a whole to a `KvStore`.
///
/// The partner ordering is a projection of the log and is rebuilt on every mutation.
/// Messages are never de-duplicated.
pub struct ChatCache<S, C = SystemClock> {
    store: S,
    clock: C,
    settings: CacheSettings,
    messages: Vec<ChatMessage>,
    partners: Vec<ConversationPartner>,
}

impl<S: KvStore> ChatCache<S> {
    pub fn new(store: S, settings: CacheSettings) -> Self {
        Self::with_clock(store, settings, SystemClock)
    }
}

impl<S: KvStore, C: Clock> ChatCache<S, C> {
    pub fn with_clock(store: S, settings: CacheSettings, clock: C) -> Self {
        Self {
            store,
            clock,
            settings,
            messages: Vec::new(),
            partners: Vec::new(),
        }
    }

    /// Replace the in-memory log with the stored one, drop expired messages and
    /// write the survivors back.
    ///
    /// Missing or corrupt content yields an empty log. A failed read also yields an
    /// empty log but leaves the stored value untouched.
    pub fn load(&mut self) -> &[ChatMessage] {
        let (messages, rewrite) = match self.read_log() {
            Ok(messages) => (messages, true),
            Err(err @ ChatError::CacheCorrupt(_)) => {
                log::warn!(
                    "Discarding chat cache `{}`: {err}",
                    self.settings.cache_key
                );
                (Vec::new(), true)
            }
            Err(err) => {
                log::warn!(
                    "Failed to read chat cache `{}`: {err}",
                    self.settings.cache_key
                );
                (Vec::new(), false)
            }
        };
        self.messages = messages;

        let now = self.clock.now_millis();
        let expired = self.retain_window(now);
        log::debug!(
            "Loaded {} cached messages ({expired} expired)",
            self.messages.len()
        );

        self.recompute_partners();
        if rewrite {
            self.persist();
        }
        &self.messages
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.recompute_partners();
        self.persist();
    }

    /// Record an inbound message, stamped with the local receipt time.
    pub fn receive(&mut self, mut message: ChatMessage) {
        message.timestamp = self.clock.now_millis();
        self.append(message);
    }

    /// Drop every message older than `now - retention`. Returns how many were removed.
    pub fn prune(&mut self, now: i64) -> usize {
        let removed = self.retain_window(now);
        if removed > 0 {
            log::debug!("Pruned {removed} expired chat messages");
            self.recompute_partners();
            self.persist();
        }
        removed
    }

    /// Partner identifiers, most recently active first.
    pub fn partners(&self) -> Vec<&str> {
        self.partners
            .iter()
            .map(|partner| partner.id.as_str())
            .collect()
    }

    pub fn partner_activity(&self) -> &[ConversationPartner] {
        &self.partners
    }

    /// The thread with `partner`, in log order.
    pub fn messages_with(&self, partner: &str) -> Vec<&ChatMessage> {
        self.messages
            .iter()
            .filter(|message| message.involves(partner))
            .collect()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn viewer(&self) -> &str {
        &self.settings.viewer
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn retain_window(&mut self, now: i64) -> usize {
        let cutoff = now.saturating_sub(self.settings.retention_ms);
        let before = self.messages.len();
        self.messages.retain(|message| message.timestamp >= cutoff);
        before - self.messages.len()
    }

    fn recompute_partners(&mut self) {
        let mut partners: Vec<ConversationPartner> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();

        for message in &self.messages {
            let id = message.partner_for(&self.settings.viewer);
            match slots.get(id) {
                Some(&slot) => partners[slot].last_active = message.timestamp,
                None => {
                    slots.insert(id, partners.len());
                    partners.push(ConversationPartner {
                        id: id.to_string(),
                        last_active: message.timestamp,
                    });
                }
            }
        }

        // stable: ties keep first-occurrence order
        partners.sort_by(|a, b| b.last_active.cmp(&a.last_active));
        self.partners = partners;
    }

    fn read_log(&self) -> Result<Vec<ChatMessage>> {
        match self.store.get(&self.settings.cache_key)? {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(ChatError::CacheCorrupt),
        }
    }

    fn write_log(&self) -> Result<()> {
        let json = serde_json::to_string(&self.messages).map_err(ChatError::Encode)?;
        self.store.set(&self.settings.cache_key, &json)
    }

    fn persist(&self) {
        if let Err(err) = self.write_log() {
            log::error!(
                "Failed to persist chat cache `{}`: {err}",
                self.settings.cache_key
            );
        }
    }
}
