use std::fmt;

use frames::ChatMessage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(test)]
#[path = "list_test.rs"]
mod list_test;

/// Display key for a rendered entry. Assigned once on insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageKey(Uuid);

impl MessageKey {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One row in the message panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageEntry {
    pub key: MessageKey,
    pub from_self: bool,
    pub text: String,
}

impl MessageEntry {
    fn new(from_self: bool, text: String) -> Self {
        Self { key: MessageKey::fresh(), from_self, text }
    }
}

impl From<ChatMessage> for MessageEntry {
    fn from(msg: ChatMessage) -> Self {
        Self::new(msg.from_self, msg.message)
    }
}

/// Messages in append order.
#[derive(Clone, Debug, Default)]
pub struct MessageList {
    entries: Vec<MessageEntry>,
}

impl MessageList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its key.
    pub fn push(&mut self, from_self: bool, text: impl Into<String>) -> MessageKey {
        let entry = MessageEntry::new(from_self, text.into());
        let key = entry.key;
        self.entries.push(entry);
        key
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the list with `history`, keeping entries already present
    /// after it in their current order.
    pub fn splice_history(&mut self, history: Vec<ChatMessage>) {
        let live = std::mem::take(&mut self.entries);
        self.entries = history.into_iter().map(MessageEntry::from).collect();
        self.entries.extend(live);
    }

    #[must_use]
    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last_key(&self) -> Option<MessageKey> {
        self.entries.last().map(|e| e.key)
    }
}
