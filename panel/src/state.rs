//! Synchronous message panel state.
//!
//! DESIGN
//! ======
//! `PanelCore` is mutated only by its owner (a Leptos signal or the CLI's
//! chat loop), so there is no locking. Network work happens outside: the
//! core hands out a [`HistoryTicket`] for every conversation switch and an
//! [`Outgoing`] for every send, and the host performs the I/O.
//!
//! A ticket carries the generation of the selection it was issued for. A
//! response that comes back after the user moved to another conversation
//! carries an old generation and is dropped, so a slow fetch can never
//! overwrite a newer conversation.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::fmt::Display;

use frames::{ChatMessage, Contact, HistoryRequest, SendMsg, SendRequest, SocketEvent};

use crate::list::{MessageKey, MessageList};

/// The two participants of the open thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversation {
    pub user_id: String,
    pub contact: Contact,
}

/// Loading lifecycle of the panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No conversation selected.
    #[default]
    Idle,
    /// History requested, response not yet applied.
    Loading,
    Ready,
}

/// Handle for one in-flight history request.
#[derive(Debug, PartialEq, Eq)]
pub struct HistoryTicket {
    generation: u64,
    request: HistoryRequest,
}

impl HistoryTicket {
    #[must_use]
    pub fn request(&self) -> &HistoryRequest {
        &self.request
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Network work produced by an optimistic send.
#[derive(Clone, Debug, PartialEq)]
pub struct Outgoing {
    /// Key of the entry already appended to the list.
    pub key: MessageKey,
    pub request: SendRequest,
    pub event: SocketEvent,
}

/// What the view should do after a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    None,
    /// Bring this entry into view.
    ScrollTo(MessageKey),
}

/// Visible state of the message panel.
#[derive(Clone, Debug, Default)]
pub struct PanelCore {
    conversation: Option<Conversation>,
    phase: Phase,
    generation: u64,
    messages: MessageList,
}

impl PanelCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Conversation ---

    /// Switch to `conversation`, clearing the list.
    ///
    /// The returned ticket must be passed back to [`Self::apply_history`] or
    /// [`Self::history_failed`].
    pub fn select(&mut self, conversation: Conversation) -> HistoryTicket {
        self.generation = self.generation.wrapping_add(1);
        self.messages.clear();
        self.phase = Phase::Loading;

        let request = HistoryRequest { from: conversation.user_id.clone(), to: conversation.contact.id.clone() };
        tracing::debug!(generation = self.generation, to = %request.to, "conversation selected");
        self.conversation = Some(conversation);

        HistoryTicket { generation: self.generation, request }
    }

    /// Close the conversation and drop the list.
    pub fn deselect(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.conversation = None;
        self.messages.clear();
        self.phase = Phase::Idle;
    }

    /// Apply a successful history response.
    ///
    /// Entries that arrived while the request was in flight stay after the
    /// history. Stale tickets are ignored.
    pub fn apply_history(&mut self, ticket: HistoryTicket, messages: Vec<ChatMessage>) -> Action {
        if !self.is_current(&ticket) {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                "dropping stale history response"
            );
            return Action::None;
        }

        self.messages.splice_history(messages);
        self.phase = Phase::Ready;
        self.scroll_action()
    }

    /// Record a failed history request. The list is left as it is.
    pub fn history_failed(&mut self, ticket: HistoryTicket, error: &dyn Display) {
        if !self.is_current(&ticket) {
            tracing::debug!(generation = ticket.generation, %error, "stale history request failed");
            return;
        }

        tracing::warn!(to = %ticket.request.to, %error, "error fetching messages");
        self.phase = Phase::Ready;
    }

    fn is_current(&self, ticket: &HistoryTicket) -> bool {
        ticket.generation == self.generation && self.phase == Phase::Loading
    }

    // --- Messages ---

    /// Append `text` as a self-authored message and describe the network
    /// work needed to deliver it.
    ///
    /// Returns `None` without touching the list when no conversation is open
    /// or the text is blank.
    pub fn compose(&mut self, text: &str) -> Option<Outgoing> {
        if text.trim().is_empty() {
            return None;
        }
        let conversation = self.conversation.as_ref()?;

        let from = conversation.user_id.clone();
        let to = conversation.contact.id.clone();
        let key = self.messages.push(true, text);

        Some(Outgoing {
            key,
            request: SendRequest { from: from.clone(), to: to.clone(), message: text.to_owned() },
            event: SocketEvent::SendMsg(SendMsg { to, from, message: text.to_owned() }),
        })
    }

    /// Append a message from the peer.
    pub fn receive(&mut self, text: impl Into<String>) -> Action {
        self.messages.push(false, text);
        self.scroll_action()
    }

    /// Route a realtime event into the list.
    pub fn apply_event(&mut self, event: SocketEvent) -> Action {
        match event {
            SocketEvent::MsgReceive { message } => self.receive(message),
            other => {
                tracing::trace!(event = other.name(), "ignoring socket event");
                Action::None
            }
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn messages(&self) -> &MessageList {
        &self.messages
    }

    /// Key of the entry the view should be scrolled to.
    #[must_use]
    pub fn scroll_anchor(&self) -> Option<MessageKey> {
        self.messages.last_key()
    }

    fn scroll_action(&self) -> Action {
        self.scroll_anchor().map_or(Action::None, Action::ScrollTo)
    }
}
