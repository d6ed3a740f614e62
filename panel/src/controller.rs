//! Async message panel driven by pluggable transports.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use frames::{Contact, SocketEvent};

use crate::state::{Action, Conversation, Outgoing, PanelCore};
use crate::transport::{MessageApi, RealtimeChannel};

/// A [`PanelCore`] bundled with the transports that feed it.
pub struct Panel<A, C> {
    user_id: String,
    core: PanelCore,
    api: A,
    channel: C,
}

impl<A: MessageApi, C: RealtimeChannel> Panel<A, C> {
    pub fn new(user_id: impl Into<String>, api: A, channel: C) -> Self {
        Self { user_id: user_id.into(), core: PanelCore::new(), api, channel }
    }

    #[must_use]
    pub fn core(&self) -> &PanelCore {
        &self.core
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Give back the transports, dropping the panel state.
    pub fn into_transports(self) -> (A, C) {
        (self.api, self.channel)
    }

    /// Open the conversation with `contact` and load its history.
    ///
    /// Issues exactly one history request. A failure is logged and leaves
    /// the (freshly cleared) list as it is.
    pub async fn open(&mut self, contact: Contact) -> Action {
        let ticket = self.core.select(Conversation { user_id: self.user_id.clone(), contact });

        match self.api.fetch_history(ticket.request()).await {
            Ok(messages) => self.core.apply_history(ticket, messages),
            Err(e) => {
                self.core.history_failed(ticket, &e);
                Action::None
            }
        }
    }

    /// Append `text` and emit it on the realtime channel.
    ///
    /// Returns the outgoing message so the caller decides when to persist
    /// `request`. An emit failure is logged and otherwise dropped.
    pub fn dispatch(&mut self, text: &str) -> Option<Outgoing> {
        let outgoing = self.core.compose(text)?;

        if let Err(e) = self.channel.emit(&outgoing.event) {
            tracing::warn!(error = %e, to = %outgoing.request.to, "realtime emit failed");
        }

        Some(outgoing)
    }

    /// Send `text` to the open conversation and wait for it to be saved.
    ///
    /// The entry is appended before any I/O starts. The realtime emit is
    /// queued before the persistence request, so it never waits on it.
    /// Failures of either are logged and otherwise dropped.
    pub async fn send(&mut self, text: &str) -> Action {
        let Some(outgoing) = self.dispatch(text) else {
            return Action::None;
        };

        if let Err(e) = self.api.send_message(&outgoing.request).await {
            tracing::warn!(error = %e, to = %outgoing.request.to, "message persistence failed");
        }

        Action::ScrollTo(outgoing.key)
    }

    /// Apply an incoming realtime event.
    pub fn handle_event(&mut self, event: SocketEvent) -> Action {
        self.core.apply_event(event)
    }
}
