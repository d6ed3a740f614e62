#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use frames::Contact;
use panel::PanelCore;

/// WebSocket connection lifecycle as shown to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    /// CSS class for the header's connection dot.
    pub fn dot_class(self) -> &'static str {
        match self {
            Self::Connected => "connection__dot connection__dot--connected",
            Self::Connecting => "connection__dot connection__dot--connecting",
            Self::Disconnected => "connection__dot connection__dot--disconnected",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Connected => "Connected",
            Self::Connecting => "Connecting...",
            Self::Disconnected => "Disconnected",
        }
    }
}

/// State for the message panel.
#[derive(Clone, Debug, Default)]
pub struct ChatState {
    pub panel: PanelCore,
    pub connection_status: ConnectionStatus,
}

/// One rendered message row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRow {
    pub key: String,
    pub class: &'static str,
    pub text: String,
}

impl ChatState {
    /// Contact of the open conversation.
    pub fn contact(&self) -> Option<&Contact> {
        self.panel.conversation().map(|c| &c.contact)
    }

    /// Rows for the message list, in display order.
    pub fn rows(&self) -> Vec<MessageRow> {
        self.panel
            .messages()
            .iter()
            .map(|entry| MessageRow {
                key: entry.key.to_string(),
                class: message_class(entry.from_self),
                text: entry.text.clone(),
            })
            .collect()
    }
}

/// CSS class for a message bubble.
pub fn message_class(from_self: bool) -> &'static str {
    if from_self { "message message--sent" } else { "message message--received" }
}
