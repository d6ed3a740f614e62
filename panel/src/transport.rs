//! Network seams of the message panel.
//!
//! Both traits are `?Send`: the panel lives on a single UI thread in the
//! browser and on a single task in the CLI.

use async_trait::async_trait;
use frames::{ChatMessage, CodecError, HistoryRequest, SendRequest, SocketEvent};

/// Error surfaced by a panel transport.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be parsed.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The realtime channel has no live connection behind it.
    #[error("realtime channel closed")]
    ChannelClosed,

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// REST endpoints for message history and persistence.
#[async_trait(?Send)]
pub trait MessageApi {
    /// Fetch the ordered history of a conversation.
    ///
    /// # Errors
    ///
    /// Returns a [`PanelError`] when the request fails or the body is invalid.
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<Vec<ChatMessage>, PanelError>;

    /// Persist one message. The acknowledgement body is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`PanelError`] when the request fails.
    async fn send_message(&self, request: &SendRequest) -> Result<(), PanelError>;
}

/// Outgoing half of the realtime channel.
pub trait RealtimeChannel {
    /// Queue `event` for delivery. Never waits on the network.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::ChannelClosed`] when no connection is attached.
    fn emit(&self, event: &SocketEvent) -> Result<(), PanelError>;
}
