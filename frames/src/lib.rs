//! Shared wire model for the chat REST API and the realtime socket.
//!
//! This crate owns the JSON bodies exchanged with the message endpoints and
//! the Socket.IO packet codec used by both the browser client and the CLI.
//! Field names follow the server's JSON (`fromSelf`, `_id`, `avatarImage`),
//! so everything here is plain serde with renames.

pub mod socket;

use serde::{Deserialize, Serialize};

pub use socket::{
    CONNECT_PACKET, Handshake, PONG_PACKET, Packet, Reaction, SendMsg, SocketEvent,
    decode_packet, encode_event, react, socket_url,
};

/// Host used when no explicit API host is configured.
pub const DEFAULT_API_HOST: &str = "http://localhost:5000";

/// Error returned by [`decode_packet`] and [`socket_url`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The packet text was empty.
    #[error("empty packet")]
    Empty,
    /// The leading type digit is not a known Engine.IO or Socket.IO packet type.
    #[error("unknown packet type: {0:?}")]
    UnknownType(char),
    /// The packet body is not valid JSON.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    /// An event packet did not carry a `["name", ...args]` array.
    #[error("malformed event: {0}")]
    MalformedEvent(String),
    /// The base URL does not start with `http://` or `https://`.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

// =============================================================================
// REST BODIES
// =============================================================================

/// One message as returned by the history endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// `true` when the requesting user authored the message.
    pub from_self: bool,
    pub message: String,
}

/// Body of `POST /api/messages/getmsg`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub from: String,
    pub to: String,
}

/// Body of `POST /api/messages/addmsg`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub from: String,
    pub to: String,
    pub message: String,
}

/// A peer the signed-in user can open a conversation with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    /// Base64-encoded SVG avatar.
    #[serde(rename = "avatarImage", default)]
    pub avatar_image: String,
}

impl Contact {
    /// Data URI suitable for an `<img src>`.
    #[must_use]
    pub fn avatar_src(&self) -> String {
        format!("data:image/svg+xml;base64,{}", self.avatar_image)
    }
}

/// The signed-in user, as stored by the login flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "avatarImage", default)]
    pub avatar_image: Option<String>,
}

// =============================================================================
// ENDPOINTS
// =============================================================================

/// REST routes rooted at an API host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    host: String,
}

impl Endpoints {
    #[must_use]
    pub fn new(host: &str) -> Self {
        Self { host: host.trim_end_matches('/').to_owned() }
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Message history for a conversation.
    #[must_use]
    pub fn history(&self) -> String {
        format!("{}/api/messages/getmsg", self.host)
    }

    /// Message persistence.
    #[must_use]
    pub fn send(&self) -> String {
        format!("{}/api/messages/addmsg", self.host)
    }

    /// Every contact visible to `user_id`.
    #[must_use]
    pub fn contacts(&self, user_id: &str) -> String {
        format!("{}/api/auth/allusers/{user_id}", self.host)
    }

    #[must_use]
    pub fn logout(&self, user_id: &str) -> String {
        format!("{}/api/auth/logout/{user_id}", self.host)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_HOST)
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
