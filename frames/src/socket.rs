//! Socket.IO v4 text packets carried over Engine.IO v4 websockets.
//!
//! PACKET LAYOUT
//! =============
//! Every websocket text message starts with an Engine.IO type digit. Type `4`
//! (message) wraps a Socket.IO packet, which has its own type digit. Events
//! are Socket.IO type `2`, so an event on the default namespace looks like
//! `42["send-msg",{"to":"b","from":"a","message":"hi"}]`.
//!
//! Only the text subset is handled; binary attachments are never sent by the
//! chat server.

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::CodecError;

/// Socket.IO connect request for the default namespace.
pub const CONNECT_PACKET: &str = "40";

/// Engine.IO pong, sent in reply to every server ping.
pub const PONG_PACKET: &str = "3";

pub const EVENT_ADD_USER: &str = "add-user";
pub const EVENT_SEND_MSG: &str = "send-msg";
/// Incoming message event. The server spells it this way.
pub const EVENT_MSG_RECEIVE: &str = "msg-recieve";

/// Payload of the outgoing `send-msg` event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMsg {
    pub to: String,
    pub from: String,
    pub message: String,
}

/// An application-level socket event.
#[derive(Clone, Debug, PartialEq)]
pub enum SocketEvent {
    /// Registers the connected socket under a user id.
    AddUser { user_id: String },
    /// Direct delivery of a freshly sent message to the peer.
    SendMsg(SendMsg),
    /// A message from the peer arrived.
    MsgReceive { message: String },
    /// Any event this client does not act on.
    Other { name: String, payload: Value },
}

impl SocketEvent {
    /// Wire name of the event.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::AddUser { .. } => EVENT_ADD_USER,
            Self::SendMsg(_) => EVENT_SEND_MSG,
            Self::MsgReceive { .. } => EVENT_MSG_RECEIVE,
            Self::Other { name, .. } => name,
        }
    }

    fn payload(&self) -> Value {
        match self {
            Self::AddUser { user_id } => Value::String(user_id.clone()),
            Self::SendMsg(msg) => serde_json::json!({
                "to": msg.to,
                "from": msg.from,
                "message": msg.message,
            }),
            Self::MsgReceive { message } => Value::String(message.clone()),
            Self::Other { payload, .. } => payload.clone(),
        }
    }

    fn from_parts(name: &str, payload: Value) -> Result<Self, CodecError> {
        match name {
            EVENT_MSG_RECEIVE => match payload {
                Value::String(message) => Ok(Self::MsgReceive { message }),
                other => Err(CodecError::MalformedEvent(format!(
                    "{EVENT_MSG_RECEIVE} expects a string payload, got {other}"
                ))),
            },
            EVENT_ADD_USER => match payload {
                Value::String(user_id) => Ok(Self::AddUser { user_id }),
                other => Err(CodecError::MalformedEvent(format!(
                    "{EVENT_ADD_USER} expects a string payload, got {other}"
                ))),
            },
            EVENT_SEND_MSG => Ok(Self::SendMsg(serde_json::from_value(payload)?)),
            _ => Ok(Self::Other { name: name.to_owned(), payload }),
        }
    }
}

/// Engine.IO open handshake sent by the server right after the upgrade.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

/// A decoded websocket text message.
#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Noop,
    /// Namespace connect acknowledged.
    Connect,
    ConnectError(String),
    Disconnect,
    Event(SocketEvent),
    /// Acknowledgement for an emit; this client never requests acks.
    Ack,
}

/// Encode an event as a Socket.IO event packet on the default namespace.
#[must_use]
pub fn encode_event(event: &SocketEvent) -> String {
    let body = Value::Array(vec![Value::String(event.name().to_owned()), event.payload()]);
    format!("42{body}")
}

/// Decode one websocket text message.
///
/// # Errors
///
/// Returns [`CodecError::Empty`] for empty input, [`CodecError::UnknownType`]
/// for unrecognized type digits, and JSON or shape errors for bad bodies.
pub fn decode_packet(raw: &str) -> Result<Packet, CodecError> {
    let mut chars = raw.chars();
    let Some(kind) = chars.next() else {
        return Err(CodecError::Empty);
    };
    let rest = chars.as_str();

    match kind {
        '0' => Ok(Packet::Open(serde_json::from_str(rest)?)),
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '5' | '6' => Ok(Packet::Noop),
        '4' => decode_socket_packet(rest),
        other => Err(CodecError::UnknownType(other)),
    }
}

fn decode_socket_packet(raw: &str) -> Result<Packet, CodecError> {
    let mut chars = raw.chars();
    let Some(kind) = chars.next() else {
        return Err(CodecError::Empty);
    };
    let body = strip_ack_id(strip_namespace(chars.as_str()));

    match kind {
        '0' => Ok(Packet::Connect),
        '1' => Ok(Packet::Disconnect),
        '2' => decode_event(body).map(Packet::Event),
        '3' => Ok(Packet::Ack),
        '4' => Ok(Packet::ConnectError(connect_error_message(body))),
        other => Err(CodecError::UnknownType(other)),
    }
}

fn decode_event(body: &str) -> Result<SocketEvent, CodecError> {
    let value = serde_json::from_str::<Value>(body)?;
    let Value::Array(mut items) = value else {
        return Err(CodecError::MalformedEvent(format!("expected array, got {body}")));
    };
    if items.is_empty() {
        return Err(CodecError::MalformedEvent("empty event array".to_owned()));
    }
    let name = match items.remove(0) {
        Value::String(name) => name,
        other => return Err(CodecError::MalformedEvent(format!("event name must be a string, got {other}"))),
    };
    let payload = if items.is_empty() { Value::Null } else { items.remove(0) };
    SocketEvent::from_parts(&name, payload)
}

/// Drop a leading `/namespace,` prefix.
fn strip_namespace(body: &str) -> &str {
    if !body.starts_with('/') {
        return body;
    }
    body.split_once(',').map_or("", |(_, rest)| rest)
}

fn strip_ack_id(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn connect_error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("connect error")
            .to_owned(),
        Ok(Value::String(message)) => message,
        _ => body.to_owned(),
    }
}

/// What a client does with a decoded packet.
#[derive(Clone, Debug, PartialEq)]
pub enum Reaction {
    /// Write this packet back to the server.
    Reply(String),
    /// The namespace is connected; write this registration packet.
    Registered(String),
    /// Hand the event to the application.
    Deliver(SocketEvent),
    /// The session is over.
    Closed(String),
    Ignore,
}

/// Drive the client side of the handshake for `user_id`.
///
/// Open is answered with a namespace connect, the connect acknowledgement
/// with an `add-user` registration, and every ping with a pong.
#[must_use]
pub fn react(packet: Packet, user_id: &str) -> Reaction {
    match packet {
        Packet::Open(_) => Reaction::Reply(CONNECT_PACKET.to_owned()),
        Packet::Connect => Reaction::Registered(encode_event(&SocketEvent::AddUser { user_id: user_id.to_owned() })),
        Packet::Ping => Reaction::Reply(PONG_PACKET.to_owned()),
        Packet::Event(event) => Reaction::Deliver(event),
        Packet::Close | Packet::Disconnect => Reaction::Closed("server closed the connection".to_owned()),
        Packet::ConnectError(message) => Reaction::Closed(message),
        Packet::Pong | Packet::Noop | Packet::Ack => Reaction::Ignore,
    }
}

/// Build the websocket URL for an HTTP(S) API host.
///
/// # Errors
///
/// Returns [`CodecError::InvalidBaseUrl`] when `base_url` is neither
/// `http://` nor `https://`.
pub fn socket_url(base_url: &str) -> Result<String, CodecError> {
    let base = base_url.trim_end_matches('/');
    let path = "/socket.io/?EIO=4&transport=websocket";
    if let Some(rest) = base.strip_prefix("http://") {
        return Ok(format!("ws://{rest}{path}"));
    }
    if let Some(rest) = base.strip_prefix("https://") {
        return Ok(format!("wss://{rest}{path}"));
    }

    Err(CodecError::InvalidBaseUrl(base_url.to_owned()))
}
