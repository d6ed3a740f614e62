//! Message panel engine for two-party chat.
//!
//! This crate holds everything about the message panel that does not depend
//! on a UI toolkit or a network stack: the visible message list, history
//! requests stamped with a generation, optimistic sends, realtime receives,
//! and the scroll anchor. The browser client keeps a [`state::PanelCore`] in a
//! signal; the CLI drives a [`controller::Panel`] over `reqwest` and a websocket.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`list`] | Ordered message entries with display keys |
//! | [`state`] | Synchronous panel state and its mutations |
//! | [`transport`] | REST and realtime seams plus [`transport::PanelError`] |
//! | [`controller`] | Async controller wiring the core to the transports |

pub mod controller;
pub mod list;
pub mod state;
pub mod transport;

pub use crate::controller::Panel;
pub use crate::list::{MessageEntry, MessageKey, MessageList};
pub use crate::state::{Action, Conversation, HistoryTicket, Outgoing, PanelCore, Phase};
pub use crate::transport::{MessageApi, PanelError, RealtimeChannel};
