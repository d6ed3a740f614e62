//! Socket.IO client for real-time message delivery.
//!
//! The socket task manages the WebSocket lifecycle: connection, the
//! Engine.IO/Socket.IO handshake, `add-user` registration, reconnection with
//! exponential backoff, and dispatch of incoming events into [`ChatState`].
//!
//! OUTBOX
//! ======
//! [`SocketHandle`] never writes to the wire. Its packets wait in an outbox
//! that outlives each connection and is drained only after the connection
//! has registered, so an emit made while connecting always follows `40` and
//! `add-user`. Handshake replies go straight to the per-connection wire
//! queue. All WebSocket logic is gated behind `#[cfg(feature = "csr")]`
//! since it requires a browser environment.

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;

use futures::StreamExt;
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender};
use futures::channel::oneshot;

use frames::{SocketEvent, encode_event};
use panel::{PanelError, RealtimeChannel};

#[cfg(feature = "csr")]
use crate::state::chat::{ChatState, ConnectionStatus};
#[cfg(feature = "csr")]
use leptos::prelude::{RwSignal, Update};

#[cfg_attr(not(feature = "csr"), allow(dead_code))]
const INITIAL_BACKOFF_MS: u32 = 1000;
const MAX_BACKOFF_MS: u32 = 10_000;

/// Cloneable handle for queuing events onto the socket outbox.
///
/// The default handle is detached; emitting through it fails with
/// [`PanelError::ChannelClosed`].
#[derive(Clone, Debug, Default)]
pub struct SocketHandle {
    tx: Option<UnboundedSender<String>>,
}

impl SocketHandle {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx: Some(tx) }
    }
}

impl RealtimeChannel for SocketHandle {
    fn emit(&self, event: &SocketEvent) -> Result<(), PanelError> {
        let tx = self.tx.as_ref().ok_or(PanelError::ChannelClosed)?;
        tx.unbounded_send(encode_event(event))
            .map_err(|_| PanelError::ChannelClosed)
    }
}

/// Delay before the next reconnect attempt.
#[cfg_attr(not(feature = "csr"), allow(dead_code))]
fn next_backoff(current_ms: u32) -> u32 {
    current_ms.saturating_mul(2).min(MAX_BACKOFF_MS)
}

/// Move outbox packets onto `wire` once `registered` fires.
///
/// Returns without touching the outbox if the connection ends before
/// registering.
#[cfg_attr(not(feature = "csr"), allow(dead_code))]
async fn release_outbox(
    registered: oneshot::Receiver<()>,
    outbox: &mut UnboundedReceiver<String>,
    wire: &UnboundedSender<String>,
) {
    if registered.await.is_err() {
        return;
    }
    while let Some(packet) = outbox.next().await {
        if wire.unbounded_send(packet).is_err() {
            break;
        }
    }
}

/// Spawn the socket lifecycle for `user_id` as a local async task.
#[cfg(feature = "csr")]
pub fn spawn_socket(user_id: String, chat: RwSignal<ChatState>) -> SocketHandle {
    let (tx, outbox) = futures::channel::mpsc::unbounded::<String>();
    leptos::task::spawn_local(socket_loop(user_id, chat, outbox));

    SocketHandle::new(tx)
}

/// Main connection loop with reconnect logic.
#[cfg(feature = "csr")]
async fn socket_loop(user_id: String, chat: RwSignal<ChatState>, mut outbox: UnboundedReceiver<String>) {
    let url = match frames::socket_url(crate::config::API_HOST) {
        Ok(url) => url,
        Err(e) => {
            leptos::logging::error!("socket disabled: {e}");
            return;
        }
    };

    let mut backoff_ms = INITIAL_BACKOFF_MS;

    loop {
        chat.update(|c| c.connection_status = ConnectionStatus::Connecting);

        match connect_and_run(&url, &user_id, chat, &mut outbox).await {
            Ok(()) => {
                leptos::logging::log!("socket disconnected cleanly");
                backoff_ms = INITIAL_BACKOFF_MS;
            }
            Err(e) => {
                leptos::logging::warn!("socket error: {e}");
            }
        }

        chat.update(|c| c.connection_status = ConnectionStatus::Disconnected);

        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(backoff_ms))).await;
        backoff_ms = next_backoff(backoff_ms);
    }
}

/// Connect, register, and process packets until disconnect.
#[cfg(feature = "csr")]
async fn connect_and_run(
    url: &str,
    user_id: &str,
    chat: RwSignal<ChatState>,
    outbox: &mut UnboundedReceiver<String>,
) -> Result<(), String> {
    use std::convert::Infallible;

    use frames::{Reaction, decode_packet, react};
    use futures::future::Either;
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;

    let ws = WebSocket::open(url).map_err(|e| e.to_string())?;
    let (mut ws_write, mut ws_read) = ws.split();

    let (wire_tx, mut wire_rx) = futures::channel::mpsc::unbounded::<String>();
    let (registered_tx, registered_rx) = oneshot::channel::<()>();
    let mut registered_tx = Some(registered_tx);

    // Forward wire packets to the socket.
    let send_task = async {
        use futures::SinkExt;
        while let Some(packet) = wire_rx.next().await {
            if ws_write.send(Message::Text(packet)).await.is_err() {
                break;
            }
        }
    };

    let release_task = async {
        release_outbox(registered_rx, outbox, &wire_tx).await;
        futures::future::pending::<Infallible>().await
    };

    let recv_task = async {
        while let Some(msg) = ws_read.next().await {
            let text = match msg {
                Ok(Message::Text(text)) => text,
                Ok(Message::Bytes(_)) => continue,
                Err(e) => return Err(e.to_string()),
            };
            let packet = match decode_packet(&text) {
                Ok(packet) => packet,
                Err(e) => {
                    leptos::logging::warn!("socket decode error: {e}");
                    continue;
                }
            };
            match react(packet, user_id) {
                Reaction::Reply(reply) => queue(&wire_tx, reply),
                Reaction::Registered(registration) => {
                    queue(&wire_tx, registration);
                    if let Some(tx) = registered_tx.take() {
                        let _ = tx.send(());
                    }
                    chat.update(|c| c.connection_status = ConnectionStatus::Connected);
                }
                Reaction::Deliver(event) => {
                    chat.update(|c| {
                        c.panel.apply_event(event);
                    });
                }
                Reaction::Closed(reason) => return Err(reason),
                Reaction::Ignore => {}
            }
        }
        Ok(())
    };

    let connection = futures::future::select(Box::pin(recv_task), Box::pin(release_task));
    match futures::future::select(Box::pin(send_task), connection).await {
        Either::Left(((), _)) => Ok(()),
        Either::Right((Either::Left((result, _)), _)) => result,
        Either::Right((Either::Right((never, _)), _)) => match never {},
    }
}

#[cfg(feature = "csr")]
fn queue(tx: &UnboundedSender<String>, packet: String) {
    if tx.unbounded_send(packet).is_err() {
        leptos::logging::warn!("socket queue closed");
    }
}
