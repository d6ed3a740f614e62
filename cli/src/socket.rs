//! Socket.IO transport over `tokio-tungstenite`.
//!
//! A reader task answers the handshake and pings and forwards decoded
//! events; a writer task drains the outgoing queue into the sink. Both the
//! reader's replies and the panel's emits go through the same queue.

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;

use std::time::Duration;

use frames::{Reaction, SocketEvent, decode_packet, encode_event, react, socket_url};
use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use panel::{PanelError, RealtimeChannel};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::CliError;

const REGISTER_TIMEOUT: Duration = Duration::from_secs(10);

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// A registered realtime connection.
pub struct SocketClient {
    tx: mpsc::UnboundedSender<String>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl SocketClient {
    /// Connect to the server behind `base_url` and register as `user_id`.
    ///
    /// Returns once `add-user` is queued, along with the stream of incoming
    /// events.
    ///
    /// # Errors
    ///
    /// Fails on a bad base URL, a refused connection, a connect error from
    /// the server, or no registration within the timeout.
    pub async fn connect(
        base_url: &str,
        user_id: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SocketEvent>), CliError> {
        let url = socket_url(base_url)?;
        let (stream, _) = connect_async(url.as_str()).await?;
        let (mut sink, stream) = stream.split();

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<SocketEvent>();
        let (ready_tx, ready_rx) = oneshot::channel();

        let writer = tokio::spawn(async move {
            while let Some(packet) = rx.recv().await {
                if let Err(e) = sink.send(Message::text(packet)).await {
                    tracing::warn!(error = %e, "socket write failed");
                    return;
                }
            }
            let _ = sink.close().await;
        });
        let reader = tokio::spawn(read_loop(stream, user_id.to_owned(), tx.clone(), event_tx, ready_tx));

        let registered = tokio::time::timeout(REGISTER_TIMEOUT, ready_rx)
            .await
            .map_err(|_| CliError::Timeout)?
            .map_err(|_| CliError::WsClosed)?;
        registered.map_err(CliError::Refused)?;
        tracing::debug!(%url, user = user_id, "socket registered");

        Ok((Self { tx, reader, writer }, event_rx))
    }

    /// Flush queued packets and close the connection.
    pub async fn shutdown(self) {
        let Self { tx, reader, writer } = self;
        reader.abort();
        let _ = reader.await;
        drop(tx);
        let _ = writer.await;
    }
}

impl RealtimeChannel for SocketClient {
    fn emit(&self, event: &SocketEvent) -> Result<(), PanelError> {
        self.tx
            .send(encode_event(event))
            .map_err(|_| PanelError::ChannelClosed)
    }
}

async fn read_loop(
    mut stream: SplitStream<WsStream>,
    user_id: String,
    out: mpsc::UnboundedSender<String>,
    events: mpsc::UnboundedSender<SocketEvent>,
    ready: oneshot::Sender<Result<(), String>>,
) {
    let mut ready = Some(ready);

    while let Some(message) = stream.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "socket read failed");
                break;
            }
        };

        let packet = match decode_packet(text.as_str()) {
            Ok(packet) => packet,
            Err(e) => {
                tracing::warn!(error = %e, "dropping undecodable packet");
                continue;
            }
        };

        match react(packet, &user_id) {
            Reaction::Reply(reply) => {
                let _ = out.send(reply);
            }
            Reaction::Registered(registration) => {
                let _ = out.send(registration);
                if let Some(ready) = ready.take() {
                    let _ = ready.send(Ok(()));
                }
            }
            Reaction::Deliver(event) => {
                if events.send(event).is_err() {
                    break;
                }
            }
            Reaction::Closed(reason) => {
                tracing::info!(%reason, "socket closed by server");
                if let Some(ready) = ready.take() {
                    let _ = ready.send(Err(reason));
                }
                break;
            }
            Reaction::Ignore => {}
        }
    }
}
