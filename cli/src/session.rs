//! Interactive chat loop.
//!
//! Typed lines are appended and emitted at once; their saves run as
//! pending futures polled alongside input, so a slow REST call never holds
//! up incoming messages or the next line.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::io::Write;
use std::time::Duration;

use frames::SocketEvent;
use futures_util::future::{FutureExt, LocalBoxFuture};
use futures_util::stream::{FuturesUnordered, StreamExt};
use panel::{MessageApi, Panel, PanelError, RealtimeChannel};
use tokio::sync::mpsc;

use crate::error::CliError;
use crate::render::{Transcript, write_lines};

type SaveFuture = LocalBoxFuture<'static, (String, Result<(), PanelError>)>;

/// Run the chat until input ends or the socket closes.
///
/// On end of input, saves still in flight get up to `flush` to finish.
///
/// # Errors
///
/// Returns [`CliError::WsClosed`] when the incoming stream ends, and
/// [`CliError::Io`] when reading input or writing output fails.
pub async fn run<A, C, W>(
    panel: &mut Panel<A, C>,
    lines: &mut mpsc::UnboundedReceiver<std::io::Result<String>>,
    incoming: &mut mpsc::UnboundedReceiver<SocketEvent>,
    transcript: &mut Transcript,
    out: &mut W,
    flush: Duration,
) -> Result<(), CliError>
where
    A: MessageApi + Clone + 'static,
    C: RealtimeChannel,
    W: Write,
{
    let mut saves: FuturesUnordered<SaveFuture> = FuturesUnordered::new();

    let outcome = loop {
        tokio::select! {
            biased;
            line = lines.recv() => match line {
                Some(Ok(text)) => {
                    if let Some(outgoing) = panel.dispatch(&text) {
                        saves.push(save(panel.api().clone(), outgoing.request));
                    }
                    // The typed line is already on screen.
                    transcript.skip(panel.core().messages());
                }
                Some(Err(e)) => break Err(CliError::Io(e)),
                None => break Ok(()),
            },
            Some((to, result)) = saves.next(), if !saves.is_empty() => log_save(&to, result),
            event = incoming.recv() => match event {
                Some(event) => {
                    panel.handle_event(event);
                    write_lines(out, &transcript.pending(panel.core().messages()))?;
                }
                None => break Err(CliError::WsClosed),
            },
        }
    };

    if !saves.is_empty() {
        let drain = async {
            while let Some((to, result)) = saves.next().await {
                log_save(&to, result);
            }
        };
        if tokio::time::timeout(flush, drain).await.is_err() {
            tracing::warn!(unsaved = saves.len(), "gave up waiting for message saves");
        }
    }

    outcome
}

fn save<A: MessageApi + 'static>(api: A, request: frames::SendRequest) -> SaveFuture {
    async move {
        let result = api.send_message(&request).await;
        (request.to, result)
    }
    .boxed_local()
}

fn log_save(to: &str, result: Result<(), PanelError>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, to, "message persistence failed");
    }
}
