//! Panel operations run against the browser transports.
//!
//! State changes happen synchronously inside the chat signal; the network
//! calls they produce run as local tasks and report back through the same
//! signal. A history response is applied only if its ticket still matches
//! the open conversation.

#[cfg(test)]
#[path = "conversation_test.rs"]
mod conversation_test;

use frames::{Contact, SendRequest};
use leptos::prelude::{RwSignal, Update};
use panel::{Action, Conversation, HistoryTicket, MessageApi, RealtimeChannel};

use crate::state::chat::ChatState;

/// Open the conversation between `user_id` and `contact`.
///
/// The list is cleared at once; history arrives asynchronously.
pub fn open_conversation(chat: RwSignal<ChatState>, user_id: String, contact: Contact) {
    let Some(ticket) = chat.try_update(|c| c.panel.select(Conversation { user_id, contact })) else {
        return;
    };

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        load_history(&crate::net::api::BrowserApi, chat, ticket).await;
    });
    #[cfg(not(feature = "csr"))]
    let _ = ticket;
}

/// Fetch the history for `ticket` and apply it to `chat`.
pub async fn load_history<A: MessageApi>(api: &A, chat: RwSignal<ChatState>, ticket: HistoryTicket) -> Action {
    match api.fetch_history(ticket.request()).await {
        Ok(messages) => chat
            .try_update(|c| c.panel.apply_history(ticket, messages))
            .unwrap_or(Action::None),
        Err(e) => {
            leptos::logging::warn!("error fetching messages: {e}");
            chat.update(|c| c.panel.history_failed(ticket, &e));
            Action::None
        }
    }
}

/// Send `text` to the open conversation.
///
/// The entry is appended immediately and the `send-msg` event queued on the
/// socket before persistence is spawned. Failures are logged only.
pub fn send_message<C: RealtimeChannel>(chat: RwSignal<ChatState>, channel: &C, text: &str) -> Action {
    let Some(outgoing) = chat.try_update(|c| c.panel.compose(text)).flatten() else {
        return Action::None;
    };

    if let Err(e) = channel.emit(&outgoing.event) {
        leptos::logging::warn!("realtime emit failed: {e}");
    }

    #[cfg(feature = "csr")]
    {
        let request = outgoing.request;
        leptos::task::spawn_local(async move {
            persist(&crate::net::api::BrowserApi, request).await;
        });
    }
    #[cfg(not(feature = "csr"))]
    drop(outgoing.request);

    Action::ScrollTo(outgoing.key)
}

/// Persist a sent message, logging failure.
pub async fn persist<A: MessageApi>(api: &A, request: SendRequest) {
    if let Err(e) = api.send_message(&request).await {
        leptos::logging::warn!("message persistence failed: {e}");
    }
}
