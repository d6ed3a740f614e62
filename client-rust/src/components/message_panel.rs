//! Message panel for the open conversation.
//!
//! Renders nothing until a contact is selected. The list re-renders from
//! [`ChatState`] and stays scrolled to the newest entry: the scroll effect
//! tracks the panel's scroll anchor, which moves on every list mutation.
//! The header shows the realtime connection status next to the contact.

use leptos::prelude::*;

use crate::components::chat_input::ChatInput;
use crate::components::logout::Logout;
use crate::net::conversation::send_message;
use crate::net::socket::SocketHandle;
use crate::state::chat::{ChatState, MessageRow};

#[component]
pub fn MessagePanel() -> impl IntoView {
    let chat = expect_context::<RwSignal<ChatState>>();
    let socket = expect_context::<RwSignal<SocketHandle>>();

    let messages_ref = NodeRef::<leptos::html::Div>::new();
    let contact = Memo::new(move |_| chat.with(|c| c.contact().cloned()));

    Effect::new(move || {
        let _ = chat.with(|c| c.panel.scroll_anchor());

        #[cfg(feature = "csr")]
        {
            if let Some(el) = messages_ref.get() {
                el.set_scroll_top(el.scroll_height());
            }
        }
    });

    let on_send = Callback::new(move |text: String| {
        socket.with_untracked(|s| {
            send_message(chat, s, &text);
        });
    });

    let avatar = move || contact.get().map(|c| c.avatar_src()).unwrap_or_default();
    let username = move || contact.get().map(|c| c.username).unwrap_or_default();
    let status = move || chat.with(|c| c.connection_status);

    view! {
        <Show when=move || contact.get().is_some()>
            <div class="chat-container">
                <div class="chat-header">
                    <div class="user-details">
                        <div class="avatar">
                            <img src=avatar alt=""/>
                        </div>
                        <div class="username">
                            <h3>{username}</h3>
                        </div>
                    </div>
                    <span class="connection">
                        <span class=move || status().dot_class()></span>
                        {move || status().label()}
                    </span>
                    <Logout/>
                </div>

                <div class="chat-messages" node_ref=messages_ref>
                    <For
                        each=move || chat.with(ChatState::rows)
                        key=|row: &MessageRow| row.key.clone()
                        children=|row: MessageRow| {
                            view! {
                                <div class=row.class>
                                    <div class="content">
                                        <p>{row.text}</p>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>

                <ChatInput on_send=on_send/>
            </div>
        </Show>
    }
}
