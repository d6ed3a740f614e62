//! Root application component and context providers.

use leptos::prelude::*;
use leptos_meta::{Stylesheet, Title, provide_meta_context};

use crate::components::{contact_list::ContactList, message_panel::MessagePanel};
use crate::net::socket::SocketHandle;
use crate::state::{auth::AuthState, chat::ChatState};
use crate::util::storage::read_user;

/// Root application component.
///
/// Provides all shared state contexts and, once a user is known, starts the
/// realtime socket.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState { user: read_user() });
    let chat = RwSignal::new(ChatState::default());
    let socket = RwSignal::new(SocketHandle::default());

    provide_context(auth);
    provide_context(chat);
    provide_context(socket);

    #[cfg(feature = "csr")]
    {
        if let Some(user_id) = auth.with_untracked(|a| a.user_id().map(str::to_owned)) {
            socket.set(crate::net::socket::spawn_socket(user_id, chat));
        }
    }

    let signed_in = move || auth.with(|a| a.user.is_some());

    view! {
        <Stylesheet id="chat" href="/pkg/chat-client.css"/>
        <Title text="Chat"/>

        <Show
            when=signed_in
            fallback=|| {
                view! {
                    <div class="sign-in">
                        <a href="/login">"Sign in to start chatting"</a>
                    </div>
                }
            }
        >
            <div class="container">
                <ContactList/>
                <Show
                    when=move || chat.with(|c| c.contact().is_some())
                    fallback=move || {
                        let name = auth.with(|a| a.user.as_ref().map(|u| u.username.clone()).unwrap_or_default());
                        view! {
                            <div class="welcome">
                                <h1>"Welcome, " {name} "!"</h1>
                                <h3>"Please select a chat to start messaging."</h3>
                            </div>
                        }
                    }
                >
                    <MessagePanel/>
                </Show>
            </div>
        </Show>
    }
}
