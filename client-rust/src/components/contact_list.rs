//! Contact sidebar. Clicking a contact opens the conversation with them.

#[cfg(test)]
#[path = "contact_list_test.rs"]
mod contact_list_test;

use leptos::prelude::*;

use crate::net::api::fetch_contacts;
use crate::net::conversation::open_conversation;
use crate::state::auth::AuthState;
use crate::state::chat::ChatState;

/// CSS class for a contact row.
pub fn contact_class(selected: bool) -> &'static str {
    if selected { "contact contact--selected" } else { "contact" }
}

#[component]
pub fn ContactList() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let chat = expect_context::<RwSignal<ChatState>>();

    let contacts = LocalResource::new(move || {
        let user_id = auth.with(|a| a.user_id().map(str::to_owned));
        async move {
            match user_id {
                Some(id) => fetch_contacts(&id).await,
                None => Vec::new(),
            }
        }
    });

    let selected_id = Memo::new(move |_| chat.with(|c| c.contact().map(|c| c.id.clone())));

    view! {
        <div class="contacts">
            <Suspense fallback=|| view! { <p class="contacts__loading">"Loading contacts..."</p> }>
                {move || {
                    contacts
                        .get()
                        .map(|list| {
                            list.into_iter()
                                .map(|contact| {
                                    let id = contact.id.clone();
                                    let avatar = contact.avatar_src();
                                    let name = contact.username.clone();
                                    let class = move || contact_class(selected_id.get().as_deref() == Some(id.as_str()));
                                    let on_click = move |_| {
                                        let Some(user_id) = auth.with_untracked(|a| a.user_id().map(str::to_owned)) else {
                                            return;
                                        };
                                        open_conversation(chat, user_id, contact.clone());
                                    };
                                    view! {
                                        <div class=class on:click=on_click>
                                            <img class="contact__avatar" src=avatar alt=""/>
                                            <h3 class="contact__name">{name}</h3>
                                        </div>
                                    }
                                })
                                .collect_view()
                        })
                }}
            </Suspense>
        </div>
    }
}
