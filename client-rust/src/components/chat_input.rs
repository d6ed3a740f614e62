//! Message composer at the bottom of the panel.

#[cfg(test)]
#[path = "chat_input_test.rs"]
mod chat_input_test;

use leptos::prelude::*;

/// `true` when `text` has something besides whitespace.
pub fn is_sendable(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Text input plus send button. Enter submits through the form.
///
/// Blank text is never handed to `on_send`. The input clears after a submit.
#[component]
pub fn ChatInput(#[prop(into)] on_send: Callback<String>) -> impl IntoView {
    let input = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let text = input.get_untracked();
        if !is_sendable(&text) {
            return;
        }
        on_send.run(text);
        input.set(String::new());
    };

    view! {
        <form class="input-container" on:submit=on_submit>
            <input
                class="input-container__text"
                type="text"
                placeholder="type your message here"
                prop:value=move || input.get()
                on:input=move |ev| input.set(event_target_value(&ev))
            />
            <button class="btn btn--primary" type="submit" disabled=move || !is_sendable(&input.get())>
                "Send"
            </button>
        </form>
    }
}
