//! Logout button shown in the message panel header.

use leptos::prelude::*;

use crate::state::auth::AuthState;

/// Ends the session: calls the logout endpoint, forgets the stored user,
/// and navigates to `/login` for a clean state.
#[component]
pub fn Logout() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();

    let on_logout = move |_: leptos::ev::MouseEvent| {
        #[cfg(feature = "csr")]
        {
            let Some(user_id) = auth.with_untracked(|a| a.user_id().map(str::to_owned)) else {
                return;
            };
            leptos::task::spawn_local(async move {
                crate::net::api::logout(&user_id).await;
                crate::util::storage::clear_user();
                auth.update(|a| a.user = None);
                if let Some(w) = web_sys::window() {
                    let _ = w.location().set_href("/login");
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        let _ = auth;
    };

    view! {
        <button class="btn logout" title="Log out" on:click=on_logout>
            "Logout"
        </button>
    }
}
