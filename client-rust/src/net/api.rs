//! REST API helpers for communicating with the chat server.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Without `csr` the helpers are stubs returning errors or empty values,
//! since these endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Message calls return [`PanelError`] so the panel can log them. Contact and
//! logout calls degrade to empty values instead of failing the UI.

#![allow(clippy::unused_async)]

#[cfg(all(test, not(feature = "csr")))]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use frames::{ChatMessage, Contact, HistoryRequest, SendRequest};
use panel::{MessageApi, PanelError};

#[cfg(not(feature = "csr"))]
const NOT_IN_BROWSER: &str = "not available outside the browser";

/// Fetch the ordered history of a conversation via `POST /api/messages/getmsg`.
///
/// # Errors
///
/// Returns a [`PanelError`] when the request fails, the server answers with
/// a non-success status, or the body is not a message array.
pub async fn fetch_history(request: &HistoryRequest) -> Result<Vec<ChatMessage>, PanelError> {
    #[cfg(feature = "csr")]
    {
        let url = crate::config::endpoints().history();
        let resp = post_json(&url, request).await?;
        resp.json::<Vec<ChatMessage>>()
            .await
            .map_err(|e| PanelError::Decode(e.to_string()))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = request;
        Err(PanelError::Request(NOT_IN_BROWSER.to_owned()))
    }
}

/// Persist one message via `POST /api/messages/addmsg`.
///
/// # Errors
///
/// Returns a [`PanelError`] when the request fails or is rejected.
pub async fn send_message(request: &SendRequest) -> Result<(), PanelError> {
    #[cfg(feature = "csr")]
    {
        let url = crate::config::endpoints().send();
        post_json(&url, request).await.map(|_| ())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = request;
        Err(PanelError::Request(NOT_IN_BROWSER.to_owned()))
    }
}

/// Fetch every contact visible to `user_id`. Empty on failure.
pub async fn fetch_contacts(user_id: &str) -> Vec<Contact> {
    #[cfg(feature = "csr")]
    {
        let url = crate::config::endpoints().contacts(user_id);
        let resp = match gloo_net::http::Request::get(&url).send().await {
            Ok(resp) if resp.ok() => resp,
            Ok(resp) => {
                leptos::logging::warn!("contact list failed: {}", resp.status());
                return Vec::new();
            }
            Err(e) => {
                leptos::logging::warn!("contact list failed: {e}");
                return Vec::new();
            }
        };
        contacts_or_empty(resp.json::<Vec<Contact>>().await)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = user_id;
        Vec::new()
    }
}

/// Decoded contacts, or an empty list after logging why decoding failed.
#[cfg_attr(not(feature = "csr"), allow(dead_code))]
fn contacts_or_empty<E: std::fmt::Display>(decoded: Result<Vec<Contact>, E>) -> Vec<Contact> {
    decoded.unwrap_or_else(|e| {
        leptos::logging::warn!("contact list decode failed: {e}");
        Vec::new()
    })
}

/// Log out `user_id` by calling `GET /api/auth/logout/<id>`.
pub async fn logout(user_id: &str) {
    #[cfg(feature = "csr")]
    {
        let url = crate::config::endpoints().logout(user_id);
        if let Err(e) = gloo_net::http::Request::get(&url).send().await {
            leptos::logging::warn!("logout request failed: {e}");
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = user_id;
    }
}

#[cfg(feature = "csr")]
async fn post_json<T: serde::Serialize>(url: &str, body: &T) -> Result<gloo_net::http::Response, PanelError> {
    let resp = gloo_net::http::Request::post(url)
        .json(body)
        .map_err(|e| PanelError::Request(e.to_string()))?
        .send()
        .await
        .map_err(|e| PanelError::Request(e.to_string()))?;
    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(PanelError::Status { status, body });
    }
    Ok(resp)
}

/// [`MessageApi`] backed by the helpers above.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserApi;

#[async_trait(?Send)]
impl MessageApi for BrowserApi {
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<Vec<ChatMessage>, PanelError> {
        fetch_history(request).await
    }

    async fn send_message(&self, request: &SendRequest) -> Result<(), PanelError> {
        send_message(request).await
    }
}
