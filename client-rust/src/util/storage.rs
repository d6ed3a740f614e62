//! Signed-in user persisted in `localStorage`.
//!
//! The login flow writes the user as JSON under
//! [`USER_STORAGE_KEY`](crate::config::USER_STORAGE_KEY). Reading it back is
//! the only way this client learns who is signed in. Requires a browser
//! environment; without `csr` every read returns `None`.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use frames::User;

#[cfg(feature = "csr")]
use crate::config::USER_STORAGE_KEY;

/// Parse a stored user record. Malformed records count as signed out.
pub fn parse_user(raw: &str) -> Option<User> {
    serde_json::from_str(raw).ok()
}

/// Read the signed-in user from `localStorage`.
pub fn read_user() -> Option<User> {
    #[cfg(feature = "csr")]
    {
        let storage = web_sys::window()?.local_storage().ok()??;
        let raw = storage.get_item(USER_STORAGE_KEY).ok()??;
        parse_user(&raw)
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}

/// Remove the stored user.
pub fn clear_user() {
    #[cfg(feature = "csr")]
    {
        if let Some(window) = web_sys::window() {
            if let Ok(Some(storage)) = window.local_storage() {
                let _ = storage.remove_item(USER_STORAGE_KEY);
            }
        }
    }
}
