//! Build-time configuration for the browser client.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use frames::{DEFAULT_API_HOST, Endpoints};

/// API host baked in at compile time through `CHAT_API_HOST`.
pub const API_HOST: &str = match option_env!("CHAT_API_HOST") {
    Some(host) => host,
    None => DEFAULT_API_HOST,
};

/// `localStorage` key under which the login flow stores the signed-in user.
pub const USER_STORAGE_KEY: &str = "chat-app-user";

/// REST routes for the configured host.
pub fn endpoints() -> Endpoints {
    Endpoints::new(API_HOST)
}
