//! # chat-client
//!
//! Leptos + WASM front-end for the two-party chat application.
//!
//! This crate contains the message panel and its surrounding components,
//! the signal-backed application state, the `gloo-net` REST helpers, and the
//! Socket.IO client. Panel semantics live in the `panel` crate; this crate
//! holds a `PanelCore` inside a signal and performs the browser I/O.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod state;
pub mod util;

/// WASM entry point: install logging and mount [`app::App`].
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger already installed: {e}");
    }
    leptos::mount::mount_to_body(app::App);
}
