//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`auth`, `chat`) so components depend on small
//! focused models. Each model is provided by `App` as an `RwSignal` context.

pub mod auth;
pub mod chat;
