//! Network layer: REST helpers, the Socket.IO client, and the glue that
//! runs panel operations against them.

pub mod api;
pub mod conversation;
pub mod socket;
