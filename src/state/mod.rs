//! State management module.
//!
//! Contains the per-connection state model: a [`ServerState`] exclusively
//! owns its [`Channel`]s and tracks which one is active.

mod channel;
mod server;

pub use channel::{Channel, strip_member_prefix};
pub use server::ServerState;
