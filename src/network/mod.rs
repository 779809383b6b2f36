//! Network layer: per-server connection tasks.
//!
//! Every server connection runs three tasks:
//!
//! - **listener**: reads framed lines, answers `PING` itself and forwards the
//!   rest to the actor
//! - **actor**: owns the [`ServerState`](crate::state::ServerState) and
//!   applies inbound lines and user commands one at a time
//! - **writer**: drains the outbound queue onto the socket
//!
//! [`ServerHandle`] is the session manager's side of the actor queue.

mod actor;
mod transport;

pub use actor::{ServerEvent, ServerHandle};
pub use transport::Outbound;
