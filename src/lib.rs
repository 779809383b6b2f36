//! slirc - a multi-server IRC client session engine.
//!
//! The library holds everything but the terminal loop: the per-server state
//! model, the inbound [`engine`], the per-server actors in [`network`] and
//! the [`session::SessionManager`] that dispatches user commands.

pub mod command;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod network;
pub mod session;
pub mod state;
pub mod telemetry;

pub use command::{Command, ServerCommand, split_input};
pub use config::Config;
pub use display::{Display, DisplayEvent, MemoryDisplay, StatusKind, StdoutDisplay};
pub use error::{CommandError, CommandResult, ConnectionError};
pub use session::{Flow, SessionManager};
