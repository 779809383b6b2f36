//! Unified error handling for the client.
//!
//! Every failure a user can provoke surfaces as a [`CommandError`]: one
//! user-visible message, and the command becomes a no-op. Connection-level
//! failures are reported the same way and never take the process down.

use thiserror::Error;

// ============================================================================
// Connection Errors (dialing a server)
// ============================================================================

/// Failure to open a new server connection.
///
/// Fatal to that one connection attempt only.
#[derive(Debug, Error)]
#[error("failed to connect to {address}: {source}")]
pub struct ConnectionError {
    pub address: String,
    #[source]
    pub source: std::io::Error,
}

// ============================================================================
// Command Errors (user command dispatch)
// ============================================================================

/// Errors that can occur while dispatching a user command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("not connected to any server")]
    NotConnected,

    #[error("no active channel")]
    NoActiveContext,

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid nickname: {0:?}")]
    InvalidNick(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The server's connection is gone; its listener or writer has stopped.
    #[error("connection to {0} is closed")]
    Disconnected(String),
}

impl CommandError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotConnected => "not_connected",
            Self::NoActiveContext => "no_active_context",
            Self::MissingArgument(_) => "missing_argument",
            Self::InvalidNick(_) => "invalid_nick",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::UnknownCommand(_) => "unknown_command",
            Self::Connection(_) => "connection_error",
            Self::Disconnected(_) => "disconnected",
        }
    }
}

/// Result type for command dispatch.
pub type CommandResult<T = ()> = Result<T, CommandError>;
