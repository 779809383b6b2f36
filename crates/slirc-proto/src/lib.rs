//! # slirc-proto
//!
//! Wire-level building blocks for the slirc IRC client.
//!
//! ## Features
//!
//! - Lenient line parsing into prefix, command and parameters
//! - Sender nickname extraction from a message prefix
//! - Message construction and serialization for outbound commands
//! - Optional Tokio codec framing a byte stream into protocol lines
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_proto::Message;
//!
//! let msg = Message::parse(":nick!user@host PRIVMSG #channel :Hello there");
//! assert_eq!(msg.command, "PRIVMSG");
//! assert_eq!(msg.params, vec!["#channel", "Hello there"]);
//! assert_eq!(msg.sender(), "nick");
//!
//! let out = Message::privmsg("#channel", "Hi!");
//! assert_eq!(out.to_string(), "PRIVMSG #channel :Hi!");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod prefix;

pub use self::error::ProtocolError;
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::message::Message;
pub use self::prefix::sender_nick;

/// Marker that starts a channel name.
pub const CHANNEL_PREFIX: char = '#';

/// Default maximum line length accepted by [`LineCodec`], in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;
