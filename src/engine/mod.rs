//! Session engine: the inbound state machine.
//!
//! Turns one parsed protocol line into a state transition on a
//! [`ServerState`] plus the [`DisplayEvent`]s describing it. The engine does
//! no I/O; the per-server actor feeds it and renders what it returns.
//!
//! Exactly one branch fires per line:
//!
//! | Command | Module |
//! |---------|--------|
//! | `JOIN`, `PART`, `QUIT`, `NICK`, `KICK`, `353` | [`membership`] |
//! | `PRIVMSG` | [`messaging`] |
//! | `366`, `375`, `372`, `376` | ignored |
//! | anything else | generic note |
//!
//! After the branch, a live line is appended to the log of the channel named
//! by its first parameter, if that channel exists at that point.

mod membership;
mod messaging;

use crate::display::DisplayEvent;
use crate::state::ServerState;
use slirc_proto::Message;

/// Where a line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Freshly received (or echoed) line: logged.
    Live,
    /// Line re-fed from a channel log: never logged again.
    Replay,
}

/// Outcome of handling one line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Handled {
    /// Channel the line was about, if any.
    pub channel: Option<String>,
    pub events: Vec<DisplayEvent>,
}

impl Handled {
    fn for_channel(channel: &str) -> Self {
        Self {
            channel: Some(channel.to_string()),
            events: Vec::new(),
        }
    }

    fn emit(&mut self, event: DisplayEvent) {
        self.events.push(event);
    }
}

/// Numerics recognized on purpose and dropped: end of NAMES and the MOTD.
const SILENT_NUMERICS: &[&str] = &["366", "375", "372", "376"];

/// Apply one inbound line to `server`.
///
/// `raw` is the line as received; it is what gets logged.
pub fn handle(server: &mut ServerState, msg: &Message, raw: &str, origin: Origin) -> Handled {
    if msg.is_empty() {
        return Handled::default();
    }

    let handled = match msg.command.as_str() {
        "JOIN" => membership::join(server, msg),
        "PART" => membership::part(server, msg),
        "PRIVMSG" => messaging::privmsg(server, msg),
        "QUIT" => membership::quit(server, msg),
        "NICK" => membership::nick(server, msg),
        "KICK" => membership::kick(server, msg),
        "353" => membership::names(server, msg),
        cmd if SILENT_NUMERICS.contains(&cmd) => Handled::default(),
        _ => messaging::other(msg),
    };

    if origin == Origin::Live {
        if let Some(channel) = msg.arg(0).and_then(|name| server.channel_mut(name)) {
            channel.log.push(raw.to_string());
        }
    }

    handled
}

/// Replay a channel's log through the engine.
///
/// The log only holds lines addressed to the channel, so it misses the
/// QUITs and NICKs that shaped the member list. Lines are therefore
/// re-applied to a detached copy of the channel and only their events
/// are kept; `server` is left as it was.
pub fn replay(server: &ServerState, channel: &str) -> Vec<DisplayEvent> {
    let Some(mut scratch) = server.detached(channel) else {
        return Vec::new();
    };
    let lines = scratch
        .channel(channel)
        .map(|chan| chan.log.clone())
        .unwrap_or_default();

    let mut events = Vec::new();
    for line in &lines {
        let msg = Message::parse(line);
        events.extend(handle(&mut scratch, &msg, line, Origin::Replay).events);
    }
    events
}

#[cfg(test)]
mod tests;
