//! PRIVMSG and the catch-all branch.

use super::Handled;
use crate::display::DisplayEvent;
use crate::state::ServerState;
use slirc_proto::{CHANNEL_PREFIX, Message};

/// `:nick!user@host PRIVMSG <target> :<text>`
///
/// Non-channel targets are private messages and always shown. Channel
/// messages are shown only for the active channel.
pub(super) fn privmsg(server: &ServerState, msg: &Message) -> Handled {
    let Some(target) = msg.arg(0) else {
        return Handled::default();
    };
    let text = msg.arg(1).unwrap_or_default();
    let sender = msg.sender().to_string();

    if !target.starts_with(CHANNEL_PREFIX) {
        return Handled {
            channel: None,
            events: vec![DisplayEvent::Private {
                sender,
                text: text.to_string(),
            }],
        };
    }

    let mut handled = Handled::for_channel(target);
    if server.is_active(target) {
        handled.emit(DisplayEvent::Message {
            channel: target.to_string(),
            sender,
            text: text.to_string(),
        });
    }
    handled
}

/// Anything unrecognized: show its parameters.
///
/// The first parameter is usually our own nick on numerics, so it is
/// dropped unless it is the only one.
pub(super) fn other(msg: &Message) -> Handled {
    let text = match msg.params.as_slice() {
        [] => return Handled::default(),
        [only] => only.clone(),
        [_, rest @ ..] => rest.join(" "),
    };

    let mut handled = Handled::default();
    if !text.is_empty() {
        handled.emit(DisplayEvent::note(text));
    }
    handled
}
