//! Membership transitions: JOIN, PART, QUIT, NICK, KICK and RPL_NAMREPLY.
//!
//! The server is the source of truth. Channels are created only when our
//! own JOIN comes back and dropped only when our own PART or KICK does.

use super::Handled;
use crate::display::{DisplayEvent, StatusKind};
use crate::state::{Channel, ServerState, strip_member_prefix};
use slirc_proto::Message;

/// ` (reason)` suffix, or nothing for a missing or empty reason.
fn reason_suffix(reason: Option<&str>) -> String {
    match reason {
        Some(text) if !text.is_empty() => format!(" ({text})"),
        _ => String::new(),
    }
}

/// `:nick!user@host JOIN <channel>`
pub(super) fn join(server: &mut ServerState, msg: &Message) -> Handled {
    let Some(channel) = msg.arg(0) else {
        return Handled::default();
    };
    let nick = msg.sender();
    let mut handled = Handled::for_channel(channel);

    if server.is_self(nick) && server.insert_channel(Channel::new(channel)) {
        server.set_active(channel);
        handled.emit(DisplayEvent::Clear);
    }

    if server.is_active(channel) {
        handled.emit(DisplayEvent::status(
            StatusKind::Join,
            format!("{nick} has joined {channel}"),
        ));
    }

    // Another user's JOIN for a channel we never joined is ignored
    if let Some(chan) = server.channel_mut(channel) {
        chan.mark_present(nick);
    }

    handled
}

/// `:nick!user@host PART <channel> [:<reason>]`
pub(super) fn part(server: &mut ServerState, msg: &Message) -> Handled {
    let Some(channel) = msg.arg(0) else {
        return Handled::default();
    };
    let nick = msg.sender();
    let mut handled = Handled::for_channel(channel);

    if server.is_active(channel) {
        handled.emit(DisplayEvent::status(
            StatusKind::Part,
            format!("{nick} has left {channel}{}", reason_suffix(msg.arg(1))),
        ));
    }

    if let Some(chan) = server.channel_mut(channel) {
        chan.mark_absent(nick);
    }

    if server.is_self(nick) {
        server.remove_channel(channel);
    }

    handled
}

/// `:nick!user@host QUIT [:<reason>]`
///
/// The quitter is marked absent in every channel they were in.
pub(super) fn quit(server: &mut ServerState, msg: &Message) -> Handled {
    let nick = msg.sender();
    let active = server.active_name().map(str::to_owned);
    let mut in_active = false;

    for chan in server.channels_mut() {
        if chan.mark_absent(nick) && active.as_deref() == Some(chan.name.as_str()) {
            in_active = true;
        }
    }

    let mut handled = Handled::default();
    if in_active {
        handled.channel = active;
        handled.emit(DisplayEvent::status(
            StatusKind::Quit,
            format!("{nick} has quit{}", reason_suffix(msg.arg(0))),
        ));
    }
    handled
}

/// `:old!user@host NICK <new>`
pub(super) fn nick(server: &mut ServerState, msg: &Message) -> Handled {
    let Some(new_nick) = msg.arg(0) else {
        return Handled::default();
    };
    let old_nick = msg.sender();
    let mut handled = Handled::default();

    let renamed_self = server.is_self(old_nick);
    if renamed_self {
        server.nickname = new_nick.to_string();
        handled.emit(DisplayEvent::status(
            StatusKind::Nick,
            format!("You are now known as {new_nick}"),
        ));
    }

    let active = server.active_name().map(str::to_owned);
    let mut in_active = false;
    for chan in server.channels_mut() {
        if chan.mark_absent(old_nick) {
            chan.mark_present(new_nick);
            in_active |= active.as_deref() == Some(chan.name.as_str());
        }
    }

    if in_active && !renamed_self {
        handled.channel = active;
        handled.emit(DisplayEvent::status(
            StatusKind::Nick,
            format!("{old_nick} is now known as {new_nick}"),
        ));
    }
    handled
}

/// `:kicker!user@host KICK <channel> <victim> [:<reason>]`
pub(super) fn kick(server: &mut ServerState, msg: &Message) -> Handled {
    let (Some(channel), Some(victim)) = (msg.arg(0), msg.arg(1)) else {
        return Handled::default();
    };
    let kicker = msg.sender();
    let reason = reason_suffix(msg.arg(2));
    let mut handled = Handled::for_channel(channel);
    let was_active = server.is_active(channel);

    if let Some(chan) = server.channel_mut(channel) {
        chan.mark_absent(victim);
    }

    if server.is_self(victim) {
        server.remove_channel(channel);
        handled.emit(DisplayEvent::status(
            StatusKind::Kick,
            format!("You have been kicked from {channel} by {kicker}{reason}"),
        ));
    } else if was_active {
        handled.emit(DisplayEvent::status(
            StatusKind::Kick,
            format!("{victim} was kicked from {channel} by {kicker}{reason}"),
        ));
    }

    handled
}

/// RPL_NAMREPLY: `:server 353 <me> <symbol> <channel> :<nicks>`
///
/// The channel is the parameter right before the nick list. Unknown
/// channels are left alone.
pub(super) fn names(server: &mut ServerState, msg: &Message) -> Handled {
    let [.., channel, nicks] = msg.params.as_slice() else {
        return Handled::default();
    };
    let handled = Handled::for_channel(channel);

    if let Some(chan) = server.channel_mut(channel) {
        for entry in nicks.split(' ').filter(|entry| !entry.is_empty()) {
            chan.mark_present(strip_member_prefix(entry));
        }
    }

    handled
}
