//! IRC message prefix helpers.
//!
//! A prefix identifies the origin of a message: either a server name or a
//! user's `nick!user@host` mask. The client only ever needs the short
//! nickname, so no structured prefix type is kept.

/// Extract the sender nickname from a prefix.
///
/// Takes everything before the first `!` and strips a leading `:` if one
/// is still present. Server-name prefixes come back unchanged.
///
/// ```
/// use slirc_proto::sender_nick;
///
/// assert_eq!(sender_nick("nick!user@host"), "nick");
/// assert_eq!(sender_nick(":nick!user@host"), "nick");
/// assert_eq!(sender_nick("irc.example.net"), "irc.example.net");
/// ```
pub fn sender_nick(prefix: &str) -> &str {
    let nick = match prefix.find('!') {
        Some(idx) => &prefix[..idx],
        None => prefix,
    };
    nick.strip_prefix(':').unwrap_or(nick)
}
