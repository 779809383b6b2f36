use crate::prefix::sender_nick;

/// An owned IRC message.
///
/// Produced once per inbound line and thrown away after handling. The last
/// parameter may contain spaces (the trailing parameter).
///
/// # Example
///
/// ```
/// use slirc_proto::Message;
///
/// // Parse a message
/// let msg = Message::parse(":nick!user@host JOIN #channel");
/// assert_eq!(msg.arg(0), Some("#channel"));
///
/// // Construct a message
/// let msg = Message::join("#channel");
/// assert_eq!(msg.to_string(), "JOIN #channel");
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Message {
    /// Sender identity without the leading colon, possibly empty.
    pub prefix: String,
    /// Verb or three-digit numeric reply code.
    pub command: String,
    /// Ordered parameters; the last one may be the trailing parameter.
    pub params: Vec<String>,
}

impl Message {
    /// Create a message without a prefix.
    pub fn new<I, S>(command: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefix: String::new(),
            command: command.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Attach a prefix to this message.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Short nickname of whoever sent this message.
    pub fn sender(&self) -> &str {
        sender_nick(&self.prefix)
    }

    /// Get the parameter at `idx`, if present.
    pub fn arg(&self, idx: usize) -> Option<&str> {
        self.params.get(idx).map(String::as_str)
    }

    /// True for an empty line (no command at all).
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }

    /// True if the command is a three-digit numeric reply.
    pub fn is_numeric(&self) -> bool {
        self.command.len() == 3 && self.command.bytes().all(|b| b.is_ascii_digit())
    }

    // ------------------------------------------------------------------
    // Outbound constructors
    // ------------------------------------------------------------------

    /// `PRIVMSG <target> :<text>`
    pub fn privmsg(target: &str, text: &str) -> Self {
        Self::new("PRIVMSG", [target, text])
    }

    /// `JOIN <channel>`
    pub fn join(channel: &str) -> Self {
        Self::new("JOIN", [channel])
    }

    /// `PART <channel>`
    pub fn part(channel: &str) -> Self {
        Self::new("PART", [channel])
    }

    /// `NICK <nick>`
    pub fn nick(nick: &str) -> Self {
        Self::new("NICK", [nick])
    }

    /// `USER <username> 0 * :<realname>`
    pub fn user(username: &str, realname: &str) -> Self {
        Self::new("USER", [username, "0", "*", realname])
    }

    /// `AWAY [:<message>]`; no message clears the away status.
    pub fn away(message: Option<&str>) -> Self {
        match message {
            Some(text) => Self::new("AWAY", [text]),
            None => Self::new("AWAY", Vec::<String>::new()),
        }
    }

    /// `QUIT :<message>`
    pub fn quit(message: &str) -> Self {
        Self::new("QUIT", [message])
    }
}
