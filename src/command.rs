//! User command vocabulary.
//!
//! Input typed at the prompt is either plain text (sent to the active
//! channel) or `/name args`. [`Command::parse`] turns a name and its
//! argument string into a typed [`Command`]; argument validation happens
//! here, before any connection state is consulted.

use crate::error::{CommandError, CommandResult};

/// A parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `quit [message]`: QUIT every server, then exit.
    Quit(Option<String>),
    /// `server <host> [port]`: open a new connection and make it current.
    Connect { host: String, port: Option<u16> },
    /// `servers`: list connections.
    Servers,
    /// `help`: list commands.
    Help,
    /// Anything routed to the current server.
    Server(ServerCommand),
}

/// Commands executed by one server's actor against its own state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerCommand {
    /// Plain text: PRIVMSG to the active channel.
    Say(String),
    /// `msg <target> <text>`
    Msg { target: String, text: String },
    /// `away [message]`; no message clears the away status.
    Away(Option<String>),
    /// `join <channel>`
    Join(String),
    /// `part [channel]`, defaulting to the active channel.
    Part(Option<String>),
    /// `channel <name>`: switch the active channel and replay its log.
    SwitchChannel(String),
    /// `channels`
    Channels,
    /// `nick <name>`
    Nick(String),
    /// `nicks [channel]`, defaulting to the active channel.
    Nicks(Option<String>),
    /// `usr <username> <realname>`
    User { username: String, realname: String },
    /// Sent to every server by `quit`.
    Quit(String),
}

/// One-line usage for every command, in `help` order.
pub const USAGE: &[(&str, &str)] = &[
    ("msg <target> <text>", "send a message to a channel or nick"),
    ("join <channel>", "join a channel"),
    ("part [channel]", "leave a channel (default: the active one)"),
    ("channel <name>", "switch to a joined channel and show its history"),
    ("channels", "list joined channels"),
    ("nicks [channel]", "list members of a channel"),
    ("nick <name>", "change nickname"),
    ("away [message]", "set away status, or clear it"),
    ("usr <username> <realname>", "send USER registration"),
    ("server <host> [port]", "connect to a server and make it current"),
    ("servers", "list connected servers"),
    ("quit [message]", "disconnect from every server and exit"),
    ("help", "show this list"),
];

/// Split a prompt line into command name and arguments.
///
/// `/join #rust` gives `("join", "#rust")`; text without a leading slash is
/// the empty command with the whole line as argument.
pub fn split_input(line: &str) -> (&str, &str) {
    match line.strip_prefix('/') {
        Some(rest) => match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args),
            None => (rest, ""),
        },
        None => ("", line),
    }
}

/// First whitespace-delimited token, if any.
fn first_token(args: &str) -> Option<String> {
    args.split_whitespace().next().map(str::to_owned)
}

/// Non-empty trimmed argument string, if any.
fn optional_text(args: &str) -> Option<String> {
    let text = args.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

impl Command {
    /// Parse a command name and its raw argument string.
    pub fn parse(name: &str, args: &str) -> CommandResult<Self> {
        let command = match name {
            "" => {
                if args.trim().is_empty() {
                    return Err(CommandError::MissingArgument("text"));
                }
                ServerCommand::Say(args.to_string())
            }
            "msg" => {
                let (target, text) = args
                    .trim_start()
                    .split_once(' ')
                    .ok_or(CommandError::MissingArgument("msg <target> <text>"))?;
                if target.is_empty() || text.trim().is_empty() {
                    return Err(CommandError::MissingArgument("msg <target> <text>"));
                }
                ServerCommand::Msg {
                    target: target.to_string(),
                    text: text.to_string(),
                }
            }
            "away" => ServerCommand::Away(optional_text(args)),
            "quit" => return Ok(Self::Quit(optional_text(args))),
            "join" => ServerCommand::Join(
                first_token(args).ok_or(CommandError::MissingArgument("join <channel>"))?,
            ),
            "part" => ServerCommand::Part(first_token(args)),
            "channel" => ServerCommand::SwitchChannel(
                first_token(args).ok_or(CommandError::MissingArgument("channel <name>"))?,
            ),
            "channels" => ServerCommand::Channels,
            "server" => return Self::parse_connect(args),
            "servers" => return Ok(Self::Servers),
            "nick" => {
                let nick = args.trim();
                if nick.is_empty() || nick.contains(char::is_whitespace) {
                    return Err(CommandError::InvalidNick(nick.to_string()));
                }
                ServerCommand::Nick(nick.to_string())
            }
            "nicks" => ServerCommand::Nicks(first_token(args)),
            "usr" => {
                let (username, realname) = args
                    .trim()
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::MissingArgument("usr <username> <realname>"))?;
                let realname = realname.trim();
                if realname.is_empty() {
                    return Err(CommandError::MissingArgument("usr <username> <realname>"));
                }
                ServerCommand::User {
                    username: username.to_string(),
                    realname: realname.to_string(),
                }
            }
            "help" => return Ok(Self::Help),
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };
        Ok(Self::Server(command))
    }

    fn parse_connect(args: &str) -> CommandResult<Self> {
        let mut tokens = args.split_whitespace();
        let host = tokens
            .next()
            .ok_or(CommandError::MissingArgument("server <host> [port]"))?
            .to_string();
        let port = tokens
            .next()
            .map(|p| {
                p.parse::<u16>()
                    .ok()
                    .filter(|port| *port != 0)
                    .ok_or_else(|| CommandError::InvalidArgument(format!("bad port {p:?}")))
            })
            .transpose()?;
        Ok(Self::Connect { host, port })
    }
}
