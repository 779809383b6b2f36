//! Line parsing.
//!
//! The grammar is deliberately lenient: every line decodes, and an empty
//! line decodes to an empty message that callers treat as a no-op.

use std::convert::Infallible;
use std::str::FromStr;

use super::types::Message;

/// Separator that introduces the trailing parameter.
const TRAILING: &str = " :";

impl Message {
    /// Decode one raw protocol line (without its line terminator).
    ///
    /// - A leading `:` starts the prefix, which runs up to the next space.
    /// - In the remaining body, the first `" :"` starts the trailing
    ///   parameter; everything before it is split on single spaces.
    /// - The first token is the command, the rest are the parameters.
    pub fn parse(line: &str) -> Message {
        if line.is_empty() {
            return Message::default();
        }

        let (prefix, body) = match line.strip_prefix(':') {
            Some(rest) => match rest.split_once(' ') {
                Some((prefix, body)) => (prefix, body),
                None => (rest, ""),
            },
            None => ("", line),
        };

        let mut tokens: Vec<String> = match body.find(TRAILING) {
            Some(idx) => {
                let mut tokens = split_spaces(&body[..idx]);
                tokens.push(body[idx + TRAILING.len()..].to_owned());
                tokens
            }
            None => split_spaces(body),
        };

        let command = if tokens.is_empty() {
            String::new()
        } else {
            tokens.remove(0)
        };

        Message {
            prefix: prefix.to_owned(),
            command,
            params: tokens,
        }
    }
}

fn split_spaces(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    s.split(' ').map(str::to_owned).collect()
}

impl FromStr for Message {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        Ok(Message::parse(s))
    }
}
