//! Channel-related types and state.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Membership prefixes a NAMES reply may put in front of a nick.
/// Highest first: ~ & @ % +
const MEMBER_PREFIXES: &[char] = &['~', '&', '@', '%', '+'];

/// A channel joined on one server.
///
/// Member entries are never removed: leaving flips the flag to `false`, so
/// membership checks go through [`Channel::is_member`], not key existence.
#[derive(Debug, Clone)]
pub struct Channel {
    pub name: String,
    pub members: BTreeMap<String, bool>,
    /// Raw lines received while this channel existed, oldest first.
    pub log: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            members: BTreeMap::new(),
            log: Vec::new(),
            created_at: now,
            last_active_at: now,
        }
    }

    pub fn is_member(&self, nick: &str) -> bool {
        self.members.get(nick).copied().unwrap_or(false)
    }

    pub fn mark_present(&mut self, nick: &str) {
        self.members.insert(nick.to_string(), true);
    }

    /// Flip `nick` to absent. Returns whether they were present.
    pub fn mark_absent(&mut self, nick: &str) -> bool {
        match self.members.get_mut(nick) {
            Some(present) => std::mem::replace(present, false),
            None => false,
        }
    }

    /// Present members in sorted order.
    pub fn present_members(&self) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .filter(|(_, present)| **present)
            .map(|(nick, _)| nick.as_str())
    }

    /// Record that this channel just became the active context.
    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }
}

/// Strip one leading membership prefix (`@op`, `+voice`, ...) from a NAMES entry.
pub fn strip_member_prefix(entry: &str) -> &str {
    entry.strip_prefix(MEMBER_PREFIXES).unwrap_or(entry)
}
