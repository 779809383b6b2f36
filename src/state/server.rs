//! Per-connection state.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::Channel;
use crate::config::IdentityConfig;

/// One live connection's identity, channel set and active-channel pointer.
///
/// `active_channel` names an entry of `channels` and never owns anything.
/// Every mutation that could break that goes through this type.
#[derive(Debug, Clone)]
pub struct ServerState {
    pub address: String,
    pub nickname: String,
    pub username: String,
    pub realname: String,
    channels: BTreeMap<String, Channel>,
    active_channel: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl ServerState {
    pub fn new(address: impl Into<String>, identity: &IdentityConfig) -> Self {
        let now = Utc::now();
        Self {
            address: address.into(),
            nickname: identity.nick.clone(),
            username: identity.username.clone(),
            realname: identity.realname.clone(),
            channels: BTreeMap::new(),
            active_channel: None,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn is_self(&self, nick: &str) -> bool {
        self.nickname == nick
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    pub fn channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(name)
    }

    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut Channel> {
        self.channels.values_mut()
    }

    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Insert a channel, replacing nothing: an existing entry with the same
    /// name wins. Returns whether the channel was created.
    pub fn insert_channel(&mut self, channel: Channel) -> bool {
        if self.channels.contains_key(&channel.name) {
            return false;
        }
        self.channels.insert(channel.name.clone(), channel);
        true
    }

    /// Drop a channel. If it was the active one, the pointer is cleared
    /// after removal and a successor picked.
    pub fn remove_channel(&mut self, name: &str) -> Option<Channel> {
        let removed = self.channels.remove(name)?;
        if self.active_channel.as_deref() == Some(name) {
            self.active_channel = None;
            self.reselect_active();
        }
        Some(removed)
    }

    pub fn active_channel(&self) -> Option<&Channel> {
        self.active_channel
            .as_deref()
            .and_then(|name| self.channels.get(name))
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active_channel.as_deref()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active_channel.as_deref() == Some(name)
    }

    /// Make `name` the active channel and refresh its activity time.
    /// Returns `false` (and changes nothing) if there is no such channel.
    pub fn set_active(&mut self, name: &str) -> bool {
        match self.channels.get_mut(name) {
            Some(channel) => {
                channel.touch();
                self.active_channel = Some(channel.name.clone());
                true
            }
            None => false,
        }
    }

    /// Pick the most recently active channel as the new active one.
    ///
    /// Ties go to the lexicographically smallest name. With no channels
    /// left the pointer stays empty.
    fn reselect_active(&mut self) {
        let next = self
            .channels
            .values()
            .max_by(|a, b| {
                a.last_active_at
                    .cmp(&b.last_active_at)
                    .then_with(|| b.name.cmp(&a.name))
            })
            .map(|channel| channel.name.clone());

        match next {
            Some(name) => {
                self.set_active(&name);
            }
            None => self.active_channel = None,
        }
    }

    /// Copy of this state holding only `name`, made active.
    ///
    /// Changes to the copy never reach `self`.
    pub fn detached(&self, name: &str) -> Option<Self> {
        let channel = self.channels.get(name)?.clone();
        Some(Self {
            address: self.address.clone(),
            nickname: self.nickname.clone(),
            username: self.username.clone(),
            realname: self.realname.clone(),
            channels: BTreeMap::from([(name.to_string(), channel)]),
            active_channel: Some(name.to_string()),
            created_at: self.created_at,
            last_activity: self.last_activity,
        })
    }

    /// Record traffic on this connection.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}
