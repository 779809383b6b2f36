//! Per-server actor.
//!
//! The actor task owns one [`ServerState`] and processes [`ServerEvent`]s
//! sequentially: inbound lines from the listener and commands from the
//! session manager share one queue, so every transition runs to completion
//! before the next starts and a read-then-write command (`part`, `nicks`,
//! `channel`, plain text) sees a consistent channel map.

use crate::command::ServerCommand;
use crate::config::Config;
use crate::display::{Display, DisplayEvent, StatusKind};
use crate::engine::{self, Origin};
use crate::error::{CommandError, CommandResult, ConnectionError};
use crate::state::ServerState;
use crate::telemetry::spans;
use slirc_proto::Message;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, oneshot};
use tracing::{Instrument, debug, info};

use super::transport::{self, Outbound};

/// Events processed by a [`ServerActor`].
#[derive(Debug)]
pub enum ServerEvent {
    /// A line received from the server, terminator stripped.
    Inbound(String),
    /// A user command routed to this server.
    Command {
        command: ServerCommand,
        reply_tx: oneshot::Sender<CommandResult>,
    },
    /// The listener stopped; carries the reason.
    Closed(String),
}

/// Owner of one server's state.
struct ServerActor {
    state: ServerState,
    outbound: mpsc::UnboundedSender<Outbound>,
    display: Arc<dyn Display>,
    connected: Arc<AtomicBool>,
}

impl ServerActor {
    /// The main actor loop.
    ///
    /// Runs until every [`ServerHandle`] and the listener are gone.
    async fn run(mut self, mut rx: mpsc::Receiver<ServerEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event).await;
        }
        debug!("server actor stopped");
    }

    async fn handle_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Inbound(line) => {
                self.state.touch();
                let msg = Message::parse(&line);
                let handled = engine::handle(&mut self.state, &msg, &line, Origin::Live);
                self.render_all(&handled.events);
            }
            ServerEvent::Command { command, reply_tx } => {
                let result = self.execute(command).await;
                let _ = reply_tx.send(result);
            }
            ServerEvent::Closed(reason) => {
                info!(reason = %reason, "disconnected");
                let text = format!("disconnected from {}: {reason}", self.state.address);
                self.render(&DisplayEvent::status(StatusKind::Error, text));
            }
        }
    }

    async fn execute(&mut self, command: ServerCommand) -> CommandResult {
        match command {
            ServerCommand::Say(text) => {
                let target = self
                    .state
                    .active_name()
                    .ok_or(CommandError::NoActiveContext)?
                    .to_string();
                self.say(&target, &text)
            }
            ServerCommand::Msg { target, text } => self.say(&target, &text),
            ServerCommand::Away(message) => self.send(&Message::away(message.as_deref())),
            ServerCommand::Join(channel) => {
                // Created locally only when the server echoes our JOIN
                self.send(&Message::join(&channel))
            }
            ServerCommand::Part(channel) => {
                let channel = self.resolve(channel)?;
                self.send(&Message::part(&channel))
            }
            ServerCommand::SwitchChannel(name) => self.switch_channel(&name),
            ServerCommand::Channels => {
                self.list_channels();
                Ok(())
            }
            ServerCommand::Nick(nick) => self.send(&Message::nick(&nick)),
            ServerCommand::Nicks(channel) => {
                let name = self.resolve(channel)?;
                let channel = self
                    .state
                    .channel(&name)
                    .ok_or(CommandError::NoSuchChannel(name))?;
                let members = channel.present_members().collect::<Vec<_>>().join(" ");
                self.render(&DisplayEvent::note(members));
                Ok(())
            }
            ServerCommand::User { username, realname } => {
                self.send(&Message::user(&username, &realname))?;
                self.state.username = username;
                self.state.realname = realname;
                Ok(())
            }
            ServerCommand::Quit(message) => self.quit(&message).await,
        }
    }

    /// Send a PRIVMSG and run its echo through the engine as our own line.
    fn say(&mut self, target: &str, text: &str) -> CommandResult {
        let outgoing = Message::privmsg(target, text);
        self.send(&outgoing)?;

        let echo = outgoing.with_prefix(self.state.nickname.clone());
        let raw = echo.to_string();
        let handled = engine::handle(&mut self.state, &echo, &raw, Origin::Live);
        self.render_all(&handled.events);
        Ok(())
    }

    fn switch_channel(&mut self, name: &str) -> CommandResult {
        if !self.state.set_active(name) {
            return Err(CommandError::NoSuchChannel(name.to_string()));
        }
        self.render(&DisplayEvent::Clear);
        let events = engine::replay(&self.state, name);
        self.render_all(&events);
        Ok(())
    }

    fn list_channels(&self) {
        if self.state.channels().next().is_none() {
            self.render(&DisplayEvent::note("no channels joined"));
            return;
        }
        for channel in self.state.channels() {
            let marker = if self.state.is_active(&channel.name) {
                "* "
            } else {
                "  "
            };
            self.render(&DisplayEvent::note(format!("{marker}{}", channel.name)));
        }
    }

    /// QUIT, then wait until the writer has put it on the wire.
    async fn quit(&mut self, message: &str) -> CommandResult {
        if !self.connected.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.send(&Message::quit(message))?;

        let (ack_tx, ack_rx) = oneshot::channel();
        if self.outbound.send(Outbound::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
        Ok(())
    }

    /// Argument if given, otherwise the active channel.
    fn resolve(&self, channel: Option<String>) -> CommandResult<String> {
        match channel {
            Some(name) => Ok(name),
            None => self
                .state
                .active_name()
                .map(str::to_owned)
                .ok_or(CommandError::NoActiveContext),
        }
    }

    fn send(&mut self, msg: &Message) -> CommandResult {
        let disconnected = || CommandError::Disconnected(self.state.address.clone());
        if !self.connected.load(Ordering::SeqCst) {
            return Err(disconnected());
        }
        self.outbound
            .send(Outbound::Line(msg.to_string()))
            .map_err(|_| disconnected())?;
        self.state.touch();
        Ok(())
    }

    fn render(&self, event: &DisplayEvent) {
        self.display.render(&self.state.address, event);
    }

    fn render_all(&self, events: &[DisplayEvent]) {
        for event in events {
            self.render(event);
        }
    }
}

// ============================================================================
// Handle
// ============================================================================

/// Session manager's handle to one server connection.
#[derive(Debug, Clone)]
pub struct ServerHandle {
    address: String,
    tx: mpsc::Sender<ServerEvent>,
    connected: Arc<AtomicBool>,
}

impl ServerHandle {
    /// Dial `address`, register with the configured identity and spawn the
    /// connection's tasks.
    pub async fn connect(
        address: String,
        config: &Config,
        display: Arc<dyn Display>,
    ) -> Result<Self, ConnectionError> {
        let (reader, writer) = transport::connect(&address, config.connection.max_line_len).await?;
        info!(server = %address, "connected");

        let connected = Arc::new(AtomicBool::new(true));
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (tx, rx) = mpsc::channel(config.connection.queue_size.max(1));

        let identity = &config.identity;
        let _ = out_tx.send(Outbound::Line(Message::nick(&identity.nick).to_string()));
        let _ = out_tx.send(Outbound::Line(
            Message::user(&identity.username, &identity.realname).to_string(),
        ));

        let actor = ServerActor {
            state: ServerState::new(address.clone(), identity),
            outbound: out_tx.clone(),
            display,
            connected: Arc::clone(&connected),
        };

        let span = spans::server(&address);
        tokio::spawn(actor.run(rx).instrument(span.clone()));
        span.in_scope(|| {
            transport::spawn_writer(writer, out_rx, Arc::clone(&connected));
            transport::spawn_listener(reader, tx.clone(), out_tx, Arc::clone(&connected));
        });

        Ok(Self {
            address,
            tx,
            connected,
        })
    }

    /// Run `command` on the actor and wait for its result.
    pub async fn request(&self, command: ServerCommand) -> CommandResult {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(ServerEvent::Command { command, reply_tx })
            .await
            .map_err(|_| CommandError::Disconnected(self.address.clone()))?;
        reply_rx
            .await
            .map_err(|_| CommandError::Disconnected(self.address.clone()))?
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// False once the listener or writer has stopped.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
