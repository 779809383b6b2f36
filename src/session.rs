//! Session manager: the command loop's view of every connection.
//!
//! Owns the [`ServerHandle`]s, tracks which one is current and dispatches
//! parsed user commands. Commands that touch one server's state are
//! forwarded to that server's actor; the rest (`server`, `servers`, `help`,
//! `quit`) are handled here.

use crate::command::{Command, ServerCommand, USAGE};
use crate::config::Config;
use crate::display::{Display, DisplayEvent, StatusKind};
use crate::error::{CommandError, CommandResult};
use crate::network::ServerHandle;
use crate::telemetry::spans;
use std::sync::Arc;
use tracing::{Instrument, debug, warn};

/// Whether the command loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Every server has been sent QUIT; exit the process.
    Quit,
}

/// All connections of one client session.
pub struct SessionManager {
    config: Config,
    display: Arc<dyn Display>,
    servers: Vec<ServerHandle>,
    current: Option<usize>,
}

impl SessionManager {
    pub fn new(config: Config, display: Arc<dyn Display>) -> Self {
        Self {
            config,
            display,
            servers: Vec::new(),
            current: None,
        }
    }

    /// Parse and run one command.
    ///
    /// `name` is empty for plain text, which goes to the active channel of
    /// the current server.
    pub async fn dispatch(&mut self, name: &str, args: &str) -> CommandResult<Flow> {
        let span = spans::command(name, self.current().map(ServerHandle::address));
        async {
            let command = Command::parse(name, args)?;
            self.execute(command).await
        }
        .instrument(span)
        .await
    }

    /// Run an already parsed command.
    pub async fn execute(&mut self, command: Command) -> CommandResult<Flow> {
        match command {
            Command::Quit(message) => {
                let message = message.unwrap_or_else(|| self.config.connection.quit_message.clone());
                self.shutdown(&message).await;
                return Ok(Flow::Quit);
            }
            Command::Connect { host, port } => self.connect(&host, port).await?,
            Command::Servers => self.list_servers(),
            Command::Help => self.help(),
            Command::Server(command) => {
                let server = self.current().ok_or(CommandError::NotConnected)?;
                server.request(command).await?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Open a connection and make it current.
    ///
    /// A host that already carries a port (`host:port`) is used as is when
    /// no port is given.
    pub async fn connect(&mut self, host: &str, port: Option<u16>) -> CommandResult {
        let address = match port {
            None if host.contains(':') => host.to_string(),
            _ => format!(
                "{host}:{}",
                port.unwrap_or(self.config.connection.default_port)
            ),
        };

        let handle = ServerHandle::connect(address, &self.config, Arc::clone(&self.display))
            .await
            .map_err(|e| {
                warn!(server = %e.address, error = %e.source, "connect failed");
                e
            })?;

        self.note(DisplayEvent::status(
            StatusKind::Info,
            format!("connected to {}", handle.address()),
        ));
        self.servers.push(handle);
        self.current = Some(self.servers.len() - 1);
        Ok(())
    }

    /// Send QUIT to every server and wait for each to reach the socket.
    ///
    /// Failures are logged and skipped: one dead connection must not keep
    /// the others from being told.
    pub async fn shutdown(&self, message: &str) {
        for server in &self.servers {
            if let Err(e) = server.request(ServerCommand::Quit(message.to_string())).await {
                debug!(server = %server.address(), error = %e, "quit not delivered");
            }
        }
    }

    fn list_servers(&self) {
        if self.servers.is_empty() {
            self.note(DisplayEvent::note("not connected to any server"));
            return;
        }
        for (idx, server) in self.servers.iter().enumerate() {
            let marker = if self.current == Some(idx) { "* " } else { "  " };
            let state = if server.is_connected() {
                ""
            } else {
                " (disconnected)"
            };
            self.note(DisplayEvent::note(format!(
                "{marker}{idx}: {}{state}",
                server.address()
            )));
        }
    }

    fn help(&self) {
        for (usage, about) in USAGE {
            self.note(DisplayEvent::note(format!("/{usage:<28}{about}")));
        }
    }

    fn note(&self, event: DisplayEvent) {
        self.display.render("", &event);
    }

    pub fn servers(&self) -> &[ServerHandle] {
        &self.servers
    }

    /// The server new commands go to.
    pub fn current(&self) -> Option<&ServerHandle> {
        self.current.and_then(|idx| self.servers.get(idx))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MemoryDisplay;

    fn manager() -> (SessionManager, Arc<MemoryDisplay>) {
        let display = Arc::new(MemoryDisplay::new());
        let manager = SessionManager::new(Config::default(), display.clone());
        (manager, display)
    }

    #[tokio::test]
    async fn test_plain_text_without_server() {
        let (mut manager, _) = manager();
        assert!(matches!(
            manager.dispatch("", "hi").await,
            Err(CommandError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_nick_validated_before_connection() {
        let (mut manager, _) = manager();
        assert!(matches!(
            manager.dispatch("nick", "").await,
            Err(CommandError::InvalidNick(_))
        ));
        assert!(matches!(
            manager.dispatch("nick", "a b").await,
            Err(CommandError::InvalidNick(_))
        ));
        assert!(matches!(
            manager.dispatch("nick", "alice").await,
            Err(CommandError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_quit_without_servers() {
        let (mut manager, _) = manager();
        assert_eq!(manager.dispatch("quit", "").await.unwrap(), Flow::Quit);
    }

    #[tokio::test]
    async fn test_servers_and_help_are_local() {
        let (mut manager, display) = manager();
        manager.dispatch("servers", "").await.unwrap();
        manager.dispatch("help", "").await.unwrap();

        let events = display.events();
        assert_eq!(
            events[0],
            DisplayEvent::note("not connected to any server")
        );
        assert_eq!(events.len(), 1 + USAGE.len());
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let (mut manager, _) = manager();
        assert!(matches!(
            manager.dispatch("frob", "").await,
            Err(CommandError::UnknownCommand(_))
        ));
    }
}
