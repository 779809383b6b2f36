//! Integration test common infrastructure.
//!
//! A scripted fake IRC server, plus helpers for building a session that
//! renders into a [`MemoryDisplay`] and for waiting on what it shows.

pub mod server;

#[allow(unused_imports)]
pub use server::{TestPeer, TestServer};

use slirc_client::{Config, DisplayEvent, MemoryDisplay, SessionManager};
use std::sync::Arc;
use std::time::Duration;

/// How long any single expectation may take.
pub const WAIT: Duration = Duration::from_secs(5);

/// Session with identity `alice` recording into a memory display.
#[allow(dead_code)]
pub fn session() -> (SessionManager, Arc<MemoryDisplay>) {
    let mut config = Config::default();
    config.identity.nick = "alice".to_string();
    config.identity.username = "alice".to_string();
    config.identity.realname = "Alice Liddell".to_string();

    let display = Arc::new(MemoryDisplay::new());
    let session = SessionManager::new(config, display.clone());
    (session, display)
}

/// Poll `display` until an event matches `predicate`.
#[allow(dead_code)]
pub async fn wait_for(
    display: &MemoryDisplay,
    predicate: impl Fn(&DisplayEvent) -> bool,
) -> anyhow::Result<()> {
    tokio::time::timeout(WAIT, async {
        while !display.contains(&predicate) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .map_err(|_| anyhow::anyhow!("display never showed the expected event: {:?}", display.events()))
}

/// Shorthand for waiting on a plain note.
#[allow(dead_code)]
pub async fn wait_for_note(display: &MemoryDisplay, text: &str) -> anyhow::Result<()> {
    wait_for(display, |e| *e == DisplayEvent::note(text)).await
}
