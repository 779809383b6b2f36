//! slirc - multi-server IRC client.
//!
//! Each command-line argument is run as one command (`slirc "server
//! irc.libera.chat" "join #rust"`), then commands are read from stdin until
//! `quit`, end of input or a termination signal.

use anyhow::Context;
use slirc_client::config::{CONFIG_ENV, DEFAULT_CONFIG_PATH};
use slirc_client::{
    Config, Display, DisplayEvent, Flow, SessionManager, StdoutDisplay, split_input,
};
use std::io::BufRead;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// QUIT message used when the process is told to terminate.
const TERMINATION_MESSAGE: &str = "Program terminated";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is the display surface; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let config = load_config()?;
    let display: Arc<dyn Display> = Arc::new(StdoutDisplay);
    let mut session = SessionManager::new(config, Arc::clone(&display));

    let mut shutdown = std::pin::pin!(shutdown_signal());

    for arg in std::env::args().skip(1) {
        let line = if arg.starts_with('/') {
            arg
        } else {
            format!("/{arg}")
        };
        match run_interruptible(&mut session, display.as_ref(), &line, shutdown.as_mut()).await {
            Some(Flow::Continue) => {}
            Some(Flow::Quit) => return Ok(()),
            None => {
                terminate(&session).await;
                return Ok(());
            }
        }
    }

    let mut input = spawn_stdin_reader();

    loop {
        let line = tokio::select! {
            line = input.recv() => line,
            () = &mut shutdown => {
                terminate(&session).await;
                break;
            }
        };

        let Some(line) = line else {
            info!("end of input");
            let message = session.config().connection.quit_message.clone();
            session.shutdown(&message).await;
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match run_interruptible(&mut session, display.as_ref(), &line, shutdown.as_mut()).await {
            Some(Flow::Continue) => {}
            Some(Flow::Quit) => break,
            None => {
                terminate(&session).await;
                break;
            }
        }
    }

    Ok(())
}

/// `SLIRC_CONFIG` if set (must exist), else `slirc.toml` if present.
fn load_config() -> anyhow::Result<Config> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let shown = std::path::Path::new(&path).display().to_string();
            Config::load(&path).with_context(|| format!("loading config {shown}"))
        }
        None => Config::load_or_default(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("loading config {DEFAULT_CONFIG_PATH}")),
    }
}

/// Dispatch one input line; failures are shown and the loop goes on.
async fn run_line(session: &mut SessionManager, display: &dyn Display, line: &str) -> Flow {
    let (name, args) = split_input(line);
    match session.dispatch(name, args).await {
        Ok(flow) => flow,
        Err(e) => {
            debug!(code = e.error_code(), error = %e, "command failed");
            display.render("", &DisplayEvent::error(e.to_string()));
            Flow::Continue
        }
    }
}

/// Run one line unless a termination signal arrives first.
///
/// `None` means the signal won; the command in flight (a slow dial, say) is
/// dropped. A signal that is already pending wins over the command.
async fn run_interruptible(
    session: &mut SessionManager,
    display: &dyn Display,
    line: &str,
    shutdown: Pin<&mut impl Future<Output = ()>>,
) -> Option<Flow> {
    tokio::select! {
        biased;
        () = shutdown => None,
        flow = run_line(session, display, line) => Some(flow),
    }
}

/// QUIT every server with the termination message.
async fn terminate(session: &SessionManager) {
    info!("termination signal received");
    session.shutdown(TERMINATION_MESSAGE).await;
}

/// Read stdin on a plain thread; blocking reads would stall a runtime worker.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim_end_matches('\r').to_string();
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Resolves on ctrl-c or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slirc_client::MemoryDisplay;

    fn session() -> (SessionManager, Arc<MemoryDisplay>) {
        let display = Arc::new(MemoryDisplay::new());
        (SessionManager::new(Config::default(), display.clone()), display)
    }

    #[tokio::test]
    async fn test_signal_preempts_command() {
        let (mut session, display) = session();
        let signal = std::pin::pin!(std::future::ready(()));

        let flow = run_interruptible(&mut session, display.as_ref(), "/help", signal).await;

        assert_eq!(flow, None);
        assert!(display.events().is_empty());
    }

    #[tokio::test]
    async fn test_command_runs_without_signal() {
        let (mut session, display) = session();
        let signal = std::pin::pin!(std::future::pending::<()>());

        let flow = run_interruptible(&mut session, display.as_ref(), "/help", signal).await;

        assert_eq!(flow, Some(Flow::Continue));
        assert!(!display.events().is_empty());
    }

    #[tokio::test]
    async fn test_failed_command_is_shown() {
        let (mut session, display) = session();

        let flow = run_line(&mut session, display.as_ref(), "/nick a b").await;

        assert_eq!(flow, Flow::Continue);
        assert!(display.contains(|e| matches!(
            e,
            DisplayEvent::Status { text, .. } if text.starts_with("invalid nickname")
        )));
    }
}
