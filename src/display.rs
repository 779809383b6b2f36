//! Display collaborator.
//!
//! The engine never prints. It produces [`DisplayEvent`]s and hands them to
//! a [`Display`], which decides how (and whether) to show them. Rendering is
//! plain text; colors and windowing belong to richer front ends.

use parking_lot::Mutex;
use std::io::Write;

/// Semantic category of a status note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Join,
    Part,
    Quit,
    Nick,
    Kick,
    Info,
    Error,
}

/// One thing the user should see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    /// Clear the display surface.
    Clear,
    /// Plain note (generic server output, command listings).
    Note(String),
    /// Semantic note about membership or session state.
    Status { kind: StatusKind, text: String },
    /// Message in a channel.
    Message {
        channel: String,
        sender: String,
        text: String,
    },
    /// Private message, shown tagged `[private]`.
    Private { sender: String, text: String },
}

impl DisplayEvent {
    pub fn note(text: impl Into<String>) -> Self {
        Self::Note(text.into())
    }

    pub fn status(kind: StatusKind, text: impl Into<String>) -> Self {
        Self::Status {
            kind,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::status(StatusKind::Error, text)
    }
}

impl std::fmt::Display for DisplayEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clear => Ok(()),
            Self::Note(text) => write!(f, "{text}"),
            Self::Status {
                kind: StatusKind::Error,
                text,
            } => write!(f, "!!! {text}"),
            Self::Status { text, .. } => write!(f, "*** {text}"),
            Self::Message {
                channel,
                sender,
                text,
            } => write!(f, "[{channel}] <{sender}> {text}"),
            Self::Private { sender, text } => write!(f, "[private] <{sender}> {text}"),
        }
    }
}

/// Sink for display events.
///
/// `origin` is the address of the server the event belongs to, or empty for
/// events produced by the command loop itself.
pub trait Display: Send + Sync {
    fn render(&self, origin: &str, event: &DisplayEvent);
}

/// Plain line renderer on standard output.
#[derive(Debug, Default)]
pub struct StdoutDisplay;

impl Display for StdoutDisplay {
    fn render(&self, _origin: &str, event: &DisplayEvent) {
        let mut out = std::io::stdout().lock();
        // A closed stdout is not worth tearing the session down for
        let _ = match event {
            // ANSI erase-display, then cursor home
            DisplayEvent::Clear => write!(out, "\x1b[2J\x1b[H"),
            other => writeln!(out, "{other}"),
        };
        let _ = out.flush();
    }
}

/// Recorder that keeps every rendered event in memory.
///
/// Useful for tests and for front ends that poll instead of being pushed to.
#[derive(Debug, Default)]
pub struct MemoryDisplay {
    events: Mutex<Vec<(String, DisplayEvent)>>,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events rendered so far, without their origin.
    pub fn events(&self) -> Vec<DisplayEvent> {
        self.events.lock().iter().map(|(_, e)| e.clone()).collect()
    }

    /// Events rendered so far, with their origin.
    pub fn events_with_origin(&self) -> Vec<(String, DisplayEvent)> {
        self.events.lock().clone()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// True if any recorded event satisfies `predicate`.
    pub fn contains(&self, predicate: impl Fn(&DisplayEvent) -> bool) -> bool {
        self.events.lock().iter().any(|(_, e)| predicate(e))
    }
}

impl Display for MemoryDisplay {
    fn render(&self, origin: &str, event: &DisplayEvent) {
        self.events.lock().push((origin.to_string(), event.clone()));
    }
}
