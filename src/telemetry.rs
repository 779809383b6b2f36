//! Telemetry utilities.

/// Standardized span constructors for client observability.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one server connection's tasks.
    pub fn server(address: &str) -> Span {
        info_span!("server", address = %address)
    }

    /// Create a span for a user command dispatch.
    ///
    /// The empty command (plain text typed at the prompt) is labeled `say`.
    pub fn command(name: &str, server: Option<&str>) -> Span {
        let name = if name.is_empty() { "say" } else { name };
        if let Some(server) = server {
            info_span!("command", name = %name, server = %server)
        } else {
            info_span!("command", name = %name)
        }
    }
}
