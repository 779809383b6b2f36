//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Identity Defaults
// =============================================================================

pub fn default_nick() -> String {
    "slirc".to_string()
}

pub fn default_username() -> String {
    "slirc".to_string()
}

pub fn default_realname() -> String {
    "slirc user".to_string()
}

// =============================================================================
// Connection Defaults
// =============================================================================

pub fn default_port() -> u16 {
    6667
}

pub fn default_max_line_len() -> usize {
    slirc_proto::DEFAULT_MAX_LINE_LEN
}

pub fn default_queue_size() -> usize {
    256
}

pub fn default_quit_message() -> String {
    "Leaving".to_string()
}
