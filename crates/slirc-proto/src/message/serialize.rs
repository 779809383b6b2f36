use std::fmt::{self, Display, Formatter};

use super::types::Message;

/// True if `param` can only be sent as a trailing parameter.
fn needs_trailing(param: &str) -> bool {
    param.is_empty() || param.contains(' ') || param.starts_with(':')
}

/// Serializes without a line terminator; framing is the codec's job.
impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.prefix.is_empty() {
            write!(f, ":{} ", self.prefix)?;
        }

        write!(f, "{}", self.command)?;

        let Some((last, middle)) = self.params.split_last() else {
            return Ok(());
        };

        for param in middle {
            write!(f, " {}", param)?;
        }

        // The trailing marker is always used for the last of several
        // params so free-text arguments round-trip unchanged.
        if needs_trailing(last) || !middle.is_empty() {
            write!(f, " :{}", last)
        } else {
            write!(f, " {}", last)
        }
    }
}
