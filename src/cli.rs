//! CLI command implementations for warptag.

pub(crate) mod check_map;
pub(crate) mod logging;
pub(crate) mod play;

mod terminal;

use std::error::Error;
use std::fmt;

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<warptag::SessionError> for CliError {
    fn from(e: warptag::SessionError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<warptag::ChannelError> for CliError {
    fn from(e: warptag::ChannelError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<warptag::game::GridError> for CliError {
    fn from(e: warptag::game::GridError) -> Self {
        Self::new(e.to_string())
    }
}
