//! Error types for sessions and their transport.

use std::fmt;

use crate::game::GridError;

/// Transport failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Could not listen on the requested address.
    Bind {
        /// Requested address.
        addr: String,
        /// Underlying error message.
        message: String,
    },
    /// Could not reach the peer.
    Connect {
        /// Peer address.
        addr: String,
        /// Underlying error message.
        message: String,
    },
    /// An established stream failed.
    Io(String),
    /// The channel was already closed.
    Closed,
}

impl ChannelError {
    pub(crate) fn io(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, message } => write!(f, "cannot listen on {addr}: {message}"),
            Self::Connect { addr, message } => write!(f, "cannot connect to {addr}: {message}"),
            Self::Io(message) => write!(f, "connection error: {message}"),
            Self::Closed => write!(f, "channel is closed"),
        }
    }
}

impl std::error::Error for ChannelError {}

/// Errors that stop a session from starting or running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The configuration does not fit the maps.
    InvalidSetup {
        /// What is wrong.
        reason: String,
    },
    /// A configuration file could not be read or parsed.
    Config {
        /// Path of the file.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// A map could not be loaded.
    Grid(GridError),
    /// The transport failed.
    Channel(ChannelError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetup { reason } => write!(f, "invalid session setup: {reason}"),
            Self::Config { path, message } => write!(f, "bad config {path}: {message}"),
            Self::Grid(e) => write!(f, "{e}"),
            Self::Channel(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Channel(e) => Some(e),
            Self::InvalidSetup { .. } | Self::Config { .. } => None,
        }
    }
}

impl From<GridError> for SessionError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<ChannelError> for SessionError {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}
