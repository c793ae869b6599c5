//! Connection error types for the TCP connector
//!
//! This module provides detailed error types for dialing and using TCP
//! connections, plus the command-level / connection-level classification
//! the pool relies on when deciding whether a returned connection is safe
//! to re-buffer.

use std::fmt;
use std::io::ErrorKind;

/// Errors produced by [`TcpConnector`](crate::TcpConnector)
#[derive(Debug)]
#[non_exhaustive]
pub enum ConnectError {
    /// The requested transport is not handled by this connector
    UnsupportedTransport { transport: String },

    /// The address string could not be resolved to a socket address
    InvalidAddress {
        address: String,
        source: std::io::Error,
    },

    /// TCP connection failed
    Connect {
        address: String,
        source: std::io::Error,
    },

    /// Socket configuration failed (buffer sizes, keepalive, etc.)
    SocketConfig {
        operation: &'static str,
        source: std::io::Error,
    },

    /// I/O error during communication on an established connection
    Io(std::io::Error),
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedTransport { transport } => {
                write!(f, "Unsupported transport '{}'", transport)
            }
            Self::InvalidAddress { address, source } => {
                write!(f, "Failed to resolve address '{}': {}", address, source)
            }
            Self::Connect { address, source } => {
                write!(f, "Failed to connect to {}: {}", address, source)
            }
            Self::SocketConfig { operation, source } => {
                write!(f, "Failed to configure socket ({}): {}", operation, source)
            }
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ConnectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedTransport { .. } => None,
            Self::InvalidAddress { source, .. } => Some(source),
            Self::Connect { source, .. } => Some(source),
            Self::SocketConfig { source, .. } => Some(source),
            Self::Io(e) => Some(e),
        }
    }
}

impl ConnectError {
    /// Check if this error arose while establishing a connection
    #[must_use]
    pub const fn is_dial_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedTransport { .. }
                | Self::InvalidAddress { .. }
                | Self::Connect { .. }
                | Self::SocketConfig { .. }
        )
    }

    /// Check if this error means the transport itself is no longer usable
    ///
    /// Dial errors and the io::ErrorKind values that indicate a torn-down
    /// stream are connection-level; everything else (timeouts, protocol-level
    /// `InvalidData`, interruptions) leaves the connection structurally
    /// sound.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        match self {
            Self::Io(e) => matches!(
                e.kind(),
                ErrorKind::BrokenPipe
                    | ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::UnexpectedEof
                    | ErrorKind::NotConnected
            ),
            _ => self.is_dial_error(),
        }
    }
}

impl From<std::io::Error> for ConnectError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
