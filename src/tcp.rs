//! Stock TCP connector
//!
//! Dials plain TCP streams with the socket tuning that matters for
//! connection reuse: Nagle disabled for latency, optional keepalive so idle
//! pooled connections are not silently dropped by middleboxes, and optional
//! kernel buffer sizing for high-throughput workloads.

use std::io::ErrorKind;
use std::time::Duration;

use async_trait::async_trait;
use socket2::{SockRef, TcpKeepalive};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, lookup_host};
use tracing::debug;

use crate::connection_error::ConnectError;
use crate::connector::Connector;

/// [`Connector`] implementation for the "tcp" transport
#[derive(Debug, Clone)]
pub struct TcpConnector {
    nodelay: bool,
    keepalive: Option<Duration>,
    buffer_size: Option<usize>,
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl TcpConnector {
    /// Create a connector with Nagle disabled and no keepalive
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodelay: true,
            keepalive: None,
            buffer_size: None,
        }
    }

    /// Enable or disable `TCP_NODELAY` (enabled by default)
    #[must_use]
    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }

    /// Enable TCP keepalive probes after `time` of idleness
    ///
    /// Worth setting for pooled connections, which may sit idle for long
    /// stretches between checkouts.
    #[must_use]
    pub fn with_keepalive(mut self, time: Duration) -> Self {
        self.keepalive = Some(time);
        self
    }

    /// Set the kernel send and receive buffer sizes
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = Some(size);
        self
    }

    fn tune(&self, stream: &TcpStream) -> Result<(), ConnectError> {
        let sock = SockRef::from(stream);

        sock.set_nodelay(self.nodelay)
            .map_err(|source| ConnectError::SocketConfig {
                operation: "nodelay",
                source,
            })?;

        if let Some(time) = self.keepalive {
            let keepalive = TcpKeepalive::new().with_time(time);
            sock.set_tcp_keepalive(&keepalive)
                .map_err(|source| ConnectError::SocketConfig {
                    operation: "keepalive",
                    source,
                })?;
        }

        if let Some(size) = self.buffer_size {
            sock.set_recv_buffer_size(size)
                .map_err(|source| ConnectError::SocketConfig {
                    operation: "recv buffer size",
                    source,
                })?;
            sock.set_send_buffer_size(size)
                .map_err(|source| ConnectError::SocketConfig {
                    operation: "send buffer size",
                    source,
                })?;
        }

        Ok(())
    }
}

#[async_trait]
impl Connector for TcpConnector {
    type Conn = TcpStream;
    type Error = ConnectError;

    async fn dial(&self, transport: &str, address: &str) -> Result<TcpStream, ConnectError> {
        if !transport.eq_ignore_ascii_case("tcp") {
            return Err(ConnectError::UnsupportedTransport {
                transport: transport.to_string(),
            });
        }

        let addr = lookup_host(address)
            .await
            .map_err(|source| ConnectError::InvalidAddress {
                address: address.to_string(),
                source,
            })?
            .next()
            .ok_or_else(|| ConnectError::InvalidAddress {
                address: address.to_string(),
                source: std::io::Error::new(ErrorKind::NotFound, "no addresses resolved"),
            })?;

        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ConnectError::Connect {
                address: address.to_string(),
                source,
            })?;
        self.tune(&stream)?;

        debug!("Dialed tcp connection to {}", address);
        Ok(stream)
    }

    async fn close(&self, mut conn: TcpStream) -> Result<(), ConnectError> {
        // Graceful FIN; the stream's resources are released on drop either way.
        conn.shutdown().await?;
        Ok(())
    }

    fn is_command_error(&self, err: &ConnectError) -> bool {
        !err.is_connection_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_dial_and_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let connector = TcpConnector::new().with_keepalive(Duration::from_secs(60));
        let conn = connector.dial("tcp", &address).await.unwrap();
        assert!(conn.nodelay().unwrap());

        connector.close(conn).await.unwrap();
    }

    #[tokio::test]
    async fn test_unsupported_transport() {
        let connector = TcpConnector::new();
        let err = connector.dial("unix", "/tmp/sock").await.unwrap_err();
        assert!(matches!(err, ConnectError::UnsupportedTransport { .. }));
    }

    #[tokio::test]
    async fn test_dial_refused() {
        // Bind then drop to find a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let connector = TcpConnector::new();
        let err = connector.dial("tcp", &address).await.unwrap_err();
        assert!(matches!(err, ConnectError::Connect { .. }));
        assert!(err.is_dial_error());
    }

    #[tokio::test]
    async fn test_dial_invalid_address() {
        let connector = TcpConnector::new();
        let err = connector.dial("tcp", "missing-a-port").await.unwrap_err();
        assert!(matches!(err, ConnectError::InvalidAddress { .. }));
    }

    #[tokio::test]
    async fn test_classification() {
        let connector = TcpConnector::new();

        let timeout = ConnectError::Io(std::io::Error::new(ErrorKind::TimedOut, "slow"));
        assert!(connector.is_command_error(&timeout));

        let reset = ConnectError::Io(std::io::Error::new(ErrorKind::ConnectionReset, "reset"));
        assert!(!connector.is_command_error(&reset));
    }
}
