//! Connection factory abstraction
//!
//! The pool delegates everything connection-specific to a [`Connector`]:
//! how to dial, how to close, and how to tell a broken connection from a
//! merely failed operation. This keeps the pool generic over the wrapped
//! client and makes it trivially mockable for tests.

use async_trait::async_trait;

/// Factory capability for the connections managed by a pool
///
/// Implementations supply the three things the pool cannot know itself:
/// dialing a fresh connection, closing a discarded one, and classifying
/// errors reported by callers.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// The connection handle type managed by this connector
    type Conn: Send + 'static;

    /// Error type produced by dialing and by operations on connections
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open a new connection to `address` over `transport` (e.g. "tcp")
    ///
    /// May block (asynchronously) for as long as its own timeout policy
    /// allows; the pool imposes no timeout of its own.
    async fn dial(&self, transport: &str, address: &str) -> Result<Self::Conn, Self::Error>;

    /// Release the underlying transport resources of `conn`
    ///
    /// The pool treats close as best-effort: failures are logged and
    /// swallowed, never surfaced to callers.
    async fn close(&self, conn: Self::Conn) -> Result<(), Self::Error>;

    /// Classify an error reported by a caller returning a connection
    ///
    /// `true` means the operation failed but the connection itself is still
    /// structurally sound (a command-level error) and safe to re-pool.
    /// `false` means the transport must be assumed broken. The default is
    /// the conservative one: an unclassifiable error never re-pools a
    /// possibly broken connection.
    fn is_command_error(&self, _err: &Self::Error) -> bool {
        false
    }
}

/// Blanket impl so an `Arc<C>` can be used wherever a connector is expected
#[async_trait]
impl<C: Connector> Connector for std::sync::Arc<C> {
    type Conn = C::Conn;
    type Error = C::Error;

    async fn dial(&self, transport: &str, address: &str) -> Result<Self::Conn, Self::Error> {
        (**self).dial(transport, address).await
    }

    async fn close(&self, conn: Self::Conn) -> Result<(), Self::Error> {
        (**self).close(conn).await
    }

    fn is_command_error(&self, err: &Self::Error) -> bool {
        (**self).is_command_error(err)
    }
}
