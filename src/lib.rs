//! Bounded pool of reusable network-service client connections
//!
//! This crate amortizes connection-establishment cost under concurrent
//! workloads. A [`Pool`] holds a bounded buffer of idle connections; callers
//! take one ([`Pool::get`]), use it, and hand it back ([`Pool::put`] /
//! [`Pool::put_checked`]). When the buffer is empty a new connection is
//! dialed on demand; when it is full a returned connection is closed instead
//! of buffered, so the number of *idle* connections never exceeds the
//! configured size. There is no cap on the number of connections ever
//! created, only on the number held idle.
//!
//! The pool knows nothing about the wire protocol of the connections it
//! holds. Dialing, closing, and error classification are delegated to a
//! [`Connector`] implementation; [`TcpConnector`] is the stock one for plain
//! TCP streams.
//!
//! # Example
//!
//! ```no_run
//! use netpool::{Pool, TcpConnector};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = Pool::connect(TcpConnector::new(), "tcp", "127.0.0.1:6379", 4).await?;
//! let conn = pool.get().await?;
//! // ... use the connection ...
//! pool.put(conn).await;
//! # Ok(())
//! # }
//! ```

pub mod connection_error;
pub mod connector;
pub mod mock;
pub mod pool;
pub mod tcp;
pub mod types;

pub use connection_error::ConnectError;
pub use connector::Connector;
pub use mock::{MockConn, MockConnector, MockError};
pub use pool::Pool;
pub use tcp::TcpConnector;
pub use types::{AvailableConnections, CreatedConnections, MaxPoolSize, PoolStatus};
