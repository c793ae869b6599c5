//! Bounded idle-connection pool
//!
//! The pool keeps up to `size` idle connections in a lock-free queue.
//! Acquiring pops an idle connection or dials a new one; releasing pushes
//! the connection back or closes it when the buffer is already full. All
//! buffer operations are non-blocking, so callers never wait on each other,
//! only on the connector's own dial.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam::queue::SegQueue;
use tracing::{debug, info, warn};

use crate::connector::Connector;
use crate::types::{AvailableConnections, CreatedConnections, MaxPoolSize, PoolStatus};

struct PoolInner<C: Connector> {
    connector: C,
    transport: String,
    address: String,
    /// Maximum number of idle connections buffered at once
    max_idle: usize,
    idle: SegQueue<C::Conn>,
    /// Occupancy of `idle`, maintained with slot reservations so racing
    /// pushers can never overfill the buffer
    idle_count: AtomicUsize,
    /// Lifetime count of successful dials
    created: AtomicUsize,
}

/// Bounded pool of reusable connections produced by a [`Connector`]
///
/// Cloning is cheap and clones share the same idle buffer, so a pool can be
/// handed to any number of concurrent tasks without external locking.
pub struct Pool<C: Connector> {
    inner: Arc<PoolInner<C>>,
}

impl<C: Connector> Clone for Pool<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Connector> fmt::Debug for Pool<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("transport", &self.inner.transport)
            .field("address", &self.inner.address)
            .field("max_idle", &self.inner.max_idle)
            .field("idle", &self.inner.idle_count.load(Ordering::Relaxed))
            .field("created", &self.inner.created.load(Ordering::Relaxed))
            .finish()
    }
}

impl<C: Connector> Pool<C> {
    fn with_connector(
        connector: C,
        transport: impl Into<String>,
        address: impl Into<String>,
        size: usize,
    ) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                connector,
                transport: transport.into(),
                address: address.into(),
                max_idle: size,
                idle: SegQueue::new(),
                idle_count: AtomicUsize::new(0),
                created: AtomicUsize::new(0),
            }),
        }
    }

    /// Create a pool and eagerly dial `size` connections into the idle buffer
    ///
    /// Startup connectivity is verified up front: if any dial fails, the
    /// connections dialed so far are closed best-effort and the dial error
    /// is returned instead of a pool. See [`Pool::connect_or_empty`] for the
    /// tolerant variant.
    ///
    /// # Errors
    ///
    /// Returns the connector's error if any of the `size` eager dials fails.
    pub async fn connect(
        connector: C,
        transport: impl Into<String>,
        address: impl Into<String>,
        size: usize,
    ) -> Result<Self, C::Error> {
        let pool = Self::with_connector(connector, transport, address, size);
        if let Err(e) = pool.fill().await {
            warn!(
                "Failed to pre-establish connections to {}: {}",
                pool.inner.address, e
            );
            pool.empty().await;
            return Err(e);
        }
        info!(
            "Pre-established {} connections to {}",
            size, pool.inner.address
        );
        Ok(pool)
    }

    /// Like [`Pool::connect`], but fall back to an empty idle buffer if the
    /// eager dials fail
    ///
    /// Never fails. Useful when the remote service may not be reachable yet
    /// at pool-creation time: subsequent [`Pool::get`] calls dial on demand
    /// and the buffer fills up as connections are released.
    pub async fn connect_or_empty(
        connector: C,
        transport: impl Into<String>,
        address: impl Into<String>,
        size: usize,
    ) -> Self {
        let pool = Self::with_connector(connector, transport, address, size);
        match pool.fill().await {
            Ok(()) => info!(
                "Pre-established {} connections to {}",
                size, pool.inner.address
            ),
            Err(e) => {
                warn!(
                    "Failed to pre-establish connections to {}, starting empty: {}",
                    pool.inner.address, e
                );
                pool.empty().await;
            }
        }
        pool
    }

    /// Get a connection, reusing an idle one when available
    ///
    /// Pops the idle buffer without blocking; on an empty buffer a fresh
    /// connection is dialed via the connector. The only wait in this path
    /// is the dial itself, whose timeout policy belongs to the connector.
    ///
    /// # Errors
    ///
    /// Returns the connector's error when the buffer was empty and the
    /// on-demand dial failed.
    pub async fn get(&self) -> Result<C::Conn, C::Error> {
        if let Some(conn) = self.try_pop() {
            debug!("Reusing idle connection to {}", self.inner.address);
            return Ok(conn);
        }
        debug!("Idle buffer empty, dialing {}", self.inner.address);
        self.dial().await
    }

    /// Return a connection to the idle buffer, closing it if the buffer is
    /// full
    ///
    /// Never blocks: the push is a non-blocking attempt, and on a full
    /// buffer the connection is closed best-effort instead. Close failures
    /// are logged and swallowed.
    pub async fn put(&self, conn: C::Conn) {
        match self.try_buffer(conn) {
            Ok(()) => {}
            Err(conn) => {
                debug!(
                    "Idle buffer for {} is full, closing returned connection",
                    self.inner.address
                );
                self.close_quietly(conn).await;
            }
        }
    }

    /// Return a connection unless the caller's last error says its
    /// transport is broken
    ///
    /// Pass the error state observed while using the connection. No error
    /// and command-level errors (per [`Connector::is_command_error`]) re-pool
    /// the connection exactly like [`Pool::put`]; a connection-level error
    /// closes it instead, so a broken connection can never re-enter the
    /// idle buffer. This lets callers release on every exit path without
    /// first checking what went wrong:
    ///
    /// ```no_run
    /// # use netpool::{Pool, TcpConnector, ConnectError};
    /// # async fn example(pool: &Pool<TcpConnector>) -> Result<(), ConnectError> {
    /// let mut conn = pool.get().await?;
    /// let result = run_command(&mut conn).await;
    /// pool.put_checked(conn, result.as_ref().err()).await;
    /// result
    /// # }
    /// # async fn run_command(
    /// #     _conn: &mut tokio::net::TcpStream,
    /// # ) -> Result<(), ConnectError> { Ok(()) }
    /// ```
    pub async fn put_checked(&self, conn: C::Conn, err: Option<&C::Error>) {
        if let Some(e) = err {
            if !self.inner.connector.is_command_error(e) {
                debug!(
                    "Connection-level error, not re-buffering connection to {}: {}",
                    self.inner.address, e
                );
                self.close_quietly(conn).await;
                return;
            }
        }
        self.put(conn).await;
    }

    /// Run a closure against a pooled connection with guaranteed release
    ///
    /// Acquires a connection, hands it to `f`, and routes the closure's
    /// error state through [`Pool::put_checked`] regardless of outcome. The
    /// closure takes ownership of the connection and returns it alongside
    /// its result.
    ///
    /// # Errors
    ///
    /// Returns the dial error if no connection could be acquired, or the
    /// closure's own error.
    pub async fn with_conn<F, Fut, T>(&self, f: F) -> Result<T, C::Error>
    where
        F: FnOnce(C::Conn) -> Fut,
        Fut: Future<Output = (C::Conn, Result<T, C::Error>)>,
    {
        let conn = self.get().await?;
        let (conn, result) = f(conn).await;
        self.put_checked(conn, result.as_ref().err()).await;
        result
    }

    /// Drain the idle buffer, closing every idle connection
    ///
    /// Connections currently checked out are unaffected; they are closed
    /// individually on release once the (now smaller) buffer refills.
    /// Idempotent, and the pool stays usable: later [`Pool::get`] calls
    /// simply dial fresh connections.
    pub async fn empty(&self) {
        let mut drained = 0usize;
        while let Some(conn) = self.try_pop() {
            self.close_quietly(conn).await;
            drained += 1;
        }
        if drained > 0 {
            debug!(
                "Drained {} idle connections to {}",
                drained, self.inner.address
            );
        }
    }

    /// Snapshot of the pool's counters for monitoring
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            available: AvailableConnections::new(self.inner.idle_count.load(Ordering::Relaxed)),
            max_size: MaxPoolSize::new(self.inner.max_idle),
            created: CreatedConnections::new(self.inner.created.load(Ordering::Relaxed)),
        }
    }

    /// Transport family this pool dials with (e.g. "tcp")
    #[must_use]
    pub fn transport(&self) -> &str {
        &self.inner.transport
    }

    /// Target endpoint this pool dials
    #[must_use]
    pub fn address(&self) -> &str {
        &self.inner.address
    }

    async fn fill(&self) -> Result<(), C::Error> {
        for _ in 0..self.inner.max_idle {
            let conn = self.dial().await?;
            if let Err(conn) = self.try_buffer(conn) {
                // A clone raced us into the buffer; keep the bound and
                // discard the extra dial.
                self.close_quietly(conn).await;
            }
        }
        Ok(())
    }

    async fn dial(&self) -> Result<C::Conn, C::Error> {
        let conn = self
            .inner
            .connector
            .dial(&self.inner.transport, &self.inner.address)
            .await?;
        self.inner.created.fetch_add(1, Ordering::Relaxed);
        Ok(conn)
    }

    /// Non-blocking bounded push; hands the connection back on a full buffer
    fn try_buffer(&self, conn: C::Conn) -> Result<(), C::Conn> {
        let reserved = self
            .inner
            .idle_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                if n < self.inner.max_idle {
                    Some(n + 1)
                } else {
                    None
                }
            })
            .is_ok();
        if reserved {
            self.inner.idle.push(conn);
            Ok(())
        } else {
            Err(conn)
        }
    }

    /// Non-blocking pop of the idle buffer
    fn try_pop(&self) -> Option<C::Conn> {
        let conn = self.inner.idle.pop()?;
        self.inner.idle_count.fetch_sub(1, Ordering::AcqRel);
        Some(conn)
    }

    async fn close_quietly(&self, conn: C::Conn) {
        if let Err(e) = self.inner.connector.close(conn).await {
            debug!(
                "Error closing discarded connection to {}: {}",
                self.inner.address, e
            );
        }
    }
}
