//! Mock connector for testing
//!
//! A deterministic, in-memory [`Connector`] that tracks dial/close counts
//! and can be scripted to fail dialing or closing. Used by this crate's own
//! tests and exported so downstream users can test pool-driven code without
//! real network connections.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::connector::Connector;

/// Errors produced by [`MockConnector`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    /// Dial was scripted to fail
    Dial,
    /// Operation failed but the connection is structurally sound
    Command,
    /// The connection transport is broken
    Connection,
    /// Close was scripted to fail
    Close,
}

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dial => write!(f, "mock dial failure"),
            Self::Command => write!(f, "mock command-level failure"),
            Self::Connection => write!(f, "mock connection-level failure"),
            Self::Close => write!(f, "mock close failure"),
        }
    }
}

impl std::error::Error for MockError {}

/// Connection handle produced by [`MockConnector`]
#[derive(Debug)]
pub struct MockConn {
    id: usize,
}

impl MockConn {
    /// Sequence number of this connection, in dial order starting at 0
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }
}

#[derive(Debug, Default)]
struct MockState {
    attempts: AtomicUsize,
    dialed: AtomicUsize,
    closed: AtomicUsize,
    /// Attempt index at which dials start failing; usize::MAX = never
    fail_from: AtomicUsize,
    fail_closes: AtomicBool,
}

/// Scriptable in-memory connection factory
///
/// Clones share state, so a test can keep one handle for assertions while
/// the pool owns another.
#[derive(Debug, Clone)]
pub struct MockConnector {
    state: Arc<MockState>,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    #[must_use]
    pub fn new() -> Self {
        let state = MockState {
            fail_from: AtomicUsize::new(usize::MAX),
            ..MockState::default()
        };
        Self {
            state: Arc::new(state),
        }
    }

    /// Number of successful dials so far
    #[must_use]
    pub fn dial_count(&self) -> usize {
        self.state.dialed.load(Ordering::Relaxed)
    }

    /// Number of closed connections so far (including failed closes)
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.state.closed.load(Ordering::Relaxed)
    }

    /// Let `n` more dial attempts succeed, then fail every one after that
    pub fn fail_dials_after(&self, n: usize) {
        let current = self.state.attempts.load(Ordering::Relaxed);
        self.state
            .fail_from
            .store(current.saturating_add(n), Ordering::Relaxed);
    }

    /// Clear any scripted dial failure
    pub fn heal(&self) {
        self.state.fail_from.store(usize::MAX, Ordering::Relaxed);
    }

    /// Make every close report an error (the pool must swallow these)
    pub fn fail_closes(&self, fail: bool) {
        self.state.fail_closes.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Conn = MockConn;
    type Error = MockError;

    async fn dial(&self, _transport: &str, _address: &str) -> Result<MockConn, MockError> {
        let attempt = self.state.attempts.fetch_add(1, Ordering::Relaxed);
        if attempt >= self.state.fail_from.load(Ordering::Relaxed) {
            return Err(MockError::Dial);
        }
        let id = self.state.dialed.fetch_add(1, Ordering::Relaxed);
        Ok(MockConn { id })
    }

    async fn close(&self, _conn: MockConn) -> Result<(), MockError> {
        self.state.closed.fetch_add(1, Ordering::Relaxed);
        if self.state.fail_closes.load(Ordering::Relaxed) {
            return Err(MockError::Close);
        }
        Ok(())
    }

    fn is_command_error(&self, err: &MockError) -> bool {
        matches!(err, MockError::Command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dial_assigns_sequential_ids() {
        let connector = MockConnector::new();
        let a = connector.dial("tcp", "mock:1").await.unwrap();
        let b = connector.dial("tcp", "mock:1").await.unwrap();
        assert_eq!(a.id(), 0);
        assert_eq!(b.id(), 1);
        assert_eq!(connector.dial_count(), 2);
    }

    #[tokio::test]
    async fn test_scripted_dial_failure_and_heal() {
        let connector = MockConnector::new();
        connector.dial("tcp", "mock:1").await.unwrap();

        connector.fail_dials_after(1);
        connector.dial("tcp", "mock:1").await.unwrap();
        assert_eq!(
            connector.dial("tcp", "mock:1").await.unwrap_err(),
            MockError::Dial
        );

        connector.heal();
        connector.dial("tcp", "mock:1").await.unwrap();
        assert_eq!(connector.dial_count(), 3);
    }

    #[tokio::test]
    async fn test_close_counting_and_failure() {
        let connector = MockConnector::new();
        let conn = connector.dial("tcp", "mock:1").await.unwrap();
        connector.close(conn).await.unwrap();
        assert_eq!(connector.close_count(), 1);

        connector.fail_closes(true);
        let conn = connector.dial("tcp", "mock:1").await.unwrap();
        assert_eq!(connector.close(conn).await.unwrap_err(), MockError::Close);
        assert_eq!(connector.close_count(), 2);
    }

    #[test]
    fn test_error_classification() {
        let connector = MockConnector::new();
        assert!(connector.is_command_error(&MockError::Command));
        assert!(!connector.is_command_error(&MockError::Connection));
        assert!(!connector.is_command_error(&MockError::Dial));
    }

    #[test]
    fn test_clones_share_state() {
        let connector = MockConnector::new();
        let clone = connector.clone();
        connector.fail_dials_after(0);
        // The clone observes the scripted failure.
        assert_eq!(
            clone.state.fail_from.load(Ordering::Relaxed),
            connector.state.fail_from.load(Ordering::Relaxed)
        );
    }
}
