//! Pool metric newtypes
//!
//! Type-safe wrappers for the pool's monitoring counters so the different
//! statistics cannot be mixed up at call sites.

use std::fmt;

/// Number of idle connections currently buffered in the pool
///
/// Always <= the pool's configured maximum idle size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AvailableConnections(usize);

impl AvailableConnections {
    #[inline]
    pub const fn new(count: usize) -> Self {
        Self(count)
    }

    /// Get the raw value
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Self(0)
    }
}

impl fmt::Display for AvailableConnections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for AvailableConnections {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Maximum number of idle connections the pool will buffer
///
/// Note this bounds idleness only: concurrent demand beyond this size
/// creates additional connections on the fly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaxPoolSize(usize);

impl MaxPoolSize {
    #[inline]
    pub const fn new(size: usize) -> Self {
        Self(size)
    }

    /// Get the raw value
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for MaxPoolSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for MaxPoolSize {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Total number of connections dialed over the pool's lifetime
///
/// Monotonically increasing; useful for spotting connection churn when the
/// idle buffer is sized too small for the workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CreatedConnections(usize);

impl CreatedConnections {
    #[inline]
    pub const fn new(count: usize) -> Self {
        Self(count)
    }

    /// Get the raw value
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Self(0)
    }
}

impl fmt::Display for CreatedConnections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for CreatedConnections {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Snapshot of pool usage for logging and monitoring
#[derive(Debug, Clone, Copy)]
pub struct PoolStatus {
    pub available: AvailableConnections,
    pub max_size: MaxPoolSize,
    pub created: CreatedConnections,
}

impl fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} idle, {} created",
            self.available, self.max_size, self.created
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_connections() {
        let available = AvailableConnections::new(5);
        assert_eq!(available.get(), 5);
        assert_eq!(format!("{}", available), "5");

        let zero = AvailableConnections::zero();
        assert_eq!(zero.get(), 0);
    }

    #[test]
    fn test_max_pool_size() {
        let max = MaxPoolSize::new(10);
        assert_eq!(max.get(), 10);
        assert_eq!(format!("{}", max), "10");
    }

    #[test]
    fn test_created_connections() {
        let created = CreatedConnections::new(25);
        assert_eq!(created.get(), 25);
        assert_eq!(format!("{}", created), "25");
    }

    #[test]
    fn test_ordering() {
        let small = AvailableConnections::new(1);
        let large = AvailableConnections::new(10);
        assert!(small < large);
    }

    #[test]
    fn test_from_conversions() {
        let available: AvailableConnections = 5usize.into();
        assert_eq!(available.get(), 5);

        let max: MaxPoolSize = 10usize.into();
        assert_eq!(max.get(), 10);

        let created: CreatedConnections = 25usize.into();
        assert_eq!(created.get(), 25);
    }

    #[test]
    fn test_status_display() {
        let status = PoolStatus {
            available: AvailableConnections::new(3),
            max_size: MaxPoolSize::new(8),
            created: CreatedConnections::new(11),
        };
        assert_eq!(format!("{}", status), "3/8 idle, 11 created");
    }
}
