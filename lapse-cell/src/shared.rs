//! Thread-safe wrapper around [`ExpiringCell`].

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use lapse_core::clock::{Clock, SystemClock};
use lapse_core::config::CellConfig;
use lapse_core::error::{BoxError, Result};

use crate::cell::ExpiringCell;
use crate::stats::CellStats;

/// An [`ExpiringCell`] behind a mutex.
///
/// Every read may clear an expired value, so even `has` needs exclusive
/// access; a plain `Mutex` is used rather than an `RwLock`. Operations never
/// block on anything but the lock itself.
///
/// # Producers
///
/// A configured producer runs while the lock is held, so concurrent readers
/// of an empty cell wait for one production instead of racing. The producer
/// must not touch the same cell: the lock is not reentrant.
pub struct SharedExpiringCell<T, C = SystemClock> {
    inner: Mutex<ExpiringCell<T, C>>,
}

impl<T> SharedExpiringCell<T, SystemClock> {
    /// Creates an empty shared cell using the system clock.
    pub fn new(ttl: Duration) -> Self {
        ExpiringCell::new(ttl).into()
    }

    /// Creates an empty shared cell with a lazy producer.
    pub fn with_producer<F>(ttl: Duration, producer: F) -> Self
    where
        F: FnMut() -> T + Send + 'static,
    {
        ExpiringCell::with_producer(ttl, producer).into()
    }

    /// Creates an empty shared cell with a fallible lazy producer.
    pub fn with_try_producer<F, E>(ttl: Duration, producer: F) -> Self
    where
        F: FnMut() -> std::result::Result<T, E> + Send + 'static,
        E: Into<BoxError>,
    {
        ExpiringCell::with_try_producer(ttl, producer).into()
    }

    /// Creates an empty shared cell from a validated config.
    pub fn from_config(config: &CellConfig) -> Result<Self> {
        ExpiringCell::from_config(config).map(Self::from)
    }
}

impl<T, C: Clock> SharedExpiringCell<T, C> {
    /// Creates an empty shared cell that reads time from `clock`.
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        ExpiringCell::with_clock(ttl, clock).into()
    }

    /// Returns a clone of the live value, producing one if needed.
    pub fn get(&self) -> Result<Option<T>>
    where
        T: Clone,
    {
        Ok(self.inner.lock().get()?.cloned())
    }

    /// Runs `f` on the live value without cloning it.
    ///
    /// Production happens first, as in [`get`](Self::get). The lock is held
    /// while `f` runs.
    pub fn with_value<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(Option<&T>) -> R,
    {
        let mut cell = self.inner.lock();
        Ok(f(cell.get()?))
    }

    /// Stores `value` with a fresh deadline.
    pub fn set(&self, value: T) {
        self.inner.lock().set(value);
    }

    /// Stores `value` and returns the previous live value, if any.
    pub fn replace(&self, value: T) -> Option<T> {
        self.inner.lock().replace(value)
    }

    /// Returns true if a live value is present, clearing an expired one.
    pub fn has(&self) -> bool {
        self.inner.lock().has()
    }

    /// Removes the value regardless of its deadline.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Removes and returns the live value.
    pub fn take(&self) -> Option<T> {
        self.inner.lock().take()
    }

    /// Returns the stored deadline without applying expiry.
    pub fn peek_deadline(&self) -> Option<Instant> {
        self.inner.lock().peek_deadline()
    }

    /// Returns the time left before the stored value expires.
    pub fn remaining(&self) -> Option<Duration> {
        self.inner.lock().remaining()
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.inner.lock().ttl()
    }

    /// Returns a snapshot of the access counters.
    pub fn stats(&self) -> CellStats {
        self.inner.lock().stats()
    }

    /// Unwraps the inner cell.
    pub fn into_inner(self) -> ExpiringCell<T, C> {
        self.inner.into_inner()
    }
}

impl<T, C> From<ExpiringCell<T, C>> for SharedExpiringCell<T, C> {
    fn from(cell: ExpiringCell<T, C>) -> Self {
        Self {
            inner: Mutex::new(cell),
        }
    }
}

impl<T: fmt::Debug, C: Clock> fmt::Debug for SharedExpiringCell<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(cell) => f
                .debug_struct("SharedExpiringCell")
                .field("cell", &*cell)
                .finish(),
            None => f
                .debug_struct("SharedExpiringCell")
                .field("cell", &"<locked>")
                .finish(),
        }
    }
}
