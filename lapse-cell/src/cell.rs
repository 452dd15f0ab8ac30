//! Single-value cell with lazy TTL expiry.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use lapse_core::clock::{Clock, SystemClock};
use lapse_core::config::CellConfig;
use lapse_core::constants::MAX_TTL;
use lapse_core::error::{BoxError, LapseError, ProducerError, Result};

use crate::stats::CellStats;

/// Stored value with its deadline.
///
/// Keeping both in one struct means a value can never exist without a
/// deadline, or a deadline without a value.
struct Entry<T> {
    value: T,
    deadline: Instant,
}

impl<T> Entry<T> {
    fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// Lazy value source configured on a cell.
trait Produce<T> {
    fn produce(&mut self) -> std::result::Result<T, ProducerError>;
}

struct Infallible<F>(F);

impl<T, F> Produce<T> for Infallible<F>
where
    F: FnMut() -> T,
{
    fn produce(&mut self) -> std::result::Result<T, ProducerError> {
        Ok((self.0)())
    }
}

struct Fallible<F>(F);

impl<T, E, F> Produce<T> for Fallible<F>
where
    F: FnMut() -> std::result::Result<T, E>,
    E: Into<BoxError>,
{
    fn produce(&mut self) -> std::result::Result<T, ProducerError> {
        (self.0)().map_err(Into::into)
    }
}

type Producer<T> = Box<dyn Produce<T> + Send>;

/// A cell holding at most one value that expires `ttl` after it was set.
///
/// Expiry is lazy: nothing runs in the background. Every [`has`](Self::has),
/// [`get`](Self::get) and [`take`](Self::take) compares the clock against the
/// stored deadline and clears the value first if the deadline has passed.
/// Reads never move the deadline; only storing a value does.
///
/// The cell is meant for a single owner. Wrap it in
/// [`SharedExpiringCell`](crate::SharedExpiringCell) to share it between threads.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use lapse_cell::ExpiringCell;
///
/// let mut cell = ExpiringCell::with_producer(Duration::from_secs(5), || "foo");
/// assert!(!cell.has());
/// assert_eq!(cell.get().unwrap(), Some(&"foo"));
/// assert!(cell.has());
/// ```
pub struct ExpiringCell<T, C = SystemClock> {
    entry: Option<Entry<T>>,
    ttl: Duration,
    clock: C,
    producer: Option<Producer<T>>,
    stats: CellStats,
}

impl<T> ExpiringCell<T, SystemClock> {
    /// Creates an empty cell using the system clock.
    ///
    /// A zero `ttl` is legal: a stored value is already expired on the next
    /// read. TTLs above [`MAX_TTL`] are clamped to it.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }

    /// Creates an empty cell that fills itself from `producer` on `get`.
    pub fn with_producer<F>(ttl: Duration, producer: F) -> Self
    where
        F: FnMut() -> T + Send + 'static,
    {
        Self::new(ttl).producer(producer)
    }

    /// Creates an empty cell that fills itself from a fallible `producer`.
    ///
    /// A producer error is returned from `get` and leaves the cell empty.
    pub fn with_try_producer<F, E>(ttl: Duration, producer: F) -> Self
    where
        F: FnMut() -> std::result::Result<T, E> + Send + 'static,
        E: Into<BoxError>,
    {
        Self::new(ttl).try_producer(producer)
    }

    /// Creates an empty cell from a validated config.
    pub fn from_config(config: &CellConfig) -> Result<Self> {
        Ok(Self::new(config.ttl()?))
    }
}

impl<T, C: Clock> ExpiringCell<T, C> {
    /// Creates an empty cell that reads time from `clock`.
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            entry: None,
            ttl: ttl.min(MAX_TTL),
            clock,
            producer: None,
            stats: CellStats::default(),
        }
    }

    /// Sets the lazy producer, replacing any previous one.
    ///
    /// The producer must not access the cell it populates.
    pub fn producer<F>(mut self, producer: F) -> Self
    where
        F: FnMut() -> T + Send + 'static,
    {
        self.producer = Some(Box::new(Infallible(producer)));
        self
    }

    /// Sets a fallible lazy producer, replacing any previous one.
    pub fn try_producer<F, E>(mut self, producer: F) -> Self
    where
        F: FnMut() -> std::result::Result<T, E> + Send + 'static,
        E: Into<BoxError>,
    {
        self.producer = Some(Box::new(Fallible(producer)));
        self
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns true if a lazy producer is configured.
    pub fn has_producer(&self) -> bool {
        self.producer.is_some()
    }

    /// Returns a snapshot of the access counters.
    pub fn stats(&self) -> CellStats {
        self.stats.clone()
    }

    /// Stores `value` with a fresh deadline of `now + ttl`.
    ///
    /// Any existing value and deadline are overwritten.
    pub fn set(&mut self, value: T) {
        self.store(value);
    }

    /// Stores `value` and returns the previous live value, if any.
    pub fn replace(&mut self, value: T) -> Option<T> {
        let previous = self.take();
        self.store(value);
        previous
    }

    /// Returns true if a live value is present.
    ///
    /// An expired value is cleared as part of the check.
    pub fn has(&mut self) -> bool {
        self.expire_stale();
        self.entry.is_some()
    }

    /// Returns the live value, producing one first if the cell is empty and
    /// a producer is configured.
    ///
    /// Returns `Ok(None)` when the cell is empty and has no producer. A
    /// producer failure is returned as [`LapseError::ProducerFailed`] and
    /// leaves the cell empty, so the next call runs the producer again.
    pub fn get(&mut self) -> Result<Option<&T>> {
        self.expire_stale();

        if self.entry.is_some() {
            self.stats.hits += 1;
            return Ok(self.entry.as_ref().map(|entry| &entry.value));
        }
        self.stats.misses += 1;

        let Some(producer) = self.producer.as_mut() else {
            return Ok(None);
        };
        match producer.produce() {
            Ok(value) => {
                self.stats.productions += 1;
                debug!(ttl_ms = self.ttl.as_millis() as u64, "produced value");
                Ok(Some(self.store(value)))
            }
            Err(err) => {
                self.stats.production_failures += 1;
                debug!("producer failed, cell left empty");
                Err(LapseError::ProducerFailed(err))
            }
        }
    }

    /// Returns the live value, storing the result of `f` first if there is none.
    ///
    /// `f` is used instead of the configured producer.
    pub fn get_or_insert_with<F>(&mut self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.expire_stale();
        let entry = match self.entry.take() {
            Some(entry) => {
                self.stats.hits += 1;
                entry
            }
            None => {
                self.stats.misses += 1;
                let value = f();
                self.stats.productions += 1;
                self.fresh_entry(value)
            }
        };
        &self.entry.insert(entry).value
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with), for a fallible `f`.
    ///
    /// The error of `f` is returned as-is and leaves the cell empty.
    pub fn get_or_try_insert_with<F, E>(&mut self, f: F) -> std::result::Result<&T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
    {
        self.expire_stale();
        let entry = match self.entry.take() {
            Some(entry) => {
                self.stats.hits += 1;
                entry
            }
            None => {
                self.stats.misses += 1;
                match f() {
                    Ok(value) => {
                        self.stats.productions += 1;
                        self.fresh_entry(value)
                    }
                    Err(err) => {
                        self.stats.production_failures += 1;
                        return Err(err);
                    }
                }
            }
        };
        Ok(&self.entry.insert(entry).value)
    }

    /// Removes and returns the live value.
    pub fn take(&mut self) -> Option<T> {
        self.expire_stale();
        self.entry.take().map(|entry| entry.value)
    }

    /// Removes the value regardless of its deadline.
    ///
    /// Clearing an empty cell is a no-op.
    pub fn clear(&mut self) {
        if self.entry.take().is_some() {
            self.stats.clears += 1;
            trace!("value cleared");
        }
    }

    /// Returns the stored deadline without checking or applying expiry.
    pub fn peek_deadline(&self) -> Option<Instant> {
        self.entry.as_ref().map(|entry| entry.deadline)
    }

    /// Returns the time left before the stored value expires.
    ///
    /// Like [`peek_deadline`](Self::peek_deadline) this does not reclaim:
    /// an expired but untouched value reports `Some(Duration::ZERO)`.
    pub fn remaining(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.entry
            .as_ref()
            .map(|entry| entry.deadline.saturating_duration_since(now))
    }

    fn fresh_entry(&mut self, value: T) -> Entry<T> {
        self.stats.sets += 1;
        Entry {
            value,
            deadline: self.clock.now() + self.ttl,
        }
    }

    fn store(&mut self, value: T) -> &T {
        let entry = self.fresh_entry(value);
        &self.entry.insert(entry).value
    }

    fn expire_stale(&mut self) {
        let now = self.clock.now();
        if self
            .entry
            .as_ref()
            .is_some_and(|entry| entry.is_expired_at(now))
        {
            self.entry = None;
            self.stats.expirations += 1;
            trace!(ttl_ms = self.ttl.as_millis() as u64, "expired value reclaimed");
        }
    }
}

impl<T: fmt::Debug, C: Clock> fmt::Debug for ExpiringCell<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringCell")
            .field("value", &self.entry.as_ref().map(|entry| &entry.value))
            .field("deadline", &self.peek_deadline())
            .field("ttl", &self.ttl)
            .field("clock", &self.clock)
            .field("has_producer", &self.has_producer())
            .finish()
    }
}
