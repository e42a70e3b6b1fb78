use core::cell::Cell;

use tracing::debug;

use crate::{
    error::Result,
    generator::{
        IdGenerator, Poll, WorkerConfig,
        state::{Advance, advance},
    },
    id::SnowflakeId,
    time::TimeSource,
};

/// A non-concurrent ID generator suitable for single-threaded environments.
///
/// This generator is lightweight and fast, but **not thread-safe**.
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ Safely implement any [`SnowflakeId`] layout
///
/// ## Recommended When
/// - You're in a single-threaded environment (no shared access)
/// - You want the fastest generator
///
/// ## See Also
/// - [`LockIdGenerator`]
/// - [`AtomicIdGenerator`]
///
/// [`LockIdGenerator`]: crate::LockIdGenerator
/// [`AtomicIdGenerator`]: crate::AtomicIdGenerator
pub struct BasicIdGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    state: Cell<Option<ID>>,
    config: WorkerConfig<ID>,
    time: T,
}

impl<ID, T> BasicIdGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a new [`BasicIdGenerator`] for a validated configuration.
    ///
    /// No ID has been issued yet: the first call starts a fresh millisecond
    /// with sequence `0`.
    pub fn new(config: WorkerConfig<ID>, time: T) -> Self {
        debug!(
            datacenter_id = config.datacenter_id(),
            worker_id = config.worker_id(),
            "created basic id generator"
        );
        Self {
            state: Cell::new(None),
            config,
            time,
        }
    }

    /// Validates `datacenter_id` and `worker_id` and creates a generator.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if either value is negative or does
    /// not fit its bit field.
    ///
    /// [`ConfigurationError`]: crate::ConfigurationError
    pub fn try_new(datacenter_id: i64, worker_id: i64, time: T) -> Result<Self> {
        Ok(Self::new(WorkerConfig::new(datacenter_id, worker_id)?, time))
    }

    /// Creates a generator for datacenter 0, worker 0.
    pub fn with_defaults(time: T) -> Self {
        Self::new(WorkerConfig::default(), time)
    }

    /// Generates a new ID, spinning while the sequence is exhausted.
    ///
    /// # Example
    /// ```
    /// use idworker::{BasicIdGenerator, IdWorkerId, SystemClock};
    ///
    /// let generator = BasicIdGenerator::<IdWorkerId, _>::try_new(2, 3, SystemClock::default())?;
    /// let id = generator.next_id();
    /// assert_eq!((id.datacenter_id(), id.worker_id()), (2, 3));
    /// # Ok::<(), idworker::ConfigurationError>(())
    /// ```
    pub fn next_id(&self) -> ID {
        <Self as IdGenerator<ID, T>>::next_id(self)
    }

    /// Attempts to generate the next available ID.
    ///
    /// Returns a new, time-ordered, unique ID if generation succeeds. If the
    /// sequence for the current millisecond is exhausted, it returns
    /// [`Poll::Pending`] and leaves the state untouched.
    pub fn poll_id(&self) -> Poll<ID> {
        let now = self.time.current_millis();
        match advance(self.state.get(), now, &self.config) {
            Advance::Issue(id) => {
                self.state.set(Some(id));
                Poll::Ready { id }
            }
            Advance::Exhausted { yield_for } => Poll::Pending { yield_for },
        }
    }
}

impl<ID, T> IdGenerator<ID, T> for BasicIdGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    fn new(config: WorkerConfig<ID>, time: T) -> Self {
        Self::new(config, time)
    }

    fn config(&self) -> &WorkerConfig<ID> {
        &self.config
    }

    fn poll_id(&self) -> Poll<ID> {
        self.poll_id()
    }
}
