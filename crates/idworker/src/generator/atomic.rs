use portable_atomic::{AtomicU64, Ordering};
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

/// Raw state before the first ID is issued. The reserved top bit of every
/// valid layout is clear, so no real ID has this value.
const EMPTY: u64 = u64::MAX;

/// A lock-free ID generator suitable for multi-threaded environments.
///
/// This generator stores the last issued ID in an [`AtomicU64`] and advances
/// it with a compare-and-swap loop. A thread that loses the race re-reads the
/// clock and the state and tries again, so every issued ID corresponds to
/// exactly one successful swap.
///
/// ## Features
/// - ✅ Thread-safe
/// - ❌ Safely implement any [`SnowflakeId`] layout
///
/// ## Caveats
/// The layout must never produce the raw value `u64::MAX`, which marks the
/// empty state. Layouts that keep a reserved sign bit (like [`IdWorkerId`])
/// satisfy this.
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access is sacrificed for higher throughput
///
/// ## See Also
/// - [`BasicIdGenerator`]
/// - [`LockIdGenerator`]
///
/// [`IdWorkerId`]: crate::IdWorkerId
/// [`BasicIdGenerator`]: crate::BasicIdGenerator
/// [`LockIdGenerator`]: crate::LockIdGenerator
pub struct AtomicIdGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    config: WorkerConfig<ID>,
    time: T,
}

impl<ID, T> AtomicIdGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a new [`AtomicIdGenerator`] for a validated configuration.
    ///
    /// # Example
    /// ```
    /// use idworker::{AtomicIdGenerator, IdWorkerId, SystemClock, WorkerConfig};
    ///
    /// let generator: AtomicIdGenerator<IdWorkerId, _> =
    ///     AtomicIdGenerator::new(WorkerConfig::new(0, 7)?, SystemClock::default());
    ///
    /// let id = generator.next_id();
    /// assert_eq!(id.worker_id(), 7);
    /// # Ok::<(), idworker::ConfigurationError>(())
    /// ```
    pub fn new(config: WorkerConfig<ID>, time: T) -> Self {
        debug!(
            datacenter_id = config.datacenter_id(),
            worker_id = config.worker_id(),
            "created atomic id generator"
        );
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(EMPTY)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(EMPTY),
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
    pub fn next_id(&self) -> ID {
        <Self as IdGenerator<ID, T>>::next_id(self)
    }

    /// Attempts to generate the next available ID.
    ///
    /// Returns a new, time-ordered, unique ID if generation succeeds. If the
    /// sequence for the current millisecond is exhausted, it returns
    /// [`Poll::Pending`].
    pub fn poll_id(&self) -> Poll<ID> {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let last = (current != EMPTY).then(|| ID::from_raw(current));
            let now = self.time.current_millis();

            let id = match advance(last, now, &self.config) {
                Advance::Issue(id) => id,
                Advance::Exhausted { yield_for } => break Poll::Pending { yield_for },
            };
            debug_assert_ne!(id.to_raw(), EMPTY, "layout produced the empty marker");

            match self.state.compare_exchange(
                current,
                id.to_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break Poll::Ready { id },
                Err(actual) => {
                    current = actual;
                    core::hint::spin_loop();
                }
            }
        }
    }
}

impl<ID, T> IdGenerator<ID, T> for AtomicIdGenerator<ID, T>
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
