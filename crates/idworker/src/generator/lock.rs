use std::sync::Arc;

use parking_lot::Mutex;
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

#[cfg(feature = "cache-padded")]
type SharedState<ID> = Arc<crossbeam_utils::CachePadded<Mutex<Option<ID>>>>;
#[cfg(not(feature = "cache-padded"))]
type SharedState<ID> = Arc<Mutex<Option<ID>>>;

/// A lock-based ID generator suitable for multi-threaded environments.
///
/// This generator wraps its state in an [`Arc<Mutex<_>>`], allowing safe
/// shared use across threads. Clones share the same state, so handing a clone
/// to each thread is equivalent to sharing one generator by reference.
///
/// The clock is read while the lock is held: reading the time, comparing it
/// to the last issued ID and storing the new ID happen as one step.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Safely implement any [`SnowflakeId`] layout
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access across threads is important
///
/// ## See Also
/// - [`BasicIdGenerator`]
/// - [`AtomicIdGenerator`]
///
/// [`BasicIdGenerator`]: crate::BasicIdGenerator
/// [`AtomicIdGenerator`]: crate::AtomicIdGenerator
pub struct LockIdGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    state: SharedState<ID>,
    config: WorkerConfig<ID>,
    time: T,
}

impl<ID, T> LockIdGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a new [`LockIdGenerator`] for a validated configuration.
    ///
    /// # Parameters
    ///
    /// - `config`: The datacenter and worker IDs encoded into every generated
    ///   ID.
    /// - `time`: A [`TimeSource`] implementation (e.g., [`SystemClock`]) that
    ///   determines how timestamps are generated.
    ///
    /// # Example
    /// ```
    /// use idworker::{IdWorkerId, LockIdGenerator, SystemClock, WorkerConfig};
    ///
    /// let config = WorkerConfig::new(1, 1)?;
    /// let generator: LockIdGenerator<IdWorkerId, _> =
    ///     LockIdGenerator::new(config, SystemClock::default());
    ///
    /// let a = generator.next_id();
    /// let b = generator.next_id();
    /// assert!(a < b);
    /// # Ok::<(), idworker::ConfigurationError>(())
    /// ```
    ///
    /// [`SystemClock`]: crate::SystemClock
    pub fn new(config: WorkerConfig<ID>, time: T) -> Self {
        debug!(
            datacenter_id = config.datacenter_id(),
            worker_id = config.worker_id(),
            "created lock id generator"
        );
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(None))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(None)),
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
    ///
    /// # Example
    /// ```
    /// use idworker::{IdWorkerId, LockIdGenerator, Poll, SystemClock};
    ///
    /// let generator = LockIdGenerator::<IdWorkerId, _>::with_defaults(SystemClock::default());
    ///
    /// let id = loop {
    ///     match generator.poll_id() {
    ///         Poll::Ready { id } => break id,
    ///         Poll::Pending { yield_for } => {
    ///             std::thread::sleep(core::time::Duration::from_millis(yield_for));
    ///         }
    ///     }
    /// };
    /// assert_eq!(id.datacenter_id(), 0);
    /// ```
    pub fn poll_id(&self) -> Poll<ID> {
        let mut last = self.state.lock();
        let now = self.time.current_millis();
        match advance(*last, now, &self.config) {
            Advance::Issue(id) => {
                *last = Some(id);
                Poll::Ready { id }
            }
            Advance::Exhausted { yield_for } => Poll::Pending { yield_for },
        }
    }
}

impl<ID, T> Clone for LockIdGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            config: self.config,
            time: self.time.clone(),
        }
    }
}

impl<ID, T> IdGenerator<ID, T> for LockIdGenerator<ID, T>
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
