use core::time::Duration;
use std::time::Instant;

use tracing::warn;

use crate::{
    error::GenerationTimeout,
    generator::{Poll, WorkerConfig},
    id::SnowflakeId,
    time::TimeSource,
};

/// The interface shared by every ID generator.
///
/// Implementors only provide construction, [`IdGenerator::config`] and
/// [`IdGenerator::poll_id`]; the blocking helpers are built on top.
pub trait IdGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a new generator from an already validated configuration.
    fn new(config: WorkerConfig<ID>, time: T) -> Self
    where
        Self: Sized;

    /// The identity encoded into every ID from this generator.
    fn config(&self) -> &WorkerConfig<ID>;

    /// The datacenter ID encoded into every ID from this generator.
    fn datacenter_id(&self) -> u64 {
        self.config().datacenter_id()
    }

    /// The worker ID encoded into every ID from this generator.
    fn worker_id(&self) -> u64 {
        self.config().worker_id()
    }

    /// Attempts to generate the next ID without blocking.
    ///
    /// The returned [`Poll`] contains either:
    /// - the newly generated ID, or
    /// - the number of milliseconds to wait if the sequence for the current
    ///   millisecond is exhausted.
    fn poll_id(&self) -> Poll<ID>;

    /// Generates the next ID, spinning while the sequence is exhausted.
    ///
    /// Never fails and never returns an ID it has returned before. Under
    /// sustained load above 4096 IDs per millisecond callers stall until the
    /// clock ticks.
    fn next_id(&self) -> ID {
        self.next_id_with(|_| core::hint::spin_loop())
    }

    /// Generates the next ID, calling `f` with the suggested wait (in
    /// milliseconds) each time the sequence is exhausted.
    ///
    /// Use this to yield or sleep instead of spinning.
    ///
    /// # Example
    /// ```
    /// use idworker::{IdGenerator, IdWorkerId, LockIdGenerator, SystemClock};
    ///
    /// let generator = LockIdGenerator::<IdWorkerId, _>::with_defaults(SystemClock::default());
    /// let id = generator.next_id_with(|_| std::thread::yield_now());
    /// assert_eq!(id.worker_id(), 0);
    /// ```
    fn next_id_with(&self, mut f: impl FnMut(u64)) -> ID {
        let mut waiting = false;
        loop {
            match self.poll_id() {
                Poll::Ready { id } => break id,
                Poll::Pending { yield_for } => {
                    if !waiting {
                        waiting = true;
                        warn_exhausted(self.config(), yield_for);
                    }
                    f(yield_for);
                }
            }
        }
    }

    /// Generates the next ID, giving up if the sequence stays exhausted for
    /// longer than `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationTimeout`] when no ID could be issued in time. The
    /// generator state is unchanged in that case.
    fn next_id_timeout(&self, timeout: Duration) -> Result<ID, GenerationTimeout> {
        let mut started: Option<Instant> = None;
        loop {
            match self.poll_id() {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { yield_for } => {
                    let start = *started.get_or_insert_with(|| {
                        warn_exhausted(self.config(), yield_for);
                        Instant::now()
                    });
                    let waited = start.elapsed();
                    if waited >= timeout {
                        break Err(GenerationTimeout { waited });
                    }
                    core::hint::spin_loop();
                }
            }
        }
    }
}

#[cold]
fn warn_exhausted<ID: SnowflakeId>(config: &WorkerConfig<ID>, yield_for: u64) {
    warn!(
        datacenter_id = config.datacenter_id(),
        worker_id = config.worker_id(),
        yield_for,
        "sequence exhausted for the current millisecond, waiting for the clock"
    );
}
