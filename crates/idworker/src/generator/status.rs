use crate::id::SnowflakeId;

/// Represents the result of a single, non-blocking attempt to generate an ID.
///
/// - [`Poll::Ready`] indicates a new ID was successfully generated.
/// - [`Poll::Pending`] means the sequence for the current millisecond is
///   exhausted and no ID can be produced until the clock moves past it.
///
/// This allows non-blocking generation loops and custom backoff strategies.
///
/// # Example
///
/// ```
/// use idworker::{BasicIdGenerator, IdWorkerId, Poll, SnowflakeId, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1
///     }
/// }
///
/// let generator = BasicIdGenerator::<IdWorkerId, _>::with_defaults(FixedTime);
/// match generator.poll_id() {
///     Poll::Ready { id } => println!("ID: {}", id.timestamp()),
///     Poll::Pending { yield_for } => println!("Back off for: {yield_for}ms"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll<ID: SnowflakeId> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: ID,
    },
    /// No ID could be generated because the sequence has been exhausted for
    /// the current millisecond.
    Pending {
        /// Milliseconds to wait before the clock is expected to have moved
        /// past the exhausted millisecond.
        yield_for: u64,
    },
}
