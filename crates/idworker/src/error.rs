use core::time::Duration;

/// A result type defaulting to [`ConfigurationError`], the only error a
/// generator can be built with.
pub type Result<T, E = ConfigurationError> = core::result::Result<T, E>;

/// Raised when a worker configuration is constructed with an identifier that
/// does not fit its bit field.
///
/// No generator is created when this error is returned. Both variants carry
/// the rejected value as given (negative values included) and the largest
/// value the field accepts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// The datacenter ID is negative or larger than the 5-bit maximum.
    #[error("datacenter_id must be between 0 and {max}, got {value}")]
    DatacenterIdOutOfRange { value: i64, max: u64 },

    /// The worker ID is negative or larger than the 5-bit maximum.
    #[error("worker_id must be between 0 and {max}, got {value}")]
    WorkerIdOutOfRange { value: i64, max: u64 },
}

/// Returned by `next_id_timeout` when the sequence stayed exhausted for
/// longer than the caller allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("sequence exhausted, gave up after waiting {waited:?} for the clock to advance")]
pub struct GenerationTimeout {
    /// How long the call waited before giving up.
    pub waited: Duration,
}
