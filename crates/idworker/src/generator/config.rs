use core::marker::PhantomData;

use crate::{
    error::{ConfigurationError, Result},
    id::{IdWorkerId, SnowflakeId},
};

/// The static identity of a generator: which datacenter and which worker
/// within it.
///
/// Values are validated once, here, against the bit widths of the `ID`
/// layout. A `WorkerConfig` that exists is always in range, so generators
/// built from one cannot fail.
///
/// Distinct generators must be given distinct `(datacenter_id, worker_id)`
/// pairs for their IDs not to collide. Assigning them is up to the caller.
///
/// # Example
///
/// ```
/// use idworker::{ConfigurationError, WorkerConfig};
///
/// let config: WorkerConfig = WorkerConfig::new(2, 3)?;
/// assert_eq!(config.datacenter_id(), 2);
/// assert_eq!(config.worker_id(), 3);
///
/// assert!(matches!(
///     WorkerConfig::<idworker::IdWorkerId>::new(32, 0),
///     Err(ConfigurationError::DatacenterIdOutOfRange { value: 32, max: 31 })
/// ));
/// # Ok::<(), ConfigurationError>(())
/// ```
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct WorkerConfig<ID = IdWorkerId>
where
    ID: SnowflakeId,
{
    datacenter_id: u64,
    worker_id: u64,
    _id: PhantomData<ID>,
}

impl<ID> WorkerConfig<ID>
where
    ID: SnowflakeId,
{
    /// Validates and stores the datacenter and worker IDs.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::DatacenterIdOutOfRange`] if `datacenter_id` is
    ///   negative or above [`SnowflakeId::max_datacenter_id`]
    /// - [`ConfigurationError::WorkerIdOutOfRange`] if `worker_id` is negative
    ///   or above [`SnowflakeId::max_worker_id`]
    ///
    /// The datacenter ID is checked first.
    pub fn new(datacenter_id: i64, worker_id: i64) -> Result<Self> {
        let datacenter_id = u64::try_from(datacenter_id)
            .ok()
            .filter(|&v| v <= ID::max_datacenter_id())
            .ok_or(ConfigurationError::DatacenterIdOutOfRange {
                value: datacenter_id,
                max: ID::max_datacenter_id(),
            })?;
        let worker_id = u64::try_from(worker_id)
            .ok()
            .filter(|&v| v <= ID::max_worker_id())
            .ok_or(ConfigurationError::WorkerIdOutOfRange {
                value: worker_id,
                max: ID::max_worker_id(),
            })?;

        Ok(Self {
            datacenter_id,
            worker_id,
            _id: PhantomData,
        })
    }

    /// The datacenter ID encoded into every generated ID.
    pub const fn datacenter_id(&self) -> u64 {
        self.datacenter_id
    }

    /// The worker ID encoded into every generated ID.
    pub const fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// The first ID of a fresh millisecond for this worker.
    pub(crate) fn first_id_at(&self, timestamp: u64) -> ID {
        ID::from_components(timestamp, self.datacenter_id, self.worker_id, 0)
    }
}

// Manual impls: deriving would put `Clone`/`Copy` bounds on `ID`.
impl<ID: SnowflakeId> Clone for WorkerConfig<ID> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<ID: SnowflakeId> Copy for WorkerConfig<ID> {}

impl<ID: SnowflakeId> Default for WorkerConfig<ID> {
    /// Datacenter 0, worker 0: the identity of an unconfigured generator.
    fn default() -> Self {
        Self {
            datacenter_id: 0,
            worker_id: 0,
            _id: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Config = WorkerConfig<IdWorkerId>;

    #[test]
    fn accepts_boundary_values() {
        let low = Config::new(0, 0).unwrap();
        assert_eq!((low.datacenter_id(), low.worker_id()), (0, 0));

        let high = Config::new(31, 31).unwrap();
        assert_eq!((high.datacenter_id(), high.worker_id()), (31, 31));
    }

    #[test]
    fn rejects_negative_datacenter_id() {
        assert_eq!(
            Config::new(-1, 0),
            Err(ConfigurationError::DatacenterIdOutOfRange { value: -1, max: 31 })
        );
    }

    #[test]
    fn rejects_datacenter_id_past_field_width() {
        assert_eq!(
            Config::new(32, 0),
            Err(ConfigurationError::DatacenterIdOutOfRange { value: 32, max: 31 })
        );
    }

    #[test]
    fn rejects_worker_id_out_of_range() {
        assert_eq!(
            Config::new(0, -1),
            Err(ConfigurationError::WorkerIdOutOfRange { value: -1, max: 31 })
        );
        assert_eq!(
            Config::new(0, 32),
            Err(ConfigurationError::WorkerIdOutOfRange { value: 32, max: 31 })
        );
        assert_eq!(
            Config::new(0, i64::MAX),
            Err(ConfigurationError::WorkerIdOutOfRange {
                value: i64::MAX,
                max: 31
            })
        );
    }

    #[test]
    fn datacenter_checked_before_worker() {
        assert!(matches!(
            Config::new(-5, 99),
            Err(ConfigurationError::DatacenterIdOutOfRange { value: -5, .. })
        ));
    }

    #[test]
    fn default_is_zero_zero() {
        let config = Config::default();
        assert_eq!((config.datacenter_id(), config.worker_id()), (0, 0));
    }

    #[test]
    fn error_message_names_the_field() {
        let err = Config::new(0, 40).unwrap_err();
        assert_eq!(err.to_string(), "worker_id must be between 0 and 31, got 40");
    }

    #[test]
    fn first_id_carries_identity() {
        let config = Config::new(4, 9).unwrap();
        let id = config.first_id_at(1_000);
        assert_eq!(id.timestamp(), 1_000);
        assert_eq!(id.datacenter_id(), 4);
        assert_eq!(id.worker_id(), 9);
        assert_eq!(id.sequence(), 0);
    }
}
