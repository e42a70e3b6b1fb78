use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default epoch: Saturday, November 26, 2016 13:21:05.631 UTC
pub const IDWORKER_EPOCH: Duration = Duration::from_millis(1_480_166_465_631);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the system clock or a mocked time
/// source in tests. The unit is **milliseconds** relative to the source's
/// configured epoch.
///
/// # Example
///
/// ```
/// use idworker::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

/// A wall-clock time source backed by [`SystemTime`], offset from a
/// user-defined epoch.
///
/// Every read goes to the operating system, so NTP slews, manual adjustments
/// or VM migrations can make it go backwards. Generators absorb such
/// regressions themselves.
///
/// A system time earlier than the epoch reads as `0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch: Duration,
}

impl Default for SystemClock {
    /// Constructs a clock aligned to [`IDWORKER_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(IDWORKER_EPOCH)
    }
}

impl SystemClock {
    /// Constructs a clock using `epoch` as its origin (t = 0), given as a
    /// [`Duration`] since 1970-01-01 UTC.
    ///
    /// An epoch later than the current time reads as a constant `0` until
    /// the wall clock reaches it. A generator on such a clock issues one
    /// millisecond's worth of IDs and then waits, so callers taking an epoch
    /// from user input should reject future values.
    ///
    /// # Example
    ///
    /// ```
    /// use idworker::{SystemClock, TimeSource, TWITTER_EPOCH};
    ///
    /// let clock = SystemClock::with_epoch(TWITTER_EPOCH);
    /// assert!(clock.current_millis() > 0);
    /// ```
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }

    /// The origin of this clock.
    pub const fn epoch(&self) -> Duration {
        self.epoch
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|now| now.checked_sub(self.epoch))
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_offset_by_epoch() {
        let unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let ms = SystemClock::default().current_millis();
        let expected = unix - IDWORKER_EPOCH.as_millis() as u64;
        // Allow for the time between the two reads
        assert!(ms >= expected && ms - expected < 1_000);
    }

    #[test]
    fn future_epoch_reads_as_zero() {
        let far_future = Duration::from_millis(u64::MAX / 2);
        assert_eq!(SystemClock::with_epoch(far_future).current_millis(), 0);
    }

    #[test]
    fn unix_epoch_matches_system_time() {
        let clock = SystemClock::with_epoch(Duration::ZERO);
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let ms = clock.current_millis();
        assert!(ms >= before);
    }
}
