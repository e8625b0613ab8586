use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds in one UTC day.
pub const MILLIS_PER_DAY: u64 = 86_400_000;

/// Default Fluid epoch: Wednesday, January 1, 2020 00:00:00 UTC.
pub const DEFAULT_FLUID_EPOCH: u64 = 1_577_836_800_000;

/// The last millisecond a distributed ID can carry: `2^45 - 1` (year ~3084).
///
/// Beyond this the 48-bit timestamp field would push the composed 96-bit value
/// past its 28-digit ceiling.
pub const MAX_DISTRIBUTED_TIMESTAMP: u64 = (1 << 45) - 1;

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests.
///
/// The timestamp type `T` is generic (typically `u64`), and the unit is
/// **milliseconds since the Unix epoch**, UTC. Implementations are expected
/// to be *mostly* monotonic; the generators tolerate modest backward skew.
///
/// # Example
///
/// ```
/// use distrid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<u64> for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> T;
}

/// A [`TimeSource`] backed by the system wall clock.
///
/// Generated IDs embed real Unix-epoch milliseconds, so the wall clock is the
/// correct source even though it can be adjusted externally (NTP, manual
/// changes). Backward adjustments are tolerated by the generators, which pin
/// to the last observed timestamp rather than emitting out-of-order values.
#[derive(Default, Clone, Debug)]
pub struct WallClock;

impl TimeSource<u64> for WallClock {
    fn current_millis(&self) -> u64 {
        // A system clock before 1970 reads as 0; the generators then pin to
        // their previous timestamp until the clock becomes sane again.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_is_past_2020() {
        let now = WallClock.current_millis();
        assert!(now > DEFAULT_FLUID_EPOCH);
        assert!(now < MAX_DISTRIBUTED_TIMESTAMP);
    }

    #[test]
    fn default_fluid_epoch_is_utc_midnight() {
        assert_eq!(DEFAULT_FLUID_EPOCH % MILLIS_PER_DAY, 0);
    }
}
