use crate::{
    DistributedId, IdGenerator, MAX_DISTRIBUTED_TIMESTAMP, RandSource, RandomSequence, Result,
    SleepProvider, ThreadRandom, ThreadSleeper, TimeSource, WallClock, error::Error,
};
use core::time::Duration;
use parking_lot::Mutex;

/// How many IDs may share one clock millisecond before the generator backs
/// off.
///
/// Once a batch of this size has been minted for a single timestamp, the
/// generator sleeps 1 ms and re-reads the clock. This bounds same-millisecond
/// density (keeping the birthday bound across uncoordinated processes small)
/// and gives the clock a chance to advance.
pub const RATE_LIMIT_PER_TIMESTAMP: u64 = 128;

/// How much generator state survives between mints.
struct GeneratorState {
    previous_timestamp: u64,
    previous_random: RandomSequence,
    minted_this_timestamp: u64,
}

/// A thread-safe generator of distributed, sortable, collision-resistant IDs.
///
/// Each ID is a [`DistributedId`]: 48 bits of Unix-epoch milliseconds over 48
/// bits of randomness. No coordination between processes or machines is
/// required; uniqueness across minters is probabilistic: the birthday
/// bound puts the per-millisecond collision chance across `N` rate-limited
/// processes at `N² · 128² / 2⁴⁹` or less.
///
/// ## Ordering
///
/// - Within one instance, outputs are strictly increasing as long as the
///   clock does not move backwards: same-millisecond bursts reuse the
///   previous random value plus a fresh positive 32-bit increment.
/// - Across a backward clock adjustment, outputs still *differ* (the random
///   field is fresh) but may sort before earlier IDs.
/// - Across instances there is no ordering guarantee.
///
/// ## Blocking
///
/// [`create_id`](Self::create_id) may sleep in 1 ms increments when more than
/// [`RATE_LIMIT_PER_TIMESTAMP`] IDs land on one millisecond, or when the
/// 48-bit random sequence wraps. Callers should treat it as a synchronous
/// call that can block for about a millisecond under contention.
///
/// # Example
///
/// ```
/// use distrid::DistributedIdGenerator;
///
/// let generator = DistributedIdGenerator::default();
/// let a = generator.create_id().unwrap();
/// let b = generator.create_id().unwrap();
/// assert!(a < b);
/// ```
pub struct DistributedIdGenerator<T = WallClock, R = ThreadRandom, S = ThreadSleeper>
where
    T: TimeSource<u64>,
    R: RandSource<u64>,
    S: SleepProvider,
{
    state: Mutex<GeneratorState>,
    time: T,
    rng: R,
    sleeper: S,
}

impl Default for DistributedIdGenerator {
    /// A generator over the system wall clock, the thread-local CSPRNG and
    /// real thread sleeps: the configuration every production host wants.
    fn default() -> Self {
        Self::with_sources(WallClock, ThreadRandom, ThreadSleeper)
    }
}

impl<T, R, S> DistributedIdGenerator<T, R, S>
where
    T: TimeSource<u64>,
    R: RandSource<u64>,
    S: SleepProvider,
{
    /// Creates a generator from explicit clock, RNG and sleep sources.
    ///
    /// Mainly useful for tests and for hosts with their own notion of time.
    pub fn with_sources(time: T, rng: R, sleeper: S) -> Self {
        Self {
            state: Mutex::new(GeneratorState {
                previous_timestamp: 0,
                previous_random: RandomSequence::default(),
                minted_this_timestamp: 0,
            }),
            time,
            rng,
            sleeper,
        }
    }

    /// Mints the next ID.
    ///
    /// # Errors
    /// [`Error::ClockOverflow`] if the clock reports a millisecond count of
    /// `2^45` or more (roughly the year 3084). Nothing is committed on
    /// failure, so a retry observes the same state as before the failed
    /// attempt.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip(self))
    )]
    pub fn create_id(&self) -> Result<DistributedId> {
        let mut state = self.state.lock();

        loop {
            let now = self.time.current_millis();
            if now > MAX_DISTRIBUTED_TIMESTAMP {
                return Err(Error::ClockOverflow { timestamp: now });
            }

            if now > state.previous_timestamp {
                // The clock moved forward: take the new millisecond and a
                // fresh 48-bit random value.
                let random = RandomSequence::from_source(&self.rng);
                state.previous_timestamp = now;
                state.previous_random = random;
                state.minted_this_timestamp = 1;
                return Ok(DistributedId::from_parts(now, random.to_u64()));
            }

            // Same millisecond, or the clock went backwards: pin to the last
            // observed timestamp and increment the random field instead.
            if state.minted_this_timestamp >= RATE_LIMIT_PER_TIMESTAMP {
                // One full batch minted for this millisecond; back off and
                // start the next batch against a re-read clock.
                self.sleeper.sleep_for(Duration::from_millis(1));
                state.minted_this_timestamp = 0;
                continue;
            }

            let delta = self.rng.rand() & u64::from(u32::MAX);
            let random = state.previous_random.add_bounded(delta);
            if random <= state.previous_random {
                // The 48-bit sequence wrapped. Committing would break strict
                // ordering within this millisecond, so wait out the clock.
                self.await_clock_change(state.previous_timestamp);
                continue;
            }

            state.previous_random = random;
            state.minted_this_timestamp += 1;
            return Ok(DistributedId::from_parts(
                state.previous_timestamp,
                random.to_u64(),
            ));
        }
    }

    /// Sleeps in 1 ms increments until the clock *differs* from the last
    /// timestamp this generator committed; advance or retreat both count.
    ///
    /// Rewinds are tolerated: they cannot compromise uniqueness because the
    /// random increment is independent of the clock.
    pub fn await_updated_clock_value(&self) {
        let previous = self.state.lock().previous_timestamp;
        self.await_clock_change(previous);
    }

    fn await_clock_change(&self, previous: u64) {
        while self.time.current_millis() == previous {
            self.sleeper.sleep_for(Duration::from_millis(1));
        }
    }
}

impl<T, R, S> IdGenerator for DistributedIdGenerator<T, R, S>
where
    T: TimeSource<u64> + Send + Sync,
    R: RandSource<u64> + Send + Sync,
    S: SleepProvider + Send + Sync,
{
    fn create_id(&self) -> Result<DistributedId> {
        Self::create_id(self)
    }
}
