use crate::{
    DEFAULT_FLUID_EPOCH, MILLIS_PER_DAY, Result, SleepProvider, ThreadSleeper, TimeSource,
    WallClock, error::Error,
};
use core::time::Duration;
use parking_lot::Mutex;

/// Longest a fluid mint will cumulatively sleep waiting for the clock to
/// advance past an exhausted counter.
const MAX_STALL_MS: u64 = 1_000;

/// The bit layout of a fluid ID: `[timestamp | instance | counter]`, packed
/// MSB to LSB into a `u64`.
///
/// The three field widths always sum to 64. The generator additionally keeps
/// bit 63 clear (the top bit of the timestamp field never sets), so every
/// fluid ID is representable as a non-negative `i64` for stores without
/// unsigned 64-bit columns.
///
/// The default distribution is 43/11/10: millisecond timestamps for ~139
/// years past the epoch, 2048 application instances, and 1024 IDs per
/// millisecond per instance.
///
/// # Example
///
/// ```
/// use distrid::BitDistribution;
///
/// let bits = BitDistribution::new(43, 11, 10).unwrap();
/// assert_eq!(bits.max_instance_id(), 2047);
/// assert_eq!(bits.max_counter(), 1023);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitDistribution {
    timestamp_bits: u8,
    instance_bits: u8,
    counter_bits: u8,
}

impl Default for BitDistribution {
    fn default() -> Self {
        Self {
            timestamp_bits: 43,
            instance_bits: 11,
            counter_bits: 10,
        }
    }
}

impl BitDistribution {
    /// Creates a distribution after validating the field widths.
    ///
    /// # Errors
    /// [`Error::Configuration`] unless all of the following hold:
    /// - the widths sum to 64,
    /// - `timestamp_bits <= 63`,
    /// - `instance_bits <= 16`,
    /// - `counter_bits >= 1`.
    pub fn new(timestamp_bits: u8, instance_bits: u8, counter_bits: u8) -> Result<Self> {
        if u32::from(timestamp_bits) + u32::from(instance_bits) + u32::from(counter_bits) != 64 {
            return Err(Error::Configuration {
                reason: "bit distribution must sum to 64",
            });
        }
        if timestamp_bits == 0 || timestamp_bits > 63 {
            return Err(Error::Configuration {
                reason: "timestamp field must span 1 to 63 bits",
            });
        }
        if instance_bits > 16 {
            return Err(Error::Configuration {
                reason: "instance field is limited to 16 bits",
            });
        }
        if counter_bits == 0 {
            return Err(Error::Configuration {
                reason: "counter field needs at least 1 bit",
            });
        }
        Ok(Self {
            timestamp_bits,
            instance_bits,
            counter_bits,
        })
    }

    /// Width of the timestamp field in bits.
    pub const fn timestamp_bits(&self) -> u8 {
        self.timestamp_bits
    }

    /// Width of the application-instance field in bits.
    pub const fn instance_bits(&self) -> u8 {
        self.instance_bits
    }

    /// Width of the counter field in bits.
    pub const fn counter_bits(&self) -> u8 {
        self.counter_bits
    }

    /// The largest value the timestamp field can hold.
    pub const fn max_timestamp(&self) -> u64 {
        field_max(self.timestamp_bits)
    }

    /// The largest timestamp that keeps bit 63 of the packed ID clear.
    ///
    /// The timestamp occupies the top of the ID, so bit 63 is the top bit of
    /// the timestamp field; the generator refuses timestamps beyond this.
    pub const fn max_signed_timestamp(&self) -> u64 {
        field_max(self.timestamp_bits - 1)
    }

    /// The largest admissible application instance ID.
    pub const fn max_instance_id(&self) -> u16 {
        field_max(self.instance_bits) as u16
    }

    /// The largest value the counter field can hold.
    pub const fn max_counter(&self) -> u64 {
        field_max(self.counter_bits)
    }

    /// Packs the three components. Callers uphold the field maxima.
    pub const fn compose(&self, timestamp: u64, instance_id: u16, counter: u64) -> u64 {
        debug_assert!(timestamp <= self.max_signed_timestamp());
        debug_assert!(instance_id <= self.max_instance_id());
        debug_assert!(counter <= self.max_counter());
        (timestamp << (self.instance_bits + self.counter_bits))
            | ((instance_id as u64) << self.counter_bits)
            | counter
    }

    /// Extracts the timestamp component of a packed fluid ID.
    pub const fn timestamp_of(&self, id: u64) -> u64 {
        id >> (self.instance_bits + self.counter_bits)
    }

    /// Extracts the application-instance component of a packed fluid ID.
    pub const fn instance_id_of(&self, id: u64) -> u16 {
        ((id >> self.counter_bits) & field_max(self.instance_bits)) as u16
    }

    /// Extracts the counter component of a packed fluid ID.
    pub const fn counter_of(&self, id: u64) -> u64 {
        id & field_max(self.counter_bits)
    }
}

const fn field_max(bits: u8) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1_u64 << bits) - 1
    }
}

/// A source for this process's application instance ID.
///
/// How instances are allocated (database sequence, orchestration metadata,
/// static config) is the host's concern; the generator only consumes the
/// resulting `u16` once, at construction.
pub trait InstanceIdSource {
    /// Returns the application instance ID for this process.
    fn application_instance_id(&self) -> u16;
}

/// An [`InstanceIdSource`] that returns a fixed value.
#[derive(Copy, Clone, Debug)]
pub struct FixedInstanceId(pub u16);

impl InstanceIdSource for FixedInstanceId {
    fn application_instance_id(&self) -> u16 {
        self.0
    }
}

/// Construction options for [`FluidIdGenerator`].
#[derive(Copy, Clone, Debug)]
pub struct FluidOptions {
    /// Origin of the timestamp field, in UTC milliseconds since the Unix
    /// epoch. Must fall on a UTC midnight and lie in the past.
    pub epoch: u64,
    /// The field layout.
    pub bit_distribution: BitDistribution,
    /// Permits instance ID 0, which production configurations reserve so
    /// that an unconfigured host fails loudly instead of colliding.
    pub allow_zero_instance_id: bool,
}

impl Default for FluidOptions {
    fn default() -> Self {
        Self {
            epoch: DEFAULT_FLUID_EPOCH,
            bit_distribution: BitDistribution::default(),
            allow_zero_instance_id: false,
        }
    }
}

/// Generator state shared between mints.
struct FluidState {
    previous_timestamp: u64,
    previous_counter: u64,
}

/// A thread-safe generator of fluid IDs: compact, locally-ordered 63-bit
/// identifiers laid out `[timestamp | instance | counter]`.
///
/// Unlike [`DistributedIdGenerator`](crate::DistributedIdGenerator), fluid
/// IDs contain no randomness: uniqueness rests on every process holding a
/// distinct application instance ID. They are half the storage of a
/// distributed ID and fit a signed 64-bit column.
///
/// ## Blocking
///
/// When the counter for the current millisecond is exhausted the generator
/// sleeps in 1 ms steps until the clock advances, up to one second
/// cumulatively per mint.
///
/// # Example
///
/// ```
/// use distrid::{FixedInstanceId, FluidIdGenerator};
///
/// let generator = FluidIdGenerator::new(&FixedInstanceId(7)).unwrap();
/// let a = generator.create_id().unwrap();
/// let b = generator.create_id().unwrap();
/// assert!(a < b);
/// assert_eq!(a >> 63, 0);
/// ```
pub struct FluidIdGenerator<T = WallClock, S = ThreadSleeper>
where
    T: TimeSource<u64>,
    S: SleepProvider,
{
    state: Mutex<FluidState>,
    epoch: u64,
    instance_id: u16,
    bits: BitDistribution,
    time: T,
    sleeper: S,
}

impl FluidIdGenerator {
    /// Creates a production generator over the system wall clock with the
    /// default epoch and bit distribution.
    ///
    /// # Errors
    /// [`Error::Configuration`] if the supplied instance ID is zero or does
    /// not fit the instance field.
    pub fn new(instance_ids: &dyn InstanceIdSource) -> Result<Self> {
        Self::with_options(instance_ids, FluidOptions::default(), WallClock, ThreadSleeper)
    }
}

impl<T, S> FluidIdGenerator<T, S>
where
    T: TimeSource<u64>,
    S: SleepProvider,
{
    /// Creates a generator from explicit options, clock and sleeper.
    ///
    /// The clock must report UTC milliseconds since the Unix epoch (the
    /// [`TimeSource`] contract); epochs are validated against it.
    ///
    /// # Errors
    /// [`Error::Configuration`] if the epoch does not fall on a UTC midnight,
    /// lies in the future, or sits so far back that current timestamps no
    /// longer fit the field; or if the instance ID is zero (in production
    /// mode) or exceeds the instance field.
    pub fn with_options(
        instance_ids: &dyn InstanceIdSource,
        options: FluidOptions,
        time: T,
        sleeper: S,
    ) -> Result<Self> {
        let bits = options.bit_distribution;
        let now = time.current_millis();

        if options.epoch % MILLIS_PER_DAY != 0 {
            return Err(Error::Configuration {
                reason: "epoch must fall on a UTC midnight",
            });
        }
        if options.epoch > now {
            return Err(Error::Configuration {
                reason: "epoch must lie in the past",
            });
        }
        if now - options.epoch > bits.max_signed_timestamp() {
            return Err(Error::Configuration {
                reason: "epoch lies beyond the reach of the timestamp field",
            });
        }

        let instance_id = instance_ids.application_instance_id();
        if instance_id == 0 && !options.allow_zero_instance_id {
            return Err(Error::Configuration {
                reason: "application instance id 0 is reserved for test rigs",
            });
        }
        if instance_id > bits.max_instance_id() {
            return Err(Error::Configuration {
                reason: "application instance id exceeds the instance field",
            });
        }

        Ok(Self {
            state: Mutex::new(FluidState {
                previous_timestamp: 0,
                previous_counter: 0,
            }),
            epoch: options.epoch,
            instance_id,
            bits,
            time,
            sleeper,
        })
    }

    /// The application instance ID baked into every ID from this generator.
    pub const fn application_instance_id(&self) -> u16 {
        self.instance_id
    }

    /// The bit layout baked into every ID from this generator.
    pub const fn bit_distribution(&self) -> BitDistribution {
        self.bits
    }

    /// Mints the next ID.
    ///
    /// # Errors
    /// [`Error::ClockOverflow`] if the epoch-relative timestamp no longer
    /// fits the timestamp field, or if the clock fails to advance while the
    /// counter stays exhausted for a full second. Nothing is committed on
    /// failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip(self))
    )]
    pub fn create_id(&self) -> Result<u64> {
        let mut state = self.state.lock();
        let mut slept_ms = 0u64;

        loop {
            // A clock reading below the epoch is an extreme rewind; treated
            // as timestamp 0, which the regression path below absorbs.
            let timestamp = self.time.current_millis().saturating_sub(self.epoch);
            if timestamp > self.bits.max_signed_timestamp() {
                return Err(Error::ClockOverflow { timestamp });
            }

            if timestamp > state.previous_timestamp {
                state.previous_timestamp = timestamp;
                state.previous_counter = 0;
            } else {
                // Same millisecond, or the clock went backwards: stay on the
                // previous timestamp and take the next counter value.
                let counter = state.previous_counter + 1;
                if counter > self.bits.max_counter() {
                    if slept_ms >= MAX_STALL_MS {
                        return Err(Error::ClockOverflow { timestamp });
                    }
                    self.sleeper.sleep_for(Duration::from_millis(1));
                    slept_ms += 1;
                    continue;
                }
                state.previous_counter = counter;
            }

            return Ok(self.bits.compose(
                state.previous_timestamp,
                self.instance_id,
                state.previous_counter,
            ));
        }
    }
}
