use crate::{RandSource, ThreadRandom};
use core::fmt;

const BITS: u32 = 48;
const MASK: u64 = (1 << BITS) - 1;

/// A 48-bit cryptographically random value with bounded increment.
///
/// The value is held in the low 48 bits of a `u64`; the top 16 bits are
/// always zero. A sequence supports exactly one operation beyond
/// construction: [`add_bounded`], which adds a delta modulo `2^48`.
/// Wrap-around is legal here; the generator enforces the monotonicity
/// invariant by rejecting non-increasing results.
///
/// [`add_bounded`]: RandomSequence::add_bounded
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RandomSequence(u64);

impl RandomSequence {
    /// Draws 48 fresh bits from the thread-local CSPRNG.
    pub fn new_random() -> Self {
        Self::from_source(&ThreadRandom)
    }

    /// Draws 48 fresh bits from the given random source.
    pub fn from_source<R: RandSource<u64>>(rng: &R) -> Self {
        Self(rng.rand() & MASK)
    }

    /// Creates a sequence with a chosen value, keeping debugging and tests
    /// reproducible. The value is masked to 48 bits.
    ///
    /// Production code paths never construct sequences this way; the factory
    /// only exists under `cfg(test)` or the `test-util` feature.
    #[cfg(any(test, feature = "test-util"))]
    pub fn simulate(value: u64) -> Self {
        Self(value & MASK)
    }

    /// Adds `delta` modulo `2^48`, treating both operands as 48-bit values.
    #[must_use]
    pub fn add_bounded(self, delta: u64) -> Self {
        Self(self.0.wrapping_add(delta & MASK) & MASK)
    }

    /// Returns the 48-bit value.
    pub const fn to_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for RandomSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RandomSequence({:#014X})", self.0)
    }
}
