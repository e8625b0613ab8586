use crate::{Error, Result};
use core::fmt;
use core::str::FromStr;
use uuid::Uuid;

/// The largest value a distributed ID can take: `10^28 - 1`.
///
/// A distributed ID is a 28-digit decimal that fits a 96-bit mantissa. The
/// composed form is a 48-bit millisecond timestamp over 48 random bits, and
/// `2^93 < 10^28`, so every value a generator can emit stays below this
/// ceiling with the timestamp capped at `2^45 - 1`.
pub const MAX_DISTRIBUTED_ID: u128 = 0x204F_CE5E_3E25_0261_0FFF_FFFF;

const TIMESTAMP_SHIFT: u32 = 48;
const RANDOM_MASK: u128 = (1 << TIMESTAMP_SHIFT) - 1;

/// A distributed, sortable, collision-resistant identifier.
///
/// The value is a non-negative integer of at most 28 decimal digits, carried
/// in what a decimal-typed storage engine sees as a 96-bit mantissa with
/// sign = 0 and scale = 0. In memory it is modeled as a `u128` clamped to
/// [`MAX_DISTRIBUTED_ID`]; only the payload is ever used, never scale
/// arithmetic.
///
/// Ordering, equality and hashing all follow the numeric value, and every
/// textual encoding in this crate preserves that order.
///
/// # Example
///
/// ```
/// use distrid::DistributedId;
///
/// let id = DistributedId::new(447835050025542181830910637).unwrap();
/// assert_eq!(id.to_string(), "447835050025542181830910637");
/// assert_eq!("447835050025542181830910637".parse::<DistributedId>().unwrap(), id);
/// ```
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DistributedId(u128);

impl DistributedId {
    /// The zero ID. Never produced by a generator, but a valid payload.
    pub const ZERO: Self = Self(0);

    /// The largest valid ID, [`MAX_DISTRIBUTED_ID`].
    pub const MAX: Self = Self(MAX_DISTRIBUTED_ID);

    /// Creates an ID from its numeric value.
    ///
    /// # Errors
    /// [`Error::InvalidDomain`] if `value` exceeds [`MAX_DISTRIBUTED_ID`].
    pub const fn new(value: u128) -> Result<Self> {
        if value > MAX_DISTRIBUTED_ID {
            return Err(Error::InvalidDomain {
                reason: "value exceeds MAX_DISTRIBUTED_ID",
            });
        }
        Ok(Self(value))
    }

    /// Composes an ID from a 48-bit millisecond timestamp and 48 random bits.
    ///
    /// Callers uphold `timestamp < 2^45` and `random < 2^48`; the composed
    /// value then provably fits the 28-digit ceiling.
    pub(crate) const fn from_parts(timestamp: u64, random: u64) -> Self {
        debug_assert!(timestamp < 1 << 45);
        debug_assert!(random < 1 << TIMESTAMP_SHIFT);
        Self(((timestamp as u128) << TIMESTAMP_SHIFT) | random as u128)
    }

    /// Returns the numeric value.
    pub const fn to_u128(self) -> u128 {
        self.0
    }

    /// Milliseconds since the Unix epoch at which this ID was minted (the
    /// high 48 bits).
    pub const fn timestamp_millis(self) -> u64 {
        (self.0 >> TIMESTAMP_SHIFT) as u64
    }

    /// The 48 random bits of this ID (the low 48 bits).
    pub const fn random(self) -> u64 {
        (self.0 & RANDOM_MASK) as u64
    }

    /// The sign-and-scale word of the 128-bit decimal layout. Always zero for
    /// a valid ID.
    pub const fn sign_and_scale(self) -> u32 {
        0
    }

    /// The high 32-bit word of the 96-bit mantissa.
    pub const fn hi(self) -> u32 {
        (self.0 >> 64) as u32
    }

    /// The middle 32-bit word of the 96-bit mantissa.
    pub const fn mid(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// The low 32-bit word of the 96-bit mantissa.
    pub const fn lo(self) -> u32 {
        self.0 as u32
    }

    /// Reinterprets this ID as a UUID whose numeric (`u128`) value equals the
    /// ID.
    ///
    /// The UUID's lexical form, its big-endian bytes and the numeric value
    /// all sort identically. Engines that store GUIDs with the first three
    /// fields little-endian will not observe this ordering on disk.
    pub const fn to_guid(self) -> Uuid {
        Uuid::from_u128(self.0)
    }

    /// Recovers an ID from a UUID produced by [`Self::to_guid`].
    ///
    /// # Errors
    /// [`Error::InvalidDomain`] if the UUID's numeric value exceeds
    /// [`MAX_DISTRIBUTED_ID`].
    pub const fn from_guid(guid: Uuid) -> Result<Self> {
        Self::new(guid.as_u128())
    }
}

// Layout self-check: a sentinel value must read back through the word
// accessors exactly as the 96-bit mantissa layout prescribes.
const _: () = {
    let sentinel = DistributedId(0x0102_0304_0506_0708_090A_0B0C);
    assert!(sentinel.sign_and_scale() == 0);
    assert!(sentinel.hi() == 0x0102_0304);
    assert!(sentinel.mid() == 0x0506_0708);
    assert!(sentinel.lo() == 0x090A_0B0C);
    assert!(MAX_DISTRIBUTED_ID == 10_u128.pow(28) - 1);
};

impl fmt::Display for DistributedId {
    /// Plain base-10 digits; no sign, separators, or exponent.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for DistributedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DistributedId({})", self.0)
    }
}

impl FromStr for DistributedId {
    type Err = Error;

    /// Parses the decimal form. Accepts only ASCII digits: no sign, no
    /// separators, no scientific notation.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s.len() > 29 {
            // 29 guards the u128 parse; the domain check below enforces the
            // real 28-digit ceiling.
            return Err(Error::InvalidLength {
                expected: 28,
                actual: s.len(),
            });
        }
        if let Some(pos) = s.bytes().position(|b| !b.is_ascii_digit()) {
            return Err(Error::InvalidEncoding {
                byte: s.as_bytes()[pos],
                index: pos,
            });
        }
        let value: u128 = s.parse().map_err(|_| Error::InvalidDomain {
            reason: "value exceeds MAX_DISTRIBUTED_ID",
        })?;
        Self::new(value)
    }
}

impl From<u64> for DistributedId {
    /// Every `u64` is below `10^28`, so this conversion is infallible.
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}

impl From<DistributedId> for u128 {
    fn from(id: DistributedId) -> Self {
        id.0
    }
}

impl TryFrom<u128> for DistributedId {
    type Error = Error;

    fn try_from(value: u128) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<i128> for DistributedId {
    type Error = Error;

    fn try_from(value: i128) -> Result<Self> {
        let value = u128::try_from(value).map_err(|_| Error::InvalidDomain {
            reason: "distributed IDs are non-negative",
        })?;
        Self::new(value)
    }
}
