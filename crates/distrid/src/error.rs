/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `distrid` can emit.
///
/// Encoders surface domain errors and let callers decide how to react.
/// Generators treat [`Error::ClockOverflow`] as fatal. The public-identity
/// converter surfaces [`Error::Configuration`] at construction; at runtime a
/// failed decode returns `None` rather than an error, because a forged or
/// corrupted ciphertext is an *expected* outcome, not a fault.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The value lies outside the encodable domain.
    ///
    /// Raised for negative signed inputs, for decimal payloads with a nonzero
    /// sign/scale word, and for values exceeding
    /// [`MAX_DISTRIBUTED_ID`](crate::MAX_DISTRIBUTED_ID) (or the width of the
    /// decoded target type).
    #[error("value out of domain: {reason}")]
    InvalidDomain {
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// The input contained a byte outside the expected alphabet.
    #[error("invalid byte ({byte}) at index ({index})")]
    InvalidEncoding {
        /// The offending input byte.
        byte: u8,
        /// The index of the offending byte in the input.
        index: usize,
    },

    /// The input length did not match the fixed width of the encoding.
    ///
    /// Every encoding in this crate is fixed-width; decoders accept exactly
    /// that width and nothing else.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// The fixed width the decoder expects.
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },

    /// The clock produced a timestamp that no longer fits the ID's timestamp
    /// field, or failed to advance while the generator was saturated.
    #[error("timestamp exceeds the ID timestamp field: {timestamp}")]
    ClockOverflow {
        /// The out-of-range timestamp, in milliseconds since the generator's
        /// epoch.
        timestamp: u64,
    },

    /// A generator or converter was constructed with invalid parameters.
    #[error("invalid configuration: {reason}")]
    Configuration {
        /// Which construction precondition was violated.
        reason: &'static str,
    },

    /// The underlying cipher refused the key or block.
    ///
    /// Should never happen once the key length has been validated.
    #[error("the cipher rejected the operation")]
    InternalCrypto,
}
