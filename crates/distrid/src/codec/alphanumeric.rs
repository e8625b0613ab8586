//! Fixed-width, order-preserving Base62 forms of the ID shapes.

use super::base62;
use crate::{IdBytes, Result};

// Scratch large enough for the widest intermediate (16 bytes -> 22 chars).
const SCRATCH: usize = base62::CHARS_PER_BLOCK_16;

/// Extension trait deriving the alphanumeric (Base62) codec from an ID
/// shape's binary layout.
///
/// Output widths are fixed per shape: 11 characters for `u64`, 16 for
/// [`DistributedId`](crate::DistributedId) and 22 for `u128`/`Uuid`. The
/// distributed-ID form is the trailing 16 characters of the full 22-character
/// encoding; the elided 6 leading characters always encode zero because the
/// sign/scale word is zero and `hi` is capped below `62^5`.
///
/// # Example
///
/// ```
/// use distrid::Alphanumeric;
///
/// assert_eq!(1234567890123456789_u64.to_alphanumeric(), "1TCKi1nFuNh");
/// assert_eq!(u64::from_alphanumeric("1TCKi1nFuNh").unwrap(), 1234567890123456789);
/// ```
pub trait Alphanumeric: IdBytes {
    /// Encodes into the provided output buffer without heap allocation.
    fn encode_alphanumeric(&self, out: &mut Self::AlphanumericArray) {
        let bin = self.to_binary();
        let bin = bin.as_ref();
        let mut scratch = [0u8; SCRATCH];
        let full = &mut scratch[..bin.len() / 8 * base62::CHARS_PER_BLOCK_8];
        base62::encode_block(bin, full);

        let skip = full.len() - Self::ALPHANUMERIC_LEN;
        debug_assert!(
            full[..skip].iter().all(|&c| c == b'0'),
            "elided characters must all encode zero"
        );
        out.as_mut().copy_from_slice(&full[skip..]);
    }

    /// Encodes into a freshly allocated [`String`].
    fn to_alphanumeric(&self) -> String {
        let mut out = Self::AlphanumericArray::default();
        self.encode_alphanumeric(&mut out);
        // Base62 output is always ASCII.
        String::from_utf8(out.as_ref().to_vec()).expect("base62 output is ascii")
    }

    /// Decodes a fixed-width alphanumeric string back into the ID shape.
    ///
    /// Only the exact width for the shape is accepted.
    ///
    /// # Errors
    /// - [`Error::InvalidLength`](crate::Error::InvalidLength) for any other
    ///   input length.
    /// - [`Error::InvalidEncoding`](crate::Error::InvalidEncoding) for bytes
    ///   outside the Base62 alphabet.
    /// - [`Error::InvalidDomain`](crate::Error::InvalidDomain) if the decoded
    ///   value violates the shape's invariants.
    fn from_alphanumeric(s: &str) -> Result<Self> {
        let input = s.as_bytes();
        crate::codec::require_len(Self::ALPHANUMERIC_LEN, input.len())?;

        let full_len = Self::BINARY_LEN / 8 * base62::CHARS_PER_BLOCK_8;
        let pad = full_len - input.len();
        let mut scratch = [b'0'; SCRATCH];
        scratch[pad..full_len].copy_from_slice(input);

        let mut bin = [0u8; 16];
        base62::decode_block(&scratch[..full_len], &mut bin[..Self::BINARY_LEN]).map_err(|e| {
            // Report positions against the caller's (unpadded) input.
            match e {
                crate::Error::InvalidEncoding { byte, index } => crate::Error::InvalidEncoding {
                    byte,
                    index: index - pad,
                },
                other => other,
            }
        })?;
        Self::try_from_binary(&bin[..Self::BINARY_LEN])
    }
}

impl<T: IdBytes> Alphanumeric for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DistributedId, Error, MAX_DISTRIBUTED_ID};
    use uuid::Uuid;

    #[test]
    fn u64_known_vectors() {
        assert_eq!(0_u64.to_alphanumeric(), "00000000000");
        assert_eq!(1234567890123456789_u64.to_alphanumeric(), "1TCKi1nFuNh");
        assert_eq!(u64::MAX.to_alphanumeric(), "LygHa16AHYF");
        assert_eq!(
            u64::from_alphanumeric("LygHa16AHYF").unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn distributed_id_known_vectors() {
        let id = DistributedId::new(447835050025542181830910637).unwrap();
        assert_eq!(id.to_alphanumeric(), "1drbWFYI4a3pLliX");
        assert_eq!(
            DistributedId::from_alphanumeric("1drbWFYI4a3pLliX").unwrap(),
            id
        );

        assert_eq!(DistributedId::ZERO.to_alphanumeric(), "0000000000000000");
        assert_eq!(
            DistributedId::from_alphanumeric("0000000000000000").unwrap(),
            DistributedId::ZERO
        );
    }

    #[test]
    fn guid_known_vector() {
        let guid = Uuid::from_u128(1234567890123456789012345678);
        assert_eq!(guid.to_alphanumeric(), "0000004WoWZ9OjHPSzq3Ju");
        assert_eq!(
            Uuid::from_alphanumeric("0000004WoWZ9OjHPSzq3Ju").unwrap(),
            guid
        );
        assert_eq!(
            1234567890123456789012345678_u128.to_alphanumeric(),
            "0000004WoWZ9OjHPSzq3Ju"
        );
    }

    #[test]
    fn widths_are_exact() {
        assert_eq!(7_u64.to_alphanumeric().len(), 11);
        assert_eq!(DistributedId::from(7_u64).to_alphanumeric().len(), 16);
        assert_eq!(7_u128.to_alphanumeric().len(), 22);

        // Decoders accept only their own width.
        assert!(matches!(
            u64::from_alphanumeric("0000000"),
            Err(Error::InvalidLength {
                expected: 11,
                actual: 7
            })
        ));
        assert!(matches!(
            DistributedId::from_alphanumeric("1TCKi1nFuNh"),
            Err(Error::InvalidLength {
                expected: 16,
                actual: 11
            })
        ));
        assert!(matches!(
            u128::from_alphanumeric("1drbWFYI4a3pLliX"),
            Err(Error::InvalidLength {
                expected: 22,
                actual: 16
            })
        ));
    }

    #[test]
    fn error_index_is_relative_to_input() {
        let result = DistributedId::from_alphanumeric("00000000000000!0");
        assert_eq!(
            result,
            Err(Error::InvalidEncoding {
                byte: b'!',
                index: 14
            })
        );
    }

    #[test]
    fn decoded_distributed_id_revalidates_domain() {
        // Encode MAX as a plain u128 (22 chars), then hand its trailing 16
        // characters of MAX+1 to the decimal decoder.
        let over = (MAX_DISTRIBUTED_ID + 1).to_alphanumeric();
        assert!(over.starts_with("000000"));
        assert!(matches!(
            DistributedId::from_alphanumeric(&over[6..]),
            Err(Error::InvalidDomain { .. })
        ));
    }

    #[test]
    fn order_preserved_at_crossovers() {
        let values: &[u128] = &[
            0,
            9,
            10,
            (1 << 32) - 1,
            1 << 32,
            (1 << 64) - 1,
            1 << 64,
            MAX_DISTRIBUTED_ID,
        ];
        for window in values.windows(2) {
            let a = DistributedId::new(window[0]).unwrap();
            let b = DistributedId::new(window[1]).unwrap();
            assert!(
                a.to_alphanumeric() < b.to_alphanumeric(),
                "{a} vs {b} out of order"
            );
        }
    }

    #[test]
    fn u64_order_preserved() {
        let values: &[u64] = &[0, 1, 61, 62, (1 << 32) - 1, 1 << 32, u64::MAX];
        for window in values.windows(2) {
            assert!(window[0].to_alphanumeric() < window[1].to_alphanumeric());
        }
    }
}
