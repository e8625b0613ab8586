//! Fixed-width, order-preserving hexadecimal forms of the ID shapes.

use super::hex;
use crate::{IdBytes, Result};

// Scratch large enough for the widest intermediate (16 bytes -> 32 chars).
const SCRATCH: usize = 32;

/// Extension trait deriving the hexadecimal codec from an ID shape's binary
/// layout.
///
/// Output widths are fixed per shape: 16 characters for `u64`, 26 for
/// [`DistributedId`](crate::DistributedId) and 32 for `u128`/`Uuid`. The
/// distributed-ID form drops the three leading bytes of the binary layout,
/// which are always zero (the top of the sign/scale word), leaving 13 bytes.
///
/// Encoding is uppercase; decoding accepts either case.
///
/// # Example
///
/// ```
/// use distrid::{DistributedId, Hexadecimal};
///
/// let id = DistributedId::MAX;
/// assert_eq!(id.to_hexadecimal(), "00204FCE5E3E2502610FFFFFFF");
/// assert_eq!(DistributedId::from_hexadecimal("00204fce5e3e2502610fffffff").unwrap(), id);
/// ```
pub trait Hexadecimal: IdBytes {
    /// Encodes into the provided output buffer without heap allocation.
    fn encode_hexadecimal(&self, out: &mut Self::HexadecimalArray) {
        let bin = self.to_binary();
        let bin = bin.as_ref();
        let skip_bytes = (bin.len() * 2 - Self::HEXADECIMAL_LEN) / 2;
        debug_assert!(
            bin[..skip_bytes].iter().all(|&b| b == 0),
            "elided bytes must all be zero"
        );

        let mut scratch = [0u8; SCRATCH];
        let full = &mut scratch[..bin.len() * 2];
        hex::encode(bin, full);
        out.as_mut()
            .copy_from_slice(&full[skip_bytes * 2..]);
    }

    /// Encodes into a freshly allocated [`String`].
    fn to_hexadecimal(&self) -> String {
        let mut out = Self::HexadecimalArray::default();
        self.encode_hexadecimal(&mut out);
        // Hex output is always ASCII.
        String::from_utf8(out.as_ref().to_vec()).expect("hex output is ascii")
    }

    /// Decodes a fixed-width hexadecimal string back into the ID shape.
    ///
    /// Only the exact width for the shape is accepted.
    ///
    /// # Errors
    /// - [`Error::InvalidLength`](crate::Error::InvalidLength) for any other
    ///   input length.
    /// - [`Error::InvalidEncoding`](crate::Error::InvalidEncoding) for
    ///   non-hex bytes.
    /// - [`Error::InvalidDomain`](crate::Error::InvalidDomain) if the decoded
    ///   value violates the shape's invariants.
    fn from_hexadecimal(s: &str) -> Result<Self> {
        let input = s.as_bytes();
        crate::codec::require_len(Self::HEXADECIMAL_LEN, input.len())?;

        let full_len = Self::BINARY_LEN * 2;
        let pad = full_len - input.len();
        let mut scratch = [b'0'; SCRATCH];
        scratch[pad..full_len].copy_from_slice(input);

        let mut bin = [0u8; 16];
        hex::decode(&scratch[..full_len], &mut bin[..Self::BINARY_LEN]).map_err(|e| match e {
            crate::Error::InvalidEncoding { byte, index } => crate::Error::InvalidEncoding {
                byte,
                index: index - pad,
            },
            other => other,
        })?;
        Self::try_from_binary(&bin[..Self::BINARY_LEN])
    }
}

impl<T: IdBytes> Hexadecimal for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DistributedId, Error, MAX_DISTRIBUTED_ID};
    use uuid::Uuid;

    #[test]
    fn u64_roundtrip() {
        assert_eq!(0xDEAD_BEEF_u64.to_hexadecimal(), "00000000DEADBEEF");
        assert_eq!(
            u64::from_hexadecimal("00000000deadbeef").unwrap(),
            0xDEAD_BEEF
        );
        assert_eq!(u64::MAX.to_hexadecimal(), "FFFFFFFFFFFFFFFF");
    }

    #[test]
    fn distributed_id_known_vector() {
        assert_eq!(
            DistributedId::MAX.to_hexadecimal(),
            "00204FCE5E3E2502610FFFFFFF"
        );
        assert_eq!(
            DistributedId::from_hexadecimal("00204FCE5E3E2502610FFFFFFF").unwrap(),
            DistributedId::MAX
        );
        assert_eq!(
            DistributedId::ZERO.to_hexadecimal(),
            "00000000000000000000000000"
        );
    }

    #[test]
    fn guid_is_full_width() {
        let guid = Uuid::from_u128(0x0123_4567_89AB_CDEF_0011_2233_4455_6677);
        assert_eq!(guid.to_hexadecimal(), "0123456789ABCDEF0011223344556677");
        assert_eq!(
            Uuid::from_hexadecimal("0123456789abcdef0011223344556677").unwrap(),
            guid
        );
    }

    #[test]
    fn widths_are_exact() {
        assert_eq!(1_u64.to_hexadecimal().len(), 16);
        assert_eq!(DistributedId::from(1_u64).to_hexadecimal().len(), 26);
        assert_eq!(1_u128.to_hexadecimal().len(), 32);

        assert!(matches!(
            DistributedId::from_hexadecimal("00204FCE5E3E2502610FFFFFFF0"),
            Err(Error::InvalidLength {
                expected: 26,
                actual: 27
            })
        ));
        assert!(matches!(
            u64::from_hexadecimal(""),
            Err(Error::InvalidLength {
                expected: 16,
                actual: 0
            })
        ));
    }

    #[test]
    fn decode_rejects_non_hex_with_input_relative_index() {
        let result = DistributedId::from_hexadecimal("00204FCE5E3E2502610FFFFFFX");
        assert_eq!(
            result,
            Err(Error::InvalidEncoding {
                byte: b'X',
                index: 25
            })
        );
    }

    #[test]
    fn decoded_distributed_id_revalidates_domain() {
        // 10^28 still fits 26 hex characters but exceeds the ceiling.
        let over = format!("{:026X}", MAX_DISTRIBUTED_ID + 1);
        assert!(matches!(
            DistributedId::from_hexadecimal(&over),
            Err(Error::InvalidDomain { .. })
        ));
    }

    #[test]
    fn order_preserved_at_crossovers() {
        let values: &[u128] = &[
            0,
            0xF,
            0x10,
            (1 << 32) - 1,
            1 << 32,
            (1 << 64) - 1,
            1 << 64,
            MAX_DISTRIBUTED_ID,
        ];
        for window in values.windows(2) {
            let a = DistributedId::new(window[0]).unwrap();
            let b = DistributedId::new(window[1]).unwrap();
            assert!(a.to_hexadecimal() < b.to_hexadecimal());
        }
    }
}
