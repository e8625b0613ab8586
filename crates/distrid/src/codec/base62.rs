//! Order-preserving Base62 block codec.
//!
//! The alphabet is `0-9 A-Z a-z` in exactly that order, which coincides with
//! ASCII ordinal order. Together with the fixed block widths this makes the
//! encoding monotonic: for any two values of the same width, the larger value
//! encodes to the ordinally-later string.

use crate::{Error, Result};

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const NO_VALUE: u8 = 255;
const BASE: u64 = 62;

/// Characters needed for one 8-byte block: `62^11 > 2^64`, so 11 digits cover
/// every `u64`.
pub const CHARS_PER_BLOCK_8: usize = 11;

/// Characters needed for one 16-byte block (two independent 8-byte halves).
pub const CHARS_PER_BLOCK_16: usize = 22;

/// Lookup table for Base62 decoding.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0;
    while i < 62 {
        lut[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    lut
};

/// Encodes an 8- or 16-byte block into fixed-width Base62, writing the output
/// to `out`.
///
/// - 8 input bytes are interpreted as one big-endian `u64` and produce 11
///   characters, most-significant digit first.
/// - 16 input bytes are split into two independent 8-byte halves, each
///   encoded as above, producing 22 characters. The high half dominates
///   ordinal comparison, so monotonicity carries over from the 8-byte case.
///
/// `out` must be exactly [`CHARS_PER_BLOCK_8`] or [`CHARS_PER_BLOCK_16`]
/// bytes to match the input. The borrow checker rules out aliasing between
/// `input` and `out`; no runtime aliasing check is needed.
///
/// # Panics
/// Panics if the lengths are not one of the supported pairings.
pub fn encode_block(input: &[u8], out: &mut [u8]) {
    match (input.len(), out.len()) {
        (8, CHARS_PER_BLOCK_8) => encode_half(input, out),
        (16, CHARS_PER_BLOCK_16) => {
            encode_half(&input[..8], &mut out[..CHARS_PER_BLOCK_8]);
            encode_half(&input[8..], &mut out[CHARS_PER_BLOCK_8..]);
        }
        (i, o) => panic!("unsupported base62 block: {i} bytes -> {o} chars"),
    }
}

/// Decodes a fixed-width Base62 block back into its 8 or 16 bytes.
///
/// # Errors
/// - [`Error::InvalidEncoding`] if the input contains a byte outside the
///   Base62 alphabet. Decoding is **not** case-insensitive: case carries
///   value.
/// - [`Error::InvalidDomain`] if an 11-character group encodes a value above
///   `u64::MAX` (11 digits can express up to `62^11 - 1`, which overshoots 64
///   bits).
///
/// # Panics
/// Panics if the lengths are not one of the supported pairings.
pub fn decode_block(input: &[u8], out: &mut [u8]) -> Result<()> {
    match (input.len(), out.len()) {
        (CHARS_PER_BLOCK_8, 8) => decode_half(input, out, 0),
        (CHARS_PER_BLOCK_16, 16) => {
            decode_half(&input[..CHARS_PER_BLOCK_8], &mut out[..8], 0)?;
            decode_half(
                &input[CHARS_PER_BLOCK_8..],
                &mut out[8..],
                CHARS_PER_BLOCK_8,
            )
        }
        (i, o) => panic!("unsupported base62 block: {i} chars -> {o} bytes"),
    }
}

/// Peels 11 base-62 digits off a big-endian `u64`, most-significant first.
///
/// The division chain always terminates with a zero quotient because
/// `62^11 > 2^64`.
fn encode_half(input: &[u8], out: &mut [u8]) {
    debug_assert_eq!(input.len(), 8);
    debug_assert_eq!(out.len(), CHARS_PER_BLOCK_8);

    let mut value = u64::from_be_bytes(input.try_into().expect("8-byte half"));
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(value % BASE) as usize];
        value /= BASE;
    }
    debug_assert_eq!(value, 0, "leftover digits after encoding");
}

fn decode_half(input: &[u8], out: &mut [u8], index_offset: usize) -> Result<()> {
    debug_assert_eq!(input.len(), CHARS_PER_BLOCK_8);
    debug_assert_eq!(out.len(), 8);

    // 62^11 - 1 < 2^71, so a u128 accumulator cannot overflow.
    let mut acc: u128 = 0;
    for (i, &b) in input.iter().enumerate() {
        let val = LOOKUP[b as usize];
        if val == NO_VALUE {
            return Err(Error::InvalidEncoding {
                byte: b,
                index: index_offset + i,
            });
        }
        acc = acc * u128::from(BASE) + u128::from(val);
    }

    let value = u64::try_from(acc).map_err(|_| Error::InvalidDomain {
        reason: "base62 group exceeds 64 bits",
    })?;
    out.copy_from_slice(&value.to_be_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode11(value: u64) -> String {
        let mut buf = [0u8; CHARS_PER_BLOCK_8];
        encode_block(&value.to_be_bytes(), &mut buf);
        String::from_utf8(buf.to_vec()).unwrap()
    }

    fn encode22(value: u128) -> String {
        let mut buf = [0u8; CHARS_PER_BLOCK_16];
        encode_block(&value.to_be_bytes(), &mut buf);
        String::from_utf8(buf.to_vec()).unwrap()
    }

    fn roundtrip_u64(value: u64) {
        let s = encode11(value);
        let mut bytes = [0u8; 8];
        decode_block(s.as_bytes(), &mut bytes).unwrap();
        assert_eq!(
            u64::from_be_bytes(bytes),
            value,
            "roundtrip for u64: input={value}, b62={s}"
        );
    }

    fn roundtrip_u128(value: u128) {
        let s = encode22(value);
        let mut bytes = [0u8; 16];
        decode_block(s.as_bytes(), &mut bytes).unwrap();
        assert_eq!(
            u128::from_be_bytes(bytes),
            value,
            "roundtrip for u128: input={value}, b62={s}"
        );
    }

    #[test]
    fn test_roundtrip_u64() {
        for &v in &[
            0,
            1,
            61,
            62,
            u64::MAX,
            42,
            0xFF00FF00FF00FF00,
            0x1234567890ABCDEF,
        ] {
            roundtrip_u64(v);
        }
    }

    #[test]
    fn test_roundtrip_u128() {
        for &v in &[
            0,
            1,
            u128::MAX,
            42,
            0xFFFF0000FFFF0000FFFF0000FFFF0000,
            0x0123456789ABCDEF0123456789ABCDEF_u128,
        ] {
            roundtrip_u128(v);
        }
    }

    #[test]
    fn known_vectors() {
        assert_eq!(encode11(0), "00000000000");
        assert_eq!(encode11(61), "0000000000z");
        assert_eq!(encode11(62), "00000000010");
        assert_eq!(encode11(1234567890123456789), "1TCKi1nFuNh");
        assert_eq!(encode11(u64::MAX), "LygHa16AHYF");
    }

    #[test]
    fn ordinal_order_follows_numeric_order() {
        // Known crossover points plus dense neighborhoods around them.
        let crossovers: &[u64] = &[
            0,
            1,
            61,
            62,
            (1 << 32) - 1,
            1 << 32,
            u64::MAX - 1,
            u64::MAX,
        ];
        for window in crossovers.windows(2) {
            let (a, b) = (window[0], window[1]);
            assert!(encode11(a) < encode11(b), "{a} vs {b}");
        }

        let crossovers: &[u128] = &[
            0,
            (1 << 64) - 1,
            1 << 64,
            (1 << 96) - 1,
            1 << 96,
            u128::MAX,
        ];
        for window in crossovers.windows(2) {
            let (a, b) = (window[0], window[1]);
            assert!(encode22(a) < encode22(b), "{a} vs {b}");
        }
    }

    #[test]
    fn decode_rejects_invalid_character() {
        let mut bytes = [0u8; 8];
        let result = decode_block(b"0000000000!", &mut bytes);
        assert_eq!(
            result,
            Err(Error::InvalidEncoding {
                byte: b'!',
                index: 10
            })
        );

        // Error position is reported against the full 22-char input.
        let mut bytes = [0u8; 16];
        let result = decode_block(b"00000000000+0000000000", &mut bytes);
        assert_eq!(
            result,
            Err(Error::InvalidEncoding {
                byte: b'+',
                index: 11
            })
        );
    }

    #[test]
    fn decode_is_case_sensitive() {
        let mut upper = [0u8; 8];
        let mut lower = [0u8; 8];
        decode_block(b"0000000000A", &mut upper).unwrap();
        decode_block(b"0000000000a", &mut lower).unwrap();
        assert_eq!(u64::from_be_bytes(upper), 10);
        assert_eq!(u64::from_be_bytes(lower), 36);
    }

    #[test]
    fn decode_rejects_group_past_u64() {
        // "LygHa16AHYF" is u64::MAX; one digit further overflows the half.
        let mut bytes = [0u8; 8];
        let result = decode_block(b"LygHa16AHYG", &mut bytes);
        assert!(matches!(result, Err(Error::InvalidDomain { .. })));

        let result = decode_block(b"zzzzzzzzzzz", &mut bytes);
        assert!(matches!(result, Err(Error::InvalidDomain { .. })));
    }

    #[test]
    fn split_buffer_encode_is_supported() {
        // Input and output can live in one backing allocation as long as the
        // spans are disjoint; the borrow checker enforces disjointness.
        let mut backing = [0u8; 8 + CHARS_PER_BLOCK_8];
        backing[..8].copy_from_slice(&42u64.to_be_bytes());
        let (input, out) = backing.split_at_mut(8);
        encode_block(input, out);
        assert_eq!(&backing[8..], b"0000000000g");
        assert_eq!(&backing[8..], encode11(42).as_bytes());
    }
}
