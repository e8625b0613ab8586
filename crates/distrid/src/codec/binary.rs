//! Bit-exact, order-preserving binary layouts for each ID shape.
//!
//! All layouts are big-endian at the byte level, so `memcmp` over the encoded
//! bytes agrees with numeric comparison of the values. The contract is
//! defined byte-wise; it holds on any host endianness.

use super::require_len;
use crate::{DistributedId, Error, Result};
use core::fmt;
use core::hash::Hash;
use uuid::Uuid;

/// A trait for ID shapes with a fixed-width binary layout and derived
/// fixed-width textual encodings.
///
/// Implementations define the byte layout ([`write_binary`]/
/// [`try_from_binary`]) and the widths of the Base62 and hexadecimal forms;
/// the [`Alphanumeric`](crate::Alphanumeric) and
/// [`Hexadecimal`](crate::Hexadecimal) extension traits derive the textual
/// codecs from those.
///
/// [`write_binary`]: IdBytes::write_binary
/// [`try_from_binary`]: IdBytes::try_from_binary
pub trait IdBytes: Sized {
    /// Width of the binary layout in bytes (8 or 16).
    const BINARY_LEN: usize;

    /// Width of the Base62 textual form in characters.
    const ALPHANUMERIC_LEN: usize;

    /// Width of the hexadecimal textual form in characters.
    const HEXADECIMAL_LEN: usize;

    /// `[u8; BINARY_LEN]`.
    type BinaryArray: AsRef<[u8]> + AsMut<[u8]> + Default + Copy + fmt::Debug + PartialEq + Eq + Hash;

    /// `[u8; ALPHANUMERIC_LEN]`.
    type AlphanumericArray: AsRef<[u8]>
        + AsMut<[u8]>
        + Default
        + Copy
        + fmt::Debug
        + PartialEq
        + Eq
        + Hash;

    /// `[u8; HEXADECIMAL_LEN]`.
    type HexadecimalArray: AsRef<[u8]>
        + AsMut<[u8]>
        + Default
        + Copy
        + fmt::Debug
        + PartialEq
        + Eq
        + Hash;

    /// Writes the big-endian binary layout into `out`.
    fn write_binary(&self, out: &mut Self::BinaryArray);

    /// Decodes the binary layout back into the ID shape.
    ///
    /// # Errors
    /// - [`Error::InvalidLength`] if `bytes` is not exactly
    ///   [`Self::BINARY_LEN`] long.
    /// - [`Error::InvalidDomain`] if the bytes violate the shape's value
    ///   invariants (nonzero sign/scale word, value past the 28-digit
    ///   ceiling).
    fn try_from_binary(bytes: &[u8]) -> Result<Self>;

    /// Returns the binary layout as an owned array.
    fn to_binary(&self) -> Self::BinaryArray {
        let mut out = Self::BinaryArray::default();
        self.write_binary(&mut out);
        out
    }
}

impl IdBytes for u64 {
    const BINARY_LEN: usize = 8;
    const ALPHANUMERIC_LEN: usize = 11;
    const HEXADECIMAL_LEN: usize = 16;

    type BinaryArray = [u8; 8];
    type AlphanumericArray = [u8; 11];
    type HexadecimalArray = [u8; 16];

    fn write_binary(&self, out: &mut Self::BinaryArray) {
        *out = self.to_be_bytes();
    }

    fn try_from_binary(bytes: &[u8]) -> Result<Self> {
        require_len(Self::BINARY_LEN, bytes.len())?;
        Ok(Self::from_be_bytes(bytes.try_into().expect("checked len")))
    }
}

impl IdBytes for u128 {
    const BINARY_LEN: usize = 16;
    const ALPHANUMERIC_LEN: usize = 22;
    const HEXADECIMAL_LEN: usize = 32;

    type BinaryArray = [u8; 16];
    type AlphanumericArray = [u8; 22];
    type HexadecimalArray = [u8; 32];

    fn write_binary(&self, out: &mut Self::BinaryArray) {
        *out = self.to_be_bytes();
    }

    fn try_from_binary(bytes: &[u8]) -> Result<Self> {
        require_len(Self::BINARY_LEN, bytes.len())?;
        Ok(Self::from_be_bytes(bytes.try_into().expect("checked len")))
    }
}

/// The UUID layout is the RFC byte order, which is the same 16 bytes as the
/// numeric `u128` in big-endian. String-ordinal sort of the hyphenated form,
/// byte sort of the layout, and numeric sort of the `u128` therefore all
/// coincide. Systems that persist GUIDs with the first three fields
/// little-endian (e.g. Windows/.NET on-disk GUIDs) do **not** share this
/// ordering; the layout here is the library's own, chosen for
/// order-preservation.
impl IdBytes for Uuid {
    const BINARY_LEN: usize = 16;
    const ALPHANUMERIC_LEN: usize = 22;
    const HEXADECIMAL_LEN: usize = 32;

    type BinaryArray = [u8; 16];
    type AlphanumericArray = [u8; 22];
    type HexadecimalArray = [u8; 32];

    fn write_binary(&self, out: &mut Self::BinaryArray) {
        *out = *self.as_bytes();
    }

    fn try_from_binary(bytes: &[u8]) -> Result<Self> {
        require_len(Self::BINARY_LEN, bytes.len())?;
        Ok(Self::from_bytes(bytes.try_into().expect("checked len")))
    }
}

/// Laid out as the four 32-bit words of the 128-bit decimal, each big-endian,
/// in the order sign-and-scale (always zero), `hi`, `mid`, `lo`.
impl IdBytes for DistributedId {
    const BINARY_LEN: usize = 16;
    const ALPHANUMERIC_LEN: usize = 16;
    const HEXADECIMAL_LEN: usize = 26;

    type BinaryArray = [u8; 16];
    type AlphanumericArray = [u8; 16];
    type HexadecimalArray = [u8; 26];

    fn write_binary(&self, out: &mut Self::BinaryArray) {
        out[0..4].copy_from_slice(&self.sign_and_scale().to_be_bytes());
        out[4..8].copy_from_slice(&self.hi().to_be_bytes());
        out[8..12].copy_from_slice(&self.mid().to_be_bytes());
        out[12..16].copy_from_slice(&self.lo().to_be_bytes());
    }

    fn try_from_binary(bytes: &[u8]) -> Result<Self> {
        require_len(Self::BINARY_LEN, bytes.len())?;
        if bytes[0..4] != [0, 0, 0, 0] {
            return Err(Error::InvalidDomain {
                reason: "nonzero sign/scale word",
            });
        }
        let mut wide = [0u8; 16];
        wide[4..16].copy_from_slice(&bytes[4..16]);
        Self::new(u128::from_be_bytes(wide))
    }
}
