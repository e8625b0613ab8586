use crate::codec::{base62, hex, require_len};
use crate::{Error, Result};
use core::fmt;
use core::str::FromStr;

/// The 128-bit public representation of an ID.
///
/// This is the raw AES ciphertext block produced by a
/// [`PublicIdentityConverter`](crate::PublicIdentityConverter). It is opaque
/// without the key and deterministic with it: the same ID under the same key
/// always yields the same public identity, so the value is safe to use as an
/// external lookup handle.
///
/// Three interchangeable wire forms exist, all fixed-width:
/// - raw bytes (16),
/// - long ASCII (32 uppercase hex characters),
/// - short ASCII (22 Base62 characters).
///
/// Unlike the ID encodings, none of these forms is order-preserving; the
/// ciphertext deliberately carries no structure.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct PublicIdentity([u8; 16]);

impl PublicIdentity {
    /// Width of the raw form in bytes.
    pub const LEN: usize = 16;

    /// Width of the long ASCII (hexadecimal) form.
    pub const HEX_LEN: usize = 32;

    /// Width of the short ASCII (Base62) form.
    pub const ALPHANUMERIC_LEN: usize = 22;

    /// Wraps a raw ciphertext block.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Wraps a raw ciphertext block from a slice.
    ///
    /// # Errors
    /// [`Error::InvalidLength`] unless the slice is exactly 16 bytes.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        require_len(Self::LEN, bytes.len())?;
        Ok(Self(bytes.try_into().expect("checked len")))
    }

    /// The raw ciphertext block.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// The long ASCII form: 32 uppercase hex characters.
    pub fn to_hexadecimal(&self) -> String {
        let mut out = [0u8; Self::HEX_LEN];
        hex::encode(&self.0, &mut out);
        String::from_utf8(out.to_vec()).expect("hex output is ascii")
    }

    /// Parses the long ASCII form (either case).
    ///
    /// # Errors
    /// [`Error::InvalidLength`] or [`Error::InvalidEncoding`].
    pub fn from_hexadecimal(s: &str) -> Result<Self> {
        require_len(Self::HEX_LEN, s.len())?;
        let mut bytes = [0u8; Self::LEN];
        hex::decode(s.as_bytes(), &mut bytes)?;
        Ok(Self(bytes))
    }

    /// The short ASCII form: 22 Base62 characters.
    pub fn to_alphanumeric(&self) -> String {
        let mut out = [0u8; Self::ALPHANUMERIC_LEN];
        base62::encode_block(&self.0, &mut out);
        String::from_utf8(out.to_vec()).expect("base62 output is ascii")
    }

    /// Parses the short ASCII form.
    ///
    /// # Errors
    /// [`Error::InvalidLength`], [`Error::InvalidEncoding`] or
    /// [`Error::InvalidDomain`] (a Base62 group past 64 bits).
    pub fn from_alphanumeric(s: &str) -> Result<Self> {
        require_len(Self::ALPHANUMERIC_LEN, s.len())?;
        let mut bytes = [0u8; Self::LEN];
        base62::decode_block(s.as_bytes(), &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for PublicIdentity {
    /// Displays the long ASCII form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hexadecimal())
    }
}

impl fmt::Debug for PublicIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicIdentity({self})")
    }
}

impl FromStr for PublicIdentity {
    type Err = Error;

    /// Parses either ASCII form, selected by width: 32 characters parse as
    /// hex, 22 as Base62.
    fn from_str(s: &str) -> Result<Self> {
        match s.len() {
            Self::HEX_LEN => Self::from_hexadecimal(s),
            Self::ALPHANUMERIC_LEN => Self::from_alphanumeric(s),
            actual => Err(Error::InvalidLength {
                expected: Self::HEX_LEN,
                actual,
            }),
        }
    }
}

impl From<[u8; 16]> for PublicIdentity {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl From<PublicIdentity> for [u8; 16] {
    fn from(identity: PublicIdentity) -> Self {
        identity.0
    }
}
