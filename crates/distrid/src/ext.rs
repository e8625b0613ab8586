use crate::{Alphanumeric, DistributedId, Error, Hexadecimal, Result};
use uuid::Uuid;

/// Textual encodings for the signed ID types.
///
/// Signed IDs are common at database boundaries (`BIGINT`, `NUMERIC`), but
/// only non-negative values are identifiers. These methods validate the sign
/// and delegate to the unsigned codecs; widths and ordering guarantees are
/// those of the corresponding unsigned shape.
pub trait SignedIdExt: Sized {
    /// Encodes as fixed-width Base62.
    ///
    /// # Errors
    /// [`Error::InvalidDomain`] for negative values.
    fn to_alphanumeric(&self) -> Result<String>;

    /// Encodes as fixed-width hexadecimal.
    ///
    /// # Errors
    /// [`Error::InvalidDomain`] for negative values.
    fn to_hexadecimal(&self) -> Result<String>;

    /// Decodes the fixed-width Base62 form.
    ///
    /// # Errors
    /// Those of the unsigned decoder, plus [`Error::InvalidDomain`] when the
    /// decoded value does not fit the signed range.
    fn from_alphanumeric(s: &str) -> Result<Self>;

    /// Decodes the fixed-width hexadecimal form.
    ///
    /// # Errors
    /// Those of the unsigned decoder, plus [`Error::InvalidDomain`] when the
    /// decoded value does not fit the signed range.
    fn from_hexadecimal(s: &str) -> Result<Self>;
}

fn require_non_negative<T: TryInto<U>, U>(value: T) -> Result<U> {
    value.try_into().map_err(|_| Error::InvalidDomain {
        reason: "signed IDs must be non-negative",
    })
}

fn require_signed_range<T: TryInto<U>, U>(value: T) -> Result<U> {
    value.try_into().map_err(|_| Error::InvalidDomain {
        reason: "decoded value exceeds the signed range",
    })
}

impl SignedIdExt for i64 {
    fn to_alphanumeric(&self) -> Result<String> {
        Ok(require_non_negative::<_, u64>(*self)?.to_alphanumeric())
    }

    fn to_hexadecimal(&self) -> Result<String> {
        Ok(require_non_negative::<_, u64>(*self)?.to_hexadecimal())
    }

    fn from_alphanumeric(s: &str) -> Result<Self> {
        require_signed_range(u64::from_alphanumeric(s)?)
    }

    fn from_hexadecimal(s: &str) -> Result<Self> {
        require_signed_range(u64::from_hexadecimal(s)?)
    }
}

impl SignedIdExt for i128 {
    fn to_alphanumeric(&self) -> Result<String> {
        Ok(require_non_negative::<_, u128>(*self)?.to_alphanumeric())
    }

    fn to_hexadecimal(&self) -> Result<String> {
        Ok(require_non_negative::<_, u128>(*self)?.to_hexadecimal())
    }

    fn from_alphanumeric(s: &str) -> Result<Self> {
        require_signed_range(u128::from_alphanumeric(s)?)
    }

    fn from_hexadecimal(s: &str) -> Result<Self> {
        require_signed_range(u128::from_hexadecimal(s)?)
    }
}

/// Reinterpretation of 128-bit ID shapes as UUIDs.
///
/// The resulting UUID shares its 16 big-endian bytes with the numeric value,
/// so lexical UUID order matches numeric order (see the
/// [`IdBytes`](crate::IdBytes) UUID layout note for the on-disk caveat).
pub trait GuidExt {
    /// Returns the UUID carrying this value.
    fn to_guid(&self) -> Uuid;
}

impl GuidExt for u128 {
    fn to_guid(&self) -> Uuid {
        Uuid::from_u128(*self)
    }
}

impl GuidExt for DistributedId {
    fn to_guid(&self) -> Uuid {
        DistributedId::to_guid(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_encodes_delegate_to_unsigned() {
        assert_eq!(
            1234567890123456789_i64.to_alphanumeric().unwrap(),
            "1TCKi1nFuNh"
        );
        assert_eq!(
            SignedIdExt::to_hexadecimal(&255_i64).unwrap(),
            "00000000000000FF"
        );
        assert_eq!(
            42_i128.to_alphanumeric().unwrap(),
            42_u128.to_alphanumeric()
        );
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(matches!(
            (-1_i64).to_alphanumeric(),
            Err(Error::InvalidDomain { .. })
        ));
        assert!(matches!(
            (-1_i128).to_hexadecimal(),
            Err(Error::InvalidDomain { .. })
        ));
    }

    #[test]
    fn signed_decode_checks_range() {
        assert_eq!(
            <i64 as SignedIdExt>::from_alphanumeric("1TCKi1nFuNh").unwrap(),
            1234567890123456789
        );
        // u64::MAX decodes fine as unsigned but overflows i64.
        assert!(matches!(
            <i64 as SignedIdExt>::from_alphanumeric("LygHa16AHYF"),
            Err(Error::InvalidDomain { .. })
        ));
        assert_eq!(
            <i64 as SignedIdExt>::from_hexadecimal("00000000000000FF").unwrap(),
            255
        );
        assert!(matches!(
            <i64 as SignedIdExt>::from_hexadecimal("FFFFFFFFFFFFFFFF"),
            Err(Error::InvalidDomain { .. })
        ));
    }

    #[test]
    fn guid_reinterpretation() {
        let value = 0x0123_4567_89AB_CDEF_0011_2233_4455_6677_u128;
        assert_eq!(value.to_guid().as_u128(), value);

        let id = DistributedId::new(447835050025542181830910637).unwrap();
        assert_eq!(GuidExt::to_guid(&id).as_u128(), id.to_u128());
    }
}
