//! Serde support.
//!
//! [`DistributedId`] serializes as its plain decimal string, the one form
//! every consumer (JSON, logs, SQL tooling) reads back without precision
//! loss, since the value exceeds an `f64`'s 53-bit mantissa. The
//! [`as_alphanumeric`] adapter is available for fields that should travel in
//! the compact Base62 form instead. [`PublicIdentity`] serializes as its
//! 32-character hex form.

use crate::{Alphanumeric, DistributedId, PublicIdentity};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Serialize for DistributedId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DistributedId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = DistributedId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a decimal string of at most 28 digits")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(DistributedId::from(v))
            }
        }

        d.deserialize_str(DecimalVisitor)
    }
}

impl Serialize for PublicIdentity {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublicIdentity {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdentityVisitor;

        impl serde::de::Visitor<'_> for IdentityVisitor {
            type Value = PublicIdentity;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a 32-character hex or 22-character base62 string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(IdentityVisitor)
    }
}

/// Field-level adapter serializing a distributed ID in its 16-character
/// Base62 form.
///
/// ```
/// use distrid::DistributedId;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Row {
///     #[serde(with = "distrid::as_alphanumeric")]
///     id: DistributedId,
/// }
/// ```
pub mod as_alphanumeric {
    use super::*;

    pub fn serialize<S>(id: &DistributedId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(id.to_alphanumeric().as_str())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<DistributedId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AlphanumericVisitor;

        impl serde::de::Visitor<'_> for AlphanumericVisitor {
            type Value = DistributedId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a 16-character base62 string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                DistributedId::from_alphanumeric(v).map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(AlphanumericVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distributed_id_as_decimal_string() {
        #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
        struct Row {
            id: DistributedId,
        }
        let row = Row {
            id: DistributedId::new(447835050025542181830910637).unwrap(),
        };

        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"id":"447835050025542181830910637"}"#);
        let back: Row = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn distributed_id_as_alphanumeric() {
        #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
        struct Row {
            #[serde(with = "as_alphanumeric")]
            id: DistributedId,
        }
        let row = Row {
            id: DistributedId::new(447835050025542181830910637).unwrap(),
        };

        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"id":"1drbWFYI4a3pLliX"}"#);
        let back: Row = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn deserialize_rejects_out_of_domain() {
        let over = r#""10000000000000000000000000000""#;
        assert!(serde_json::from_str::<DistributedId>(over).is_err());
    }

    #[test]
    fn public_identity_as_hex() {
        let identity = PublicIdentity::from_bytes([0xAB; 16]);
        let json = serde_json::to_string(&identity).expect("serialize");
        assert_eq!(json, r#""ABABABABABABABABABABABABABABABAB""#);
        let back: PublicIdentity = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, identity);
    }
}
