use crate::{DistributedId, Error, IdBytes, PublicIdentity, Result};
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256, Block};
use uuid::Uuid;

enum Cipher {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

/// Converts IDs to and from their 128-bit public representations.
///
/// The public form is a single AES-ECB block over a structured cleartext:
///
/// ```text
/// | 8 zero bytes | 8-byte id  |      u64 shape
/// | 4 zero bytes | 12-byte id |      distributed (decimal) shape
/// |         16-byte id        |      u128 / UUID shape
/// ```
///
/// The zero prefix *is* the checksum: on decode, a block that does not
/// decrypt to the expected zero prefix is rejected, so a forged ciphertext
/// passes with probability `2^-64` for the `u64` shape and `2^-32` for the
/// distributed shape. The `u128` shape has no spare bits and therefore no
/// checksum; its decode cannot fail, and the API says so by returning a bare
/// value.
///
/// Single-block ECB is deliberate. On a 16-byte message with a built-in zero
/// prefix it is equivalent to CBC with a zero IV and no chaining, and the
/// determinism (the same ID under the same key always maps to the same
/// public identity) is a product requirement. Do not substitute
/// CBC/CTR/GCM.
///
/// The underlying ciphers are stateless, so a converter is `Send + Sync` and
/// every operation works on a stack block without locking or allocating.
///
/// # Example
///
/// ```
/// use distrid::PublicIdentityConverter;
///
/// let converter = PublicIdentityConverter::new(&[7u8; 32]).unwrap();
/// let public = converter.conceal_u64(12345);
/// assert_eq!(converter.reveal_u64(public), Some(12345));
///
/// // A block produced under another key fails the checksum.
/// let other = PublicIdentityConverter::new(&[8u8; 32]).unwrap();
/// assert_eq!(other.reveal_u64(public), None);
/// ```
pub struct PublicIdentityConverter {
    cipher: Cipher,
}

impl PublicIdentityConverter {
    /// Creates a converter from an AES key of 16, 24 or 32 bytes.
    ///
    /// # Errors
    /// [`Error::Configuration`] for any other key length.
    /// [`Error::InternalCrypto`] if the cipher rejects a validated key
    /// (not expected to happen).
    pub fn new(key: &[u8]) -> Result<Self> {
        let cipher = match key.len() {
            16 => Cipher::Aes128(Aes128::new_from_slice(key).map_err(|_| Error::InternalCrypto)?),
            24 => Cipher::Aes192(Aes192::new_from_slice(key).map_err(|_| Error::InternalCrypto)?),
            32 => Cipher::Aes256(Aes256::new_from_slice(key).map_err(|_| Error::InternalCrypto)?),
            _ => {
                return Err(Error::Configuration {
                    reason: "AES key must be 16, 24, or 32 bytes",
                });
            }
        };
        Ok(Self { cipher })
    }

    /// A converter over an all-zero 128-bit key, for test rigs that need a
    /// working converter without key management.
    #[cfg(any(test, feature = "test-util"))]
    pub fn zero_key() -> Self {
        Self::new(&[0u8; 16]).expect("a 16-byte key is always accepted")
    }

    fn encrypt(&self, block: &mut Block) {
        match &self.cipher {
            Cipher::Aes128(c) => c.encrypt_block(block),
            Cipher::Aes192(c) => c.encrypt_block(block),
            Cipher::Aes256(c) => c.encrypt_block(block),
        }
    }

    fn decrypt(&self, block: &mut Block) {
        match &self.cipher {
            Cipher::Aes128(c) => c.decrypt_block(block),
            Cipher::Aes192(c) => c.decrypt_block(block),
            Cipher::Aes256(c) => c.decrypt_block(block),
        }
    }

    fn conceal_block(&self, plain: [u8; 16]) -> PublicIdentity {
        let mut block = Block::clone_from_slice(&plain);
        self.encrypt(&mut block);
        let mut out = [0u8; 16];
        out.copy_from_slice(&block);
        PublicIdentity::from_bytes(out)
    }

    fn reveal_block(&self, identity: PublicIdentity) -> [u8; 16] {
        let mut block = Block::clone_from_slice(identity.as_bytes());
        self.decrypt(&mut block);
        let mut out = [0u8; 16];
        out.copy_from_slice(&block);
        out
    }

    /// Produces the public representation of a `u64` ID.
    pub fn conceal_u64(&self, id: u64) -> PublicIdentity {
        let mut plain = [0u8; 16];
        plain[8..].copy_from_slice(&id.to_be_bytes());
        self.conceal_block(plain)
    }

    /// Produces the public representation of a distributed ID.
    pub fn conceal_id(&self, id: DistributedId) -> PublicIdentity {
        // The binary layout already carries the 4-byte zero sign/scale word
        // that doubles as the checksum prefix.
        self.conceal_block(id.to_binary())
    }

    /// Produces the public representation of a `u128` ID.
    pub fn conceal_u128(&self, id: u128) -> PublicIdentity {
        self.conceal_block(id.to_be_bytes())
    }

    /// Produces the public representation of a UUID.
    pub fn conceal_guid(&self, id: Uuid) -> PublicIdentity {
        self.conceal_block(*id.as_bytes())
    }

    /// Recovers a `u64` ID, or `None` if the block fails the checksum.
    pub fn reveal_u64(&self, identity: PublicIdentity) -> Option<u64> {
        let plain = self.reveal_block(identity);
        if plain[..8] != [0u8; 8] {
            return None;
        }
        Some(u64::from_be_bytes(plain[8..].try_into().expect("8 bytes")))
    }

    /// Recovers a distributed ID, or `None` if the block fails the checksum
    /// or decodes past the 28-digit ceiling.
    pub fn reveal_id(&self, identity: PublicIdentity) -> Option<DistributedId> {
        DistributedId::try_from_binary(&self.reveal_block(identity)).ok()
    }

    /// Recovers a `u128` ID. Every block decrypts to *some* `u128`, so this
    /// shape has no checksum and the decode cannot fail.
    pub fn reveal_u128(&self, identity: PublicIdentity) -> u128 {
        u128::from_be_bytes(self.reveal_block(identity))
    }

    /// Recovers a UUID. Like [`Self::reveal_u128`], this cannot fail.
    pub fn reveal_guid(&self, identity: PublicIdentity) -> Uuid {
        Uuid::from_bytes(self.reveal_block(identity))
    }
}
