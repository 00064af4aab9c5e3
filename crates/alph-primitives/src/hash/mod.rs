//! Blake2b-256 hashing.
//!
//! Provides the `Blake2b` digest type used for transaction ids, token ids,
//! output reference keys and public-key hashes, plus the DJB string hash
//! in [`djb`].

pub mod djb;

use std::fmt;
use std::str::FromStr;

use blake2::digest::consts::U32;
use blake2::{Blake2b as Blake2bCore, Digest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PrimitivesError;

/// Size of a Blake2b-256 digest in bytes.
pub const HASH_SIZE: usize = 32;

type Blake2b256Hasher = Blake2bCore<U32>;

/// Compute the raw Blake2b-256 digest of `data`.
pub fn blake2b256(data: &[u8]) -> [u8; HASH_SIZE] {
    let mut hasher = Blake2b256Hasher::new();
    hasher.update(data);
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// A 32-byte Blake2b-256 digest.
///
/// Displayed and serialized to JSON as lowercase hex in natural byte order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Blake2b([u8; HASH_SIZE]);

/// Alias naming the digest width explicitly.
pub type Blake2b256 = Blake2b;

impl Blake2b {
    /// Wrap an existing 32-byte digest.
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Blake2b(bytes)
    }

    /// Hash `data`.
    ///
    /// # Arguments
    /// * `data` - Bytes to hash.
    ///
    /// # Returns
    /// The Blake2b-256 digest of `data`.
    pub fn hash(data: &[u8]) -> Self {
        Blake2b(blake2b256(data))
    }

    /// Wrap a digest given as a slice.
    ///
    /// # Returns
    /// An error unless `bytes` is exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; HASH_SIZE] = bytes.try_into().map_err(|_| PrimitivesError::InvalidLength {
            expected: HASH_SIZE,
            got: bytes.len(),
        })?;
        Ok(Blake2b(arr))
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; HASH_SIZE] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Blake2b {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Blake2b {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Blake2b {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blake2b({})", self.to_hex())
    }
}

impl FromStr for Blake2b {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Blake2b::from_hex(s)
    }
}

/// Serialize as a hex string in JSON.
impl Serialize for Blake2b {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Blake2b {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Blake2b::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
