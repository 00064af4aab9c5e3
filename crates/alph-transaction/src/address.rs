//! Base58 addresses for asset lockup scripts.
//!
//! An address is the serialized lockup script (discriminant byte plus
//! payload) rendered in base58, without a checksum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::lockup::LockupScript;
use crate::unlock::PublicKey;
use crate::TransactionError;

/// A human-readable handle on an asset lockup script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    lockup_script: LockupScript,
}

impl Address {
    pub fn new(lockup_script: LockupScript) -> Self {
        Address { lockup_script }
    }

    /// The P2PKH address of `public_key`.
    pub fn p2pkh(public_key: &PublicKey) -> Self {
        Address::new(LockupScript::p2pkh_from_public_key(public_key))
    }

    /// Parse a base58 address string.
    ///
    /// # Arguments
    /// * `addr` - The base58 address.
    ///
    /// # Returns
    /// The address, or `InvalidAddress` if the string is not base58 or does
    /// not decode to exactly one lockup script.
    pub fn from_base58(addr: &str) -> Result<Self, TransactionError> {
        let decoded = bs58::decode(addr)
            .into_vec()
            .map_err(|e| TransactionError::InvalidAddress(format!("{}: {}", addr, e)))?;
        let lockup_script = LockupScript::from_bytes(&decoded)
            .map_err(|e| TransactionError::InvalidAddress(format!("{}: {}", addr, e)))?;
        Ok(Address { lockup_script })
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.lockup_script.to_bytes()).into_string()
    }

    pub fn lockup_script(&self) -> &LockupScript {
        &self.lockup_script
    }
}

impl From<LockupScript> for Address {
    fn from(lockup_script: LockupScript) -> Self {
        Address::new(lockup_script)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl FromStr for Address {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_base58(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_base58(&s).map_err(serde::de::Error::custom)
    }
}
