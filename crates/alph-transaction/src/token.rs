//! Token identifier type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use alph_primitives::codec::{HashSerde, Serde, SerdeExt};
use alph_primitives::Blake2b;

use crate::TransactionError;

/// Identifier of a secondary asset, a Blake2b-256 digest.
///
/// Renders and serializes to JSON as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(Blake2b);

impl TokenId {
    pub fn new(hash: Blake2b) -> Self {
        TokenId(hash)
    }

    /// Parse a 64-character hex token id.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        Ok(TokenId(Blake2b::from_hex(hex_str)?))
    }

    pub fn hash(&self) -> &Blake2b {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// 32 raw bytes on the wire.
    pub fn serde() -> impl Serde<TokenId> {
        HashSerde.xmap(TokenId, |id: &TokenId| id.0)
    }
}

impl From<Blake2b> for TokenId {
    fn from(hash: Blake2b) -> Self {
        TokenId(hash)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({})", self.0)
    }
}

impl FromStr for TokenId {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenId::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_HEX: &str = "1a281053ba8601a658368594da034c2e99a0fb951b86498d05e76aedfe666800";

    #[test]
    fn test_hex_roundtrip() {
        let id = TokenId::from_hex(ID_HEX).unwrap();
        assert_eq!(id.to_hex(), ID_HEX);
        assert_eq!(id.to_string(), ID_HEX);
        assert_eq!(ID_HEX.parse::<TokenId>().unwrap(), id);
    }

    #[test]
    fn test_invalid_hex() {
        assert!(TokenId::from_hex("zz").is_err());
        assert!(TokenId::from_hex("00ff").is_err());
    }

    #[test]
    fn test_wire_is_raw_digest() {
        let id = TokenId::from_hex(ID_HEX).unwrap();
        let bytes = TokenId::serde().serialize(&id);
        assert_eq!(hex::encode(&bytes), ID_HEX);
        assert_eq!(TokenId::serde().deserialize(&bytes).unwrap(), id);
    }

    #[test]
    fn test_json_is_hex_string() {
        let id = TokenId::from_hex(ID_HEX).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", ID_HEX));
        assert_eq!(serde_json::from_str::<TokenId>(&json).unwrap(), id);
    }
}
