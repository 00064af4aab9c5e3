//! Lockup scripts: the spending condition attached to an output.

use alph_primitives::codec::{ByteReader, ByteWriter, HashSerde, Serde, SerdeError, SerdeResult};
use alph_primitives::Blake2b;

use crate::hint::ScriptHint;
use crate::unlock::PublicKey;
use crate::TransactionError;

const P2PKH_PREFIX: u8 = 0x00;

/// Condition an input must satisfy to spend an asset output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockupScript {
    /// Pay to public-key hash.
    P2PKH(Blake2b),
}

impl LockupScript {
    pub fn p2pkh(pub_key_hash: Blake2b) -> Self {
        LockupScript::P2PKH(pub_key_hash)
    }

    /// Lock to the Blake2b-256 hash of `public_key`.
    pub fn p2pkh_from_public_key(public_key: &PublicKey) -> Self {
        LockupScript::P2PKH(Blake2b::hash(public_key.as_bytes()))
    }

    /// Owner-derived hint used by output references.
    pub fn script_hint(&self) -> ScriptHint {
        match self {
            LockupScript::P2PKH(pkh) => ScriptHint::from_hash(pkh),
        }
    }

    pub fn serde() -> LockupScriptSerde {
        LockupScriptSerde
    }

    /// Discriminant byte followed by the variant payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        LockupScriptSerde.serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        Ok(LockupScriptSerde.deserialize(bytes)?)
    }
}

/// Tagged-union codec for [`LockupScript`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LockupScriptSerde;

impl Serde<LockupScript> for LockupScriptSerde {
    fn write(&self, value: &LockupScript, writer: &mut ByteWriter) {
        match value {
            LockupScript::P2PKH(pkh) => {
                writer.write_u8(P2PKH_PREFIX);
                HashSerde.write(pkh, writer);
            }
        }
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<LockupScript> {
        match reader.read_u8()? {
            P2PKH_PREFIX => HashSerde.read(reader).map(LockupScript::P2PKH),
            byte => Err(SerdeError::UnknownDiscriminant {
                type_name: "LockupScript",
                byte,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PKH_HEX: &str = "2ae8b19d653f7f6da115c571fddb25f19885379d6a770b2d2a01d7c00c33f005";

    #[test]
    fn test_p2pkh_wire_form() {
        let lockup = LockupScript::p2pkh(Blake2b::from_hex(PKH_HEX).unwrap());
        let bytes = lockup.to_bytes();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 0x00);
        assert_eq!(hex::encode(&bytes[1..]), PKH_HEX);
        assert_eq!(LockupScript::from_bytes(&bytes).unwrap(), lockup);
    }

    #[test]
    fn test_from_public_key() {
        let pk = PublicKey::from_hex(
            "03eb30400ce9d1deed12b84d4161a1fa922ef4185a155ef3ec208078b3807b126f",
        )
        .unwrap();
        let LockupScript::P2PKH(pkh) = LockupScript::p2pkh_from_public_key(&pk);
        assert_eq!(
            pkh.to_hex(),
            "3ba23645bd69c241af4a51962ed119b6286e5193700d8d3c272e6aac1ba34dd9"
        );
    }

    #[test]
    fn test_script_hint() {
        let lockup = LockupScript::p2pkh(Blake2b::from_hex(PKH_HEX).unwrap());
        assert_eq!(lockup.script_hint().value(), 0x5a66314f);
    }

    #[test]
    fn test_unknown_discriminant() {
        let mut bytes = vec![0x02];
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            LockupScriptSerde.deserialize(&bytes),
            Err(SerdeError::UnknownDiscriminant { type_name: "LockupScript", byte: 0x02 })
        ));
    }

    #[test]
    fn test_truncated_payload() {
        assert!(matches!(
            LockupScriptSerde.deserialize(&[0x00, 0x01, 0x02]),
            Err(SerdeError::IncompleteData { .. })
        ));
    }
}
