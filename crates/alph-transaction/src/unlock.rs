//! Unlock scripts: the proof an input supplies to spend an output.

use std::fmt;

use alph_primitives::codec::{ByteReader, ByteWriter, Serde, SerdeError, SerdeResult};

use crate::TransactionError;

/// Size of a compressed secp256k1 public key.
pub const PUBLIC_KEY_SIZE: usize = 33;

const P2PKH_PREFIX: u8 = 0x00;
const SAME_AS_PREVIOUS_PREFIX: u8 = 0x03;

/// A 33-byte compressed public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    pub fn new(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        PublicKey(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TransactionError> {
        let arr: [u8; PUBLIC_KEY_SIZE] = bytes.try_into().map_err(|_| {
            alph_primitives::PrimitivesError::InvalidLength {
                expected: PUBLIC_KEY_SIZE,
                got: bytes.len(),
            }
        })?;
        Ok(PublicKey(arr))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Proof of authority carried by a transaction input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnlockScript {
    /// Reveal the public key whose hash the output is locked to.
    P2PKH(PublicKey),
    /// Reuse the unlock proof of the preceding input.
    SameAsPrevious,
}

impl UnlockScript {
    pub fn p2pkh(public_key: PublicKey) -> Self {
        UnlockScript::P2PKH(public_key)
    }

    pub fn serde() -> UnlockScriptSerde {
        UnlockScriptSerde
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        UnlockScriptSerde.serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        Ok(UnlockScriptSerde.deserialize(bytes)?)
    }
}

/// Tagged-union codec for [`UnlockScript`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlockScriptSerde;

impl Serde<UnlockScript> for UnlockScriptSerde {
    fn write(&self, value: &UnlockScript, writer: &mut ByteWriter) {
        match value {
            UnlockScript::P2PKH(pk) => {
                writer.write_u8(P2PKH_PREFIX);
                writer.write_bytes(pk.as_bytes());
            }
            UnlockScript::SameAsPrevious => writer.write_u8(SAME_AS_PREVIOUS_PREFIX),
        }
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<UnlockScript> {
        match reader.read_u8()? {
            P2PKH_PREFIX => reader
                .read_array::<PUBLIC_KEY_SIZE>()
                .map(|bytes| UnlockScript::P2PKH(PublicKey(bytes))),
            SAME_AS_PREVIOUS_PREFIX => Ok(UnlockScript::SameAsPrevious),
            byte => Err(SerdeError::UnknownDiscriminant {
                type_name: "UnlockScript",
                byte,
            }),
        }
    }
}
