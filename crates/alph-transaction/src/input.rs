//! Transaction inputs.

use alph_primitives::codec::{for_product2, Serde};

use crate::output_ref::AssetOutputRef;
use crate::unlock::{UnlockScript, UnlockScriptSerde};
use crate::TransactionError;

/// Spends the asset output at `output_ref` with `unlock_script`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInput {
    pub output_ref: AssetOutputRef,
    pub unlock_script: UnlockScript,
}

impl TxInput {
    pub fn new(output_ref: AssetOutputRef, unlock_script: UnlockScript) -> Self {
        TxInput {
            output_ref,
            unlock_script,
        }
    }

    /// Output reference first, then the unlock script.
    pub fn serde() -> impl Serde<TxInput> {
        for_product2(
            TxInput::new,
            |input: &TxInput| (input.output_ref, input.unlock_script),
            AssetOutputRef::serde(),
            UnlockScriptSerde,
        )
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        Self::serde().serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        Ok(Self::serde().deserialize(bytes)?)
    }
}
