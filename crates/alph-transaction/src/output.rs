//! Transaction outputs.

use alph_primitives::codec::{
    tuple2, ByteReader, ByteVecSerde, ByteWriter, ListSerde, Serde, SerdeResult, TimeStampSerde,
    U256Serde,
};
use alph_primitives::{TimeStamp, U256};

use crate::hint::Hint;
use crate::lockup::{LockupScript, LockupScriptSerde};
use crate::token::TokenId;
use crate::TransactionError;

/// An output holding ALPH and tokens, spendable by its lockup script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetOutput {
    /// attoALPH carried by the output.
    pub amount: U256,
    pub lockup_script: LockupScript,
    /// The output cannot be spent before this time.
    pub lock_time: TimeStamp,
    /// Token balances in insertion order; duplicates are kept as given.
    pub tokens: Vec<(TokenId, U256)>,
    pub additional_data: Vec<u8>,
}

impl AssetOutput {
    /// An unlocked ALPH-only output with no additional data.
    pub fn new(amount: U256, lockup_script: LockupScript) -> Self {
        AssetOutput {
            amount,
            lockup_script,
            lock_time: TimeStamp::ZERO,
            tokens: Vec::new(),
            additional_data: Vec::new(),
        }
    }

    pub fn with_tokens(mut self, tokens: Vec<(TokenId, U256)>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_lock_time(mut self, lock_time: TimeStamp) -> Self {
        self.lock_time = lock_time;
        self
    }

    pub fn with_additional_data(mut self, data: Vec<u8>) -> Self {
        self.additional_data = data;
        self
    }

    pub fn hint(&self) -> Hint {
        Hint::of_asset(self.lockup_script.script_hint())
    }

    pub fn has_tokens(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Amount of `token_id` held, taken from its first entry.
    pub fn token_amount(&self, token_id: &TokenId) -> Option<&U256> {
        self.tokens.iter().find(|(id, _)| id == token_id).map(|(_, amount)| amount)
    }

    pub fn serde() -> AssetOutputSerde {
        AssetOutputSerde
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        AssetOutputSerde.serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        Ok(AssetOutputSerde.deserialize(bytes)?)
    }
}

/// Codec for [`AssetOutput`]: amount, lockup script, lock time, tokens,
/// additional data.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetOutputSerde;

impl Serde<AssetOutput> for AssetOutputSerde {
    fn write(&self, value: &AssetOutput, writer: &mut ByteWriter) {
        U256Serde.write(&value.amount, writer);
        LockupScriptSerde.write(&value.lockup_script, writer);
        TimeStampSerde.write(&value.lock_time, writer);
        ListSerde(tuple2(TokenId::serde(), U256Serde)).write(&value.tokens, writer);
        ByteVecSerde.write(&value.additional_data, writer);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<AssetOutput> {
        let amount = U256Serde.read(reader)?;
        let lockup_script = LockupScriptSerde.read(reader)?;
        let lock_time = TimeStampSerde.read(reader)?;
        let tokens = ListSerde(tuple2(TokenId::serde(), U256Serde)).read(reader)?;
        let additional_data = ByteVecSerde.read(reader)?;
        Ok(AssetOutput {
            amount,
            lockup_script,
            lock_time,
            tokens,
            additional_data,
        })
    }
}

/// Output of a transaction. Only asset outputs are built here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOutput {
    Asset(AssetOutput),
}

impl TxOutput {
    pub fn amount(&self) -> &U256 {
        match self {
            TxOutput::Asset(o) => &o.amount,
        }
    }

    pub fn tokens(&self) -> &[(TokenId, U256)] {
        match self {
            TxOutput::Asset(o) => &o.tokens,
        }
    }

    pub fn hint(&self) -> Hint {
        match self {
            TxOutput::Asset(o) => o.hint(),
        }
    }

    pub fn is_asset(&self) -> bool {
        matches!(self, TxOutput::Asset(_))
    }

    pub fn is_contract(&self) -> bool {
        !self.is_asset()
    }
}

impl From<AssetOutput> for TxOutput {
    fn from(output: AssetOutput) -> Self {
        TxOutput::Asset(output)
    }
}
