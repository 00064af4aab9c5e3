//! Known UTXOs and their provenance.

use alph_primitives::{TimeStamp, U256};

use crate::output::AssetOutput;
use crate::output_ref::AssetOutputRef;

/// Where a UTXO was seen, from most to least trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputType {
    /// Confirmed in a persisted block.
    PersistedOutput,
    /// In a block that is not yet persisted.
    UnpersistedBlockOutput,
    /// Only in the mempool.
    MemPoolOutput,
}

impl OutputType {
    /// Selection tie-break level; lower is preferred.
    pub fn cached_level(&self) -> u8 {
        match self {
            OutputType::PersistedOutput => 0,
            OutputType::UnpersistedBlockOutput => 1,
            OutputType::MemPoolOutput => 2,
        }
    }
}

/// A spendable asset output together with its reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetOutputInfo {
    pub output_ref: AssetOutputRef,
    pub output: AssetOutput,
    pub output_type: OutputType,
}

impl AssetOutputInfo {
    pub fn new(output_ref: AssetOutputRef, output: AssetOutput, output_type: OutputType) -> Self {
        AssetOutputInfo {
            output_ref,
            output,
            output_type,
        }
    }

    pub fn amount(&self) -> &U256 {
        &self.output.amount
    }

    pub fn has_tokens(&self) -> bool {
        self.output.has_tokens()
    }
}

/// UTXOs that can be spent at `now`.
///
/// Drops outputs whose lock time lies in the future, orders the rest by
/// ALPH amount from largest to smallest and keeps at most `limit` of them.
pub fn spendable_outputs(
    utxos: &[AssetOutputInfo],
    now: TimeStamp,
    limit: usize,
) -> Vec<AssetOutputInfo> {
    let mut spendable: Vec<AssetOutputInfo> = utxos
        .iter()
        .filter(|utxo| utxo.output.lock_time <= now)
        .cloned()
        .collect();
    spendable.sort_by(|a, b| b.output.amount.cmp(&a.output.amount));
    spendable.truncate(limit);
    spendable
}

/// Sum of the ALPH amounts, `None` on overflow.
pub fn total_amount(utxos: &[AssetOutputInfo]) -> Option<U256> {
    utxos
        .iter()
        .try_fold(U256::zero(), |acc, utxo| acc.add(&utxo.output.amount))
}
