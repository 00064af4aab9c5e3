//! UTXO selection.
//!
//! UTXOs are ranked by provenance first: confirmed outputs are picked before
//! outputs only seen in unpersisted blocks or the mempool. Among equally
//! trusted outputs smaller amounts go first. Tokens are selected one token at
//! a time, then ALPH is topped up preferring outputs that carry no tokens.

use std::cmp::Ordering;

use log::{debug, trace};

use alph_primitives::{GasBox, GasEstimationMultiplier, GasPrice, U256};

use crate::config::ProtocolConfig;
use crate::gas_estimation;
use crate::token::TokenId;
use crate::utxo::AssetOutputInfo;
use crate::TransactionError;

/// ALPH and token amounts a selection must cover.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetAmounts {
    pub alph: U256,
    pub tokens: Vec<(TokenId, U256)>,
}

impl AssetAmounts {
    pub fn new(alph: U256, tokens: Vec<(TokenId, U256)>) -> Self {
        AssetAmounts { alph, tokens }
    }
}

/// Final selection result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected {
    pub assets: Vec<AssetOutputInfo>,
    pub gas: GasBox,
}

/// Intermediate result before gas is settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSoFar {
    /// ALPH total of `selected`.
    pub alph: U256,
    pub selected: Vec<AssetOutputInfo>,
    /// Candidates not selected, in preference order.
    pub rest: Vec<AssetOutputInfo>,
}

/// Gas settings supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidedGas {
    /// Fixed gas amount; estimated from the selection when `None`.
    pub gas: Option<GasBox>,
    pub gas_price: GasPrice,
    /// Applied to estimated gas only.
    pub multiplier: Option<GasEstimationMultiplier>,
}

impl ProvidedGas {
    pub fn fixed(gas: GasBox, gas_price: GasPrice) -> Self {
        ProvidedGas {
            gas: Some(gas),
            gas_price,
            multiplier: None,
        }
    }

    pub fn estimated(gas_price: GasPrice, multiplier: Option<GasEstimationMultiplier>) -> Self {
        ProvidedGas {
            gas: None,
            gas_price,
            multiplier,
        }
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Direction in which candidates are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetOrder {
    #[default]
    Ascending,
    Descending,
}

impl AssetOrder {
    /// Rank by provenance level, then ALPH amount.
    pub fn by_alph(&self, x: &AssetOutputInfo, y: &AssetOutputInfo) -> Ordering {
        let ordering = ascending_by_alph(x, y);
        match self {
            AssetOrder::Ascending => ordering,
            AssetOrder::Descending => ordering.reverse(),
        }
    }

    /// Rank holders of `token_id` before non-holders; holders by provenance
    /// level, then token amount, then [`by_alph`](Self::by_alph).
    pub fn by_token(&self, token_id: &TokenId, x: &AssetOutputInfo, y: &AssetOutputInfo) -> Ordering {
        let ordering = ascending_by_token(token_id, x, y);
        match self {
            AssetOrder::Ascending => ordering,
            AssetOrder::Descending => ordering.reverse(),
        }
    }
}

fn ascending_by_alph(x: &AssetOutputInfo, y: &AssetOutputInfo) -> Ordering {
    x.output_type
        .cached_level()
        .cmp(&y.output_type.cached_level())
        .then_with(|| x.output.amount.cmp(&y.output.amount))
}

fn ascending_by_token(token_id: &TokenId, x: &AssetOutputInfo, y: &AssetOutputInfo) -> Ordering {
    match (x.output.token_amount(token_id), y.output.token_amount(token_id)) {
        (Some(tx), Some(ty)) => x
            .output_type
            .cached_level()
            .cmp(&y.output_type.cached_level())
            .then_with(|| tx.cmp(ty))
            .then_with(|| ascending_by_alph(x, y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => ascending_by_alph(x, y),
    }
}

// ---------------------------------------------------------------------------
// Selection without gas
// ---------------------------------------------------------------------------

enum AmountShortfall {
    Insufficient { available: U256, required: U256 },
    Overflow,
}

type Split = (Vec<AssetOutputInfo>, Vec<AssetOutputInfo>);

/// Take a prefix of `sorted` whose amounts sum to at least `amount`.
fn select_for_amount<F>(amount: &U256, sorted: Vec<AssetOutputInfo>, get_amount: F) -> Result<Split, AmountShortfall>
where
    F: Fn(&AssetOutputInfo) -> U256,
{
    if amount.is_zero() {
        return Ok((Vec::new(), sorted));
    }

    let mut sum = U256::zero();
    let mut taken = 0;
    for utxo in &sorted {
        if sum >= *amount {
            break;
        }
        sum = sum.add(&get_amount(utxo)).ok_or(AmountShortfall::Overflow)?;
        taken += 1;
    }

    if sum < *amount {
        return Err(AmountShortfall::Insufficient {
            available: sum,
            required: amount.clone(),
        });
    }
    let mut selected = sorted;
    let rest = selected.split_off(taken);
    Ok((selected, rest))
}

/// Total of `token_id` across every entry of every output in `utxos`.
fn token_total(utxos: &[AssetOutputInfo], token_id: &TokenId) -> Result<U256, TransactionError> {
    utxos
        .iter()
        .flat_map(|utxo| utxo.output.tokens.iter())
        .filter(|(id, _)| id == token_id)
        .try_fold(U256::zero(), |acc, (_, amount)| acc.add(amount))
        .ok_or(TransactionError::TokenAmountOverflow(*token_id))
}

/// Sum of the ALPH amounts of `utxos`.
fn alph_total(utxos: &[AssetOutputInfo]) -> Result<U256, TransactionError> {
    crate::utxo::total_amount(utxos).ok_or(TransactionError::InputAmountOverflow)
}

/// Covers the requested amounts without accounting for gas.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionWithoutGasEstimation {
    pub order: AssetOrder,
}

impl SelectionWithoutGasEstimation {
    pub fn new(order: AssetOrder) -> Self {
        SelectionWithoutGasEstimation { order }
    }

    /// Select UTXOs covering `amounts`.
    ///
    /// # Arguments
    /// * `amounts` - ALPH and token amounts to cover.
    /// * `utxos` - Candidate outputs.
    ///
    /// # Returns
    /// The selected outputs with their ALPH total and the unselected rest,
    /// or an insufficiency error naming the missing asset.
    pub fn select(&self, amounts: &AssetAmounts, utxos: &[AssetOutputInfo]) -> Result<SelectedSoFar, TransactionError> {
        let (for_tokens, remaining) = self.select_for_tokens(&amounts.tokens, utxos.to_vec())?;

        let alph_from_tokens = alph_total(&for_tokens)?;
        let alph_to_select = amounts.alph.saturating_sub(&alph_from_tokens);
        trace!(
            "{} utxos cover tokens with {} ALPH, {} ALPH left to select",
            for_tokens.len(),
            alph_from_tokens,
            alph_to_select
        );

        let (for_alph, rest) = select_for_amount(&alph_to_select, self.sort_alph(remaining), |utxo| {
            utxo.output.amount.clone()
        })
        .map_err(|e| match e {
            AmountShortfall::Insufficient { available, required } => {
                TransactionError::NotEnoughBalance { available, required }
            }
            AmountShortfall::Overflow => TransactionError::InputAmountOverflow,
        })?;

        let mut selected = for_tokens;
        selected.extend(for_alph);
        let alph = alph_total(&selected)?;
        Ok(SelectedSoFar { alph, selected, rest })
    }

    /// Token-free outputs first, each group in ALPH order.
    fn sort_alph(&self, utxos: Vec<AssetOutputInfo>) -> Vec<AssetOutputInfo> {
        let (mut plain, mut with_tokens): Split = utxos.into_iter().partition(|utxo| !utxo.has_tokens());
        plain.sort_by(|x, y| self.order.by_alph(x, y));
        with_tokens.sort_by(|x, y| self.order.by_alph(x, y));
        plain.extend(with_tokens);
        plain
    }

    fn select_for_tokens(
        &self,
        tokens: &[(TokenId, U256)],
        mut rest: Vec<AssetOutputInfo>,
    ) -> Result<Split, TransactionError> {
        let mut selected: Vec<AssetOutputInfo> = Vec::new();
        for (token_id, amount) in tokens {
            let already = token_total(&selected, token_id)?;
            let remaining = amount.saturating_sub(&already);
            rest.sort_by(|x, y| self.order.by_token(token_id, x, y));

            let (found, left) = select_for_amount(&remaining, rest, |utxo| {
                utxo.output.token_amount(token_id).cloned().unwrap_or_default()
            })
            .map_err(|e| match e {
                AmountShortfall::Insufficient { available, required } => {
                    TransactionError::NotEnoughTokenBalance {
                        token_id: *token_id,
                        available: available.add(&already).unwrap_or_else(U256::max_value),
                        required: amount.clone(),
                    }
                }
                AmountShortfall::Overflow => TransactionError::TokenAmountOverflow(*token_id),
            })?;
            trace!("selected {} utxos for token {}", found.len(), token_id);
            selected.extend(found);
            rest = left;
        }
        Ok((selected, rest))
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Select UTXOs covering `amounts` plus the transaction fee.
///
/// With a fixed gas amount the fee is known up front and a single ordered
/// selection covers `amounts.alph + fee`. Without one, gas is estimated
/// from the growing selection (see [`gas_estimation::select_with_estimation`]).
///
/// # Arguments
/// * `amounts` - ALPH and token amounts the outputs need.
/// * `utxos` - Candidate outputs.
/// * `provided_gas` - Gas amount, price and estimation multiplier.
/// * `output_count` - Number of outputs the transaction will have before ALPH change.
/// * `order` - Ranking direction.
/// * `config` - Protocol constants.
pub fn select(
    amounts: &AssetAmounts,
    utxos: &[AssetOutputInfo],
    provided_gas: &ProvidedGas,
    output_count: usize,
    order: AssetOrder,
    config: &ProtocolConfig,
) -> Result<Selected, TransactionError> {
    let selected = match provided_gas.gas {
        Some(gas) => {
            let fee = provided_gas.gas_price.fee(gas).ok_or(TransactionError::FeeOverflow)?;
            let with_fee = AssetAmounts {
                alph: amounts.alph.add(&fee).ok_or(TransactionError::OutputAmountOverflow)?,
                tokens: amounts.tokens.clone(),
            };
            let so_far = SelectionWithoutGasEstimation::new(order).select(&with_fee, utxos)?;
            Selected {
                assets: so_far.selected,
                gas,
            }
        }
        None => gas_estimation::select_with_estimation(amounts, utxos, provided_gas, output_count, order, config)?,
    };
    debug!(
        "selected {} of {} utxos, gas {}",
        selected.assets.len(),
        utxos.len(),
        selected.gas
    );
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lockup::LockupScript;
    use crate::output::AssetOutput;
    use crate::output_ref::AssetOutputRef;
    use crate::utxo::OutputType;
    use alph_primitives::Blake2b;

    fn token(seed: &[u8]) -> TokenId {
        TokenId::new(Blake2b::hash(seed))
    }

    fn utxo(seed: u8, amount: u64, tokens: Vec<(TokenId, u64)>, output_type: OutputType) -> AssetOutputInfo {
        let lockup = LockupScript::p2pkh(Blake2b::hash(b"owner"));
        let tokens = tokens.into_iter().map(|(id, n)| (id, U256::from(n))).collect();
        AssetOutputInfo::new(
            AssetOutputRef::from_lockup(&lockup, Blake2b::hash(&[seed])),
            AssetOutput::new(U256::from(amount), lockup).with_tokens(tokens),
            output_type,
        )
    }

    fn plain(seed: u8, amount: u64) -> AssetOutputInfo {
        utxo(seed, amount, vec![], OutputType::PersistedOutput)
    }

    fn amounts_of(assets: &[AssetOutputInfo]) -> Vec<u64> {
        assets.iter().map(|u| u.amount().to_u64().unwrap()).collect()
    }

    #[test]
    fn test_smallest_first() {
        let utxos = vec![plain(1, 50), plain(2, 10), plain(3, 30), plain(4, 20)];
        let so_far = SelectionWithoutGasEstimation::default()
            .select(&AssetAmounts::new(U256::from(35u64), vec![]), &utxos)
            .unwrap();
        assert_eq!(amounts_of(&so_far.selected), vec![10, 20, 30]);
        assert_eq!(so_far.alph, U256::from(60u64));
        assert_eq!(amounts_of(&so_far.rest), vec![50]);
    }

    #[test]
    fn test_confirmed_outputs_preferred() {
        let utxos = vec![
            utxo(1, 5, vec![], OutputType::MemPoolOutput),
            utxo(2, 40, vec![], OutputType::PersistedOutput),
            utxo(3, 1, vec![], OutputType::UnpersistedBlockOutput),
        ];
        let so_far = SelectionWithoutGasEstimation::default()
            .select(&AssetAmounts::new(U256::from(40u64), vec![]), &utxos)
            .unwrap();
        assert_eq!(amounts_of(&so_far.selected), vec![40]);
    }

    #[test]
    fn test_descending_order_reverses_ranking() {
        let utxos = vec![plain(1, 10), plain(2, 30), plain(3, 20)];
        let so_far = SelectionWithoutGasEstimation::new(AssetOrder::Descending)
            .select(&AssetAmounts::new(U256::from(25u64), vec![]), &utxos)
            .unwrap();
        assert_eq!(amounts_of(&so_far.selected), vec![30]);
    }

    #[test]
    fn test_token_free_outputs_preferred_for_alph() {
        let t = token(b"t");
        let utxos = vec![utxo(1, 5, vec![(t, 1)], OutputType::PersistedOutput), plain(2, 8)];
        let so_far = SelectionWithoutGasEstimation::default()
            .select(&AssetAmounts::new(U256::from(6u64), vec![]), &utxos)
            .unwrap();
        assert_eq!(amounts_of(&so_far.selected), vec![8]);
    }

    #[test]
    fn test_tokens_selected_before_alph() {
        let t = token(b"t");
        let utxos = vec![
            plain(1, 100),
            utxo(2, 3, vec![(t, 7)], OutputType::PersistedOutput),
            utxo(3, 4, vec![(t, 2)], OutputType::PersistedOutput),
        ];
        let so_far = SelectionWithoutGasEstimation::default()
            .select(&AssetAmounts::new(U256::from(10u64), vec![(t, U256::from(5u64))]), &utxos)
            .unwrap();
        // token pass takes 2 then 7; their 7 ALPH leaves 3 to select
        assert_eq!(amounts_of(&so_far.selected), vec![4, 3, 100]);
        assert!(so_far.rest.is_empty());
    }

    #[test]
    fn test_token_already_covered_by_earlier_pass() {
        let a = token(b"a");
        let b = token(b"b");
        let utxos = vec![
            utxo(1, 1, vec![(a, 5), (b, 5)], OutputType::PersistedOutput),
            utxo(2, 1, vec![(b, 1)], OutputType::PersistedOutput),
        ];
        let so_far = SelectionWithoutGasEstimation::default()
            .select(
                &AssetAmounts::new(U256::zero(), vec![(a, U256::from(5u64)), (b, U256::from(4u64))]),
                &utxos,
            )
            .unwrap();
        assert_eq!(so_far.selected.len(), 1);
    }

    #[test]
    fn test_insufficient_alph() {
        let utxos = vec![plain(1, 10), plain(2, 20)];
        let err = SelectionWithoutGasEstimation::default()
            .select(&AssetAmounts::new(U256::from(31u64), vec![]), &utxos)
            .unwrap_err();
        match err {
            TransactionError::NotEnoughBalance { available, required } => {
                assert_eq!(available, U256::from(30u64));
                assert_eq!(required, U256::from(31u64));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_insufficient_token() {
        let t = token(b"t");
        let utxos = vec![utxo(1, 10, vec![(t, 3)], OutputType::PersistedOutput)];
        let err = SelectionWithoutGasEstimation::default()
            .select(&AssetAmounts::new(U256::zero(), vec![(t, U256::from(4u64))]), &utxos)
            .unwrap_err();
        assert!(matches!(
            err,
            TransactionError::NotEnoughTokenBalance { token_id, .. } if token_id == t
        ));
        assert_eq!(err.shortfall(), Some(U256::from(1u64)));
    }

    #[test]
    fn test_zero_amount_selects_nothing() {
        let utxos = vec![plain(1, 10)];
        let so_far = SelectionWithoutGasEstimation::default()
            .select(&AssetAmounts::default(), &utxos)
            .unwrap();
        assert!(so_far.selected.is_empty());
        assert_eq!(so_far.rest.len(), 1);
    }

    #[test]
    fn test_select_with_fixed_gas_adds_fee() {
        let utxos = vec![plain(1, 100), plain(2, 60)];
        let provided = ProvidedGas::fixed(GasBox::unchecked(2), GasPrice::new(U256::from(5u64)));
        let selected = select(
            &AssetAmounts::new(U256::from(55u64), vec![]),
            &utxos,
            &provided,
            1,
            AssetOrder::Ascending,
            &ProtocolConfig::default(),
        )
        .unwrap();
        // 55 + 10 fee does not fit in 60
        assert_eq!(amounts_of(&selected.assets), vec![60, 100]);
        assert_eq!(selected.gas, GasBox::unchecked(2));
    }
}
