//! Transfer assembly.
//!
//! Turns a set of destinations and a set of spendable UTXOs into an
//! [`UnsignedTransaction`]. The pipeline is linear and fails fast:
//!
//! 1. compute the ALPH and tokens the destinations need, dust included
//! 2. select UTXOs covering that plus the fee
//! 3. pre-check gas, gas price and inputs
//! 4. build one output per token plus one ALPH output per destination
//! 5. return what is left to the sender as change, dust permitting
//! 6. unlock the first input with the sender's key and the rest with
//!    `SameAsPrevious`
//!
//! All ALPH and token sums use checked arithmetic; overflow and
//! insufficiency surface as distinct [`TransactionError`] variants.

use std::collections::HashSet;

use log::{debug, trace};

use alph_primitives::{GasBox, GasPrice, NetworkId, TimeStamp, U256};

use crate::config::ProtocolConfig;
use crate::error::ChangeShortfall;
use crate::input::TxInput;
use crate::lockup::LockupScript;
use crate::output::AssetOutput;
use crate::output_ref::AssetOutputRef;
use crate::token::TokenId;
use crate::unlock::{PublicKey, UnlockScript};
use crate::unsigned_tx::UnsignedTransaction;
use crate::utxo::{spendable_outputs, AssetOutputInfo};
use crate::utxo_selection::{self, AssetAmounts, AssetOrder, ProvidedGas};
use crate::TransactionError;

/// One destination of a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutputInfo {
    pub lockup_script: LockupScript,
    pub atto_alph_amount: U256,
    pub tokens: Vec<(TokenId, U256)>,
    /// Defaults to [`TimeStamp::ZERO`].
    pub lock_time: Option<TimeStamp>,
    /// Defaults to empty.
    pub additional_data: Option<Vec<u8>>,
}

impl TxOutputInfo {
    pub fn new(lockup_script: LockupScript, atto_alph_amount: U256) -> Self {
        TxOutputInfo {
            lockup_script,
            atto_alph_amount,
            tokens: Vec::new(),
            lock_time: None,
            additional_data: None,
        }
    }

    pub fn with_tokens(mut self, tokens: Vec<(TokenId, U256)>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_lock_time(mut self, lock_time: TimeStamp) -> Self {
        self.lock_time = Some(lock_time);
        self
    }

    pub fn with_additional_data(mut self, data: Vec<u8>) -> Self {
        self.additional_data = Some(data);
        self
    }
}

/// What a set of destinations needs from the sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalAmountNeeded {
    /// ALPH including dust for every output and token change output.
    pub alph: U256,
    /// Token totals in first-seen order.
    pub tokens: Vec<(TokenId, U256)>,
    /// Destination outputs plus one change output per token.
    pub output_count: usize,
}

/// Assembles unsigned transfers for one network under one set of
/// protocol constants.
#[derive(Debug, Clone)]
pub struct TransferBuilder {
    config: ProtocolConfig,
    network_id: NetworkId,
    order: AssetOrder,
}

impl TransferBuilder {
    /// A builder with the default protocol constants.
    pub fn new(network_id: NetworkId) -> Self {
        Self::with_config(network_id, ProtocolConfig::default())
    }

    pub fn with_config(network_id: NetworkId, config: ProtocolConfig) -> Self {
        TransferBuilder {
            config,
            network_id,
            order: AssetOrder::Ascending,
        }
    }

    /// Rank candidate UTXOs in `order` during selection.
    pub fn with_order(mut self, order: AssetOrder) -> Self {
        self.order = order;
        self
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn network_id(&self) -> NetworkId {
        self.network_id
    }

    /// Estimated gas at the configured default gas price.
    pub fn default_gas(&self) -> ProvidedGas {
        ProvidedGas::estimated(self.config.default_gas_price.clone(), None)
    }

    fn dust(&self) -> &U256 {
        &self.config.dust_utxo_amount
    }

    fn dust_times(&self, n: usize) -> Result<U256, TransactionError> {
        self.dust()
            .mul(&U256::from(n as u64))
            .ok_or(TransactionError::OutputAmountOverflow)
    }

    // -----------------------------------------------------------------------
    // Amount computation
    // -----------------------------------------------------------------------

    /// Minimum ALPH and tokens the sender must hold to pay `outputs`.
    ///
    /// Each destination needs one dust amount per token output, plus one
    /// more when its ALPH exceeds the token dust. The sender additionally
    /// reserves one dust amount per distinct token for token change.
    ///
    /// # Returns
    /// The totals, or an overflow error.
    pub fn calculate_total_amount_needed(
        &self,
        outputs: &[TxOutputInfo],
    ) -> Result<TotalAmountNeeded, TransactionError> {
        let mut total_alph = U256::zero();
        let mut total_tokens: Vec<(TokenId, U256)> = Vec::new();
        let mut output_count = 0;

        for info in outputs {
            let token_dust = self.dust_times(info.tokens.len())?;
            let output_len = info.tokens.len() + usize::from(info.atto_alph_amount > token_dust);
            let alph = std::cmp::max(info.atto_alph_amount.clone(), self.dust_times(output_len)?);
            total_alph = total_alph.add(&alph).ok_or(TransactionError::OutputAmountOverflow)?;
            add_tokens(&mut total_tokens, &info.tokens)?;
            output_count += output_len;
        }

        let sender_len = total_tokens.len();
        let alph = total_alph
            .add(&self.dust_times(sender_len)?)
            .ok_or(TransactionError::OutputAmountOverflow)?;
        Ok(TotalAmountNeeded {
            alph,
            tokens: total_tokens,
            output_count: output_count + sender_len,
        })
    }

    // -----------------------------------------------------------------------
    // Assembly
    // -----------------------------------------------------------------------

    /// Build a transfer spending exactly `inputs`.
    ///
    /// # Arguments
    /// * `from_lockup` - The sender's lockup script, used for change.
    /// * `from_unlock` - Unlock script for the first input.
    /// * `inputs` - The outputs to spend with their references.
    /// * `outputs` - Destinations.
    /// * `gas` - Gas amount.
    /// * `gas_price` - Price per unit of gas.
    ///
    /// # Returns
    /// The unsigned transaction with destination outputs followed by change
    /// outputs, or the first check that failed.
    pub fn build_transfer_tx(
        &self,
        from_lockup: &LockupScript,
        from_unlock: &UnlockScript,
        inputs: &[(AssetOutputRef, AssetOutput)],
        outputs: &[TxOutputInfo],
        gas: GasBox,
        gas_price: &GasPrice,
    ) -> Result<UnsignedTransaction, TransactionError> {
        let fee = self.pre_check(inputs, gas, gas_price)?;
        if outputs.is_empty() {
            return Err(TransactionError::NoOutputs);
        }
        for info in outputs {
            self.check_minimal_alph(info)?;
            check_token_values_non_zero(info)?;
        }

        let mut fixed_outputs = Vec::new();
        for info in outputs {
            fixed_outputs.extend(self.build_outputs(info)?);
        }
        let change = self.calculate_change_outputs(from_lockup, inputs, &fixed_outputs, &fee)?;
        trace!(
            "{} destination outputs, {} change outputs, fee {}",
            fixed_outputs.len(),
            change.len(),
            fee
        );
        fixed_outputs.extend(change);

        if fixed_outputs.len() > self.config.max_tx_output_num {
            return Err(TransactionError::TooManyOutputs {
                count: fixed_outputs.len(),
                max: self.config.max_tx_output_num,
            });
        }

        Ok(UnsignedTransaction::new(
            self.network_id,
            gas,
            gas_price.clone(),
            build_inputs(from_unlock, inputs),
            fixed_outputs,
        ))
    }

    /// Select UTXOs owned by `from_public_key` and build a transfer.
    ///
    /// UTXOs locked beyond `now` are ignored and at most the maximum input
    /// count of the largest ones are considered.
    ///
    /// # Arguments
    /// * `from_public_key` - The sender's key; its P2PKH script owns `utxos`.
    /// * `utxos` - The sender's known UTXOs.
    /// * `outputs` - Destinations.
    /// * `provided_gas` - Fixed or estimated gas and the gas price.
    /// * `now` - Current time for lock-time filtering.
    pub fn transfer(
        &self,
        from_public_key: &PublicKey,
        utxos: &[AssetOutputInfo],
        outputs: &[TxOutputInfo],
        provided_gas: &ProvidedGas,
        now: TimeStamp,
    ) -> Result<UnsignedTransaction, TransactionError> {
        let from_lockup = LockupScript::p2pkh_from_public_key(from_public_key);
        let from_unlock = UnlockScript::p2pkh(*from_public_key);

        let needed = self.calculate_total_amount_needed(outputs)?;
        let spendable = spendable_outputs(utxos, now, self.config.max_tx_input_num);
        debug!(
            "transfer of {} ALPH and {} tokens to {} outputs from {} spendable utxos",
            needed.alph,
            needed.tokens.len(),
            outputs.len(),
            spendable.len()
        );

        let selected = utxo_selection::select(
            &AssetAmounts::new(needed.alph, needed.tokens),
            &spendable,
            provided_gas,
            needed.output_count,
            self.order,
            &self.config,
        )?;
        let inputs: Vec<(AssetOutputRef, AssetOutput)> = selected
            .assets
            .into_iter()
            .map(|info| (info.output_ref, info.output))
            .collect();

        let tx = self.build_transfer_tx(
            &from_lockup,
            &from_unlock,
            &inputs,
            outputs,
            selected.gas,
            &provided_gas.gas_price,
        )?;
        debug!(
            "built transaction {} with {} inputs and {} outputs",
            tx.id(),
            tx.input_count(),
            tx.output_count()
        );
        Ok(tx)
    }

    // -----------------------------------------------------------------------
    // Checks
    // -----------------------------------------------------------------------

    /// # Returns
    /// The fee `gas_price * gas`.
    fn pre_check(
        &self,
        inputs: &[(AssetOutputRef, AssetOutput)],
        gas: GasBox,
        gas_price: &GasPrice,
    ) -> Result<U256, TransactionError> {
        if gas < self.config.minimal_gas {
            return Err(TransactionError::GasBelowMinimum {
                gas,
                minimal: self.config.minimal_gas,
            });
        }
        if gas > self.config.maximal_gas_per_tx {
            return Err(TransactionError::GasAboveMaximum {
                gas,
                maximal: self.config.maximal_gas_per_tx,
            });
        }
        if gas_price.value() > &self.config.max_alph_value {
            return Err(TransactionError::GasPriceTooHigh {
                price: gas_price.value().clone(),
                maximal: self.config.max_alph_value.clone(),
            });
        }
        if inputs.len() > self.config.max_tx_input_num {
            return Err(TransactionError::TooManyInputs {
                count: inputs.len(),
                max: self.config.max_tx_input_num,
            });
        }
        let unique: HashSet<&AssetOutputRef> = inputs.iter().map(|(output_ref, _)| output_ref).collect();
        if unique.len() < inputs.len() {
            return Err(TransactionError::DuplicateInputs);
        }
        gas_price.fee(gas).ok_or(TransactionError::FeeOverflow)
    }

    fn check_minimal_alph(&self, info: &TxOutputInfo) -> Result<(), TransactionError> {
        if &info.atto_alph_amount < self.dust() {
            return Err(TransactionError::OutputBelowDust {
                amount: info.atto_alph_amount.clone(),
                dust: self.dust().clone(),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Outputs
    // -----------------------------------------------------------------------

    /// One dust output per token, then the ALPH left over, floored at dust.
    fn build_outputs(&self, info: &TxOutputInfo) -> Result<Vec<AssetOutput>, TransactionError> {
        let lock_time = info.lock_time.unwrap_or(TimeStamp::ZERO);
        let additional_data = info.additional_data.clone().unwrap_or_default();
        let output = |amount: U256, tokens: Vec<(TokenId, U256)>| AssetOutput {
            amount,
            lockup_script: info.lockup_script,
            lock_time,
            tokens,
            additional_data: additional_data.clone(),
        };

        let mut outputs: Vec<AssetOutput> = info
            .tokens
            .iter()
            .map(|token| output(self.dust().clone(), vec![token.clone()]))
            .collect();
        let alph_remaining = info
            .atto_alph_amount
            .saturating_sub(&self.dust_times(info.tokens.len())?);
        if !alph_remaining.is_zero() {
            outputs.push(output(std::cmp::max(alph_remaining, self.dust().clone()), Vec::new()));
        }
        Ok(outputs)
    }

    fn calculate_change_outputs(
        &self,
        from_lockup: &LockupScript,
        inputs: &[(AssetOutputRef, AssetOutput)],
        tx_outputs: &[AssetOutput],
        fee: &U256,
    ) -> Result<Vec<AssetOutput>, TransactionError> {
        let alph = alph_remainder(inputs, tx_outputs, fee)?;
        let tokens = tokens_remainder(inputs, tx_outputs)?;

        if alph.is_zero() && tokens.is_empty() {
            return Ok(Vec::new());
        }

        let token_dust = self.dust_times(tokens.len())?;
        let total_dust = token_dust
            .add(self.dust())
            .ok_or(TransactionError::OutputAmountOverflow)?;

        if alph == token_dust || alph >= total_dust {
            let change = TxOutputInfo::new(*from_lockup, alph).with_tokens(tokens);
            self.build_outputs(&change)
        } else if tokens.is_empty() {
            Err(TransactionError::NotEnoughAlphForChange {
                kind: ChangeShortfall::Alph,
                expected: self.dust().clone(),
                got: alph,
            })
        } else if alph < token_dust {
            Err(TransactionError::NotEnoughAlphForChange {
                kind: ChangeShortfall::Token,
                expected: token_dust,
                got: alph,
            })
        } else {
            Err(TransactionError::NotEnoughAlphForChange {
                kind: ChangeShortfall::AlphAndToken,
                expected: total_dust,
                got: alph,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_token_values_non_zero(info: &TxOutputInfo) -> Result<(), TransactionError> {
    match info.tokens.iter().find(|(_, amount)| amount.is_zero()) {
        Some((token_id, _)) => Err(TransactionError::ZeroTokenAmount(*token_id)),
        None => Ok(()),
    }
}

/// Merge `tokens` into `totals`, keeping first-seen order.
fn add_tokens(totals: &mut Vec<(TokenId, U256)>, tokens: &[(TokenId, U256)]) -> Result<(), TransactionError> {
    for (token_id, amount) in tokens {
        match totals.iter_mut().find(|(id, _)| id == token_id) {
            Some((_, total)) => {
                *total = total
                    .add(amount)
                    .ok_or(TransactionError::TokenAmountOverflow(*token_id))?;
            }
            None => totals.push((*token_id, amount.clone())),
        }
    }
    Ok(())
}

fn alph_remainder(
    inputs: &[(AssetOutputRef, AssetOutput)],
    outputs: &[AssetOutput],
    fee: &U256,
) -> Result<U256, TransactionError> {
    let input_sum = inputs
        .iter()
        .try_fold(U256::zero(), |acc, (_, output)| acc.add(&output.amount))
        .ok_or(TransactionError::InputAmountOverflow)?;
    let output_sum = outputs
        .iter()
        .try_fold(U256::zero(), |acc, output| acc.add(&output.amount))
        .ok_or(TransactionError::OutputAmountOverflow)?;

    let after_outputs = input_sum.sub(&output_sum).ok_or_else(|| TransactionError::NotEnoughBalance {
        available: input_sum.clone(),
        required: output_sum.clone(),
    })?;
    match after_outputs.sub(fee) {
        Some(remainder) => Ok(remainder),
        None => Err(TransactionError::NotEnoughBalance {
            available: input_sum,
            required: output_sum.add(fee).ok_or(TransactionError::OutputAmountOverflow)?,
        }),
    }
}

/// Token change per input token, zero remainders dropped.
fn tokens_remainder(
    inputs: &[(AssetOutputRef, AssetOutput)],
    outputs: &[AssetOutput],
) -> Result<Vec<(TokenId, U256)>, TransactionError> {
    let mut input_totals = Vec::new();
    for (_, output) in inputs {
        add_tokens(&mut input_totals, &output.tokens)?;
    }
    let mut output_totals = Vec::new();
    for output in outputs {
        add_tokens(&mut output_totals, &output.tokens)?;
    }

    let new_tokens: Vec<TokenId> = output_totals
        .iter()
        .map(|(id, _)| *id)
        .filter(|id| !input_totals.iter().any(|(input_id, _)| input_id == id))
        .collect();
    if !new_tokens.is_empty() {
        return Err(TransactionError::NewTokensInOutputs(new_tokens));
    }

    let mut remainder = Vec::new();
    for (token_id, input_amount) in input_totals {
        let output_amount = output_totals
            .iter()
            .find(|(id, _)| *id == token_id)
            .map(|(_, amount)| amount.clone())
            .unwrap_or_default();
        let left = input_amount
            .sub(&output_amount)
            .ok_or_else(|| TransactionError::NotEnoughTokenBalance {
                token_id,
                available: input_amount.clone(),
                required: output_amount.clone(),
            })?;
        if !left.is_zero() {
            remainder.push((token_id, left));
        }
    }
    Ok(remainder)
}

fn build_inputs(from_unlock: &UnlockScript, inputs: &[(AssetOutputRef, AssetOutput)]) -> Vec<TxInput> {
    inputs
        .iter()
        .enumerate()
        .map(|(index, (output_ref, _))| {
            let unlock_script = if index == 0 {
                *from_unlock
            } else {
                UnlockScript::SameAsPrevious
            };
            TxInput::new(*output_ref, unlock_script)
        })
        .collect()
}
