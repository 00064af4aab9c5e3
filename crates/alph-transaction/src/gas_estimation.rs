//! Gas estimation for P2PKH transfers.

use log::{debug, trace};

use alph_primitives::{GasBox, GasEstimationMultiplier};

use crate::config::ProtocolConfig;
use crate::utxo::AssetOutputInfo;
use crate::utxo_selection::{AssetAmounts, AssetOrder, ProvidedGas, Selected, SelectionWithoutGasEstimation};
use crate::TransactionError;

/// Gas for a transfer spending `input_count` P2PKH inputs into
/// `output_count` outputs.
///
/// Only the first input pays for unlocking; later inputs reuse its proof.
/// The result is at least the protocol minimum and is scaled by
/// `multiplier` when one is given.
///
/// # Returns
/// `GasEstimateTooLarge` when the estimate exceeds the per-transaction maximum.
pub fn estimate_gas(
    input_count: usize,
    output_count: usize,
    multiplier: Option<GasEstimationMultiplier>,
    config: &ProtocolConfig,
) -> Result<GasBox, TransactionError> {
    let gas = &config.gas;
    let raw = u64::from(gas.tx_base_gas.value())
        + input_count as u64 * u64::from(gas.input_base_gas.value())
        + u64::from(gas.p2pk_unlock_gas.value())
        + output_count as u64 * u64::from(gas.output_base_gas.value());
    let estimated = raw.max(u64::from(config.minimal_gas.value()));

    let too_large = || TransactionError::GasEstimateTooLarge {
        estimated,
        maximal: config.maximal_gas_per_tx,
    };
    let base = u32::try_from(estimated).ok().and_then(GasBox::new).ok_or_else(too_large)?;
    let gas_box = match multiplier {
        Some(m) => m.apply(base).ok_or_else(too_large)?,
        None => base,
    };
    if gas_box > config.maximal_gas_per_tx {
        return Err(TransactionError::GasEstimateTooLarge {
            estimated: u64::from(gas_box.value()),
            maximal: config.maximal_gas_per_tx,
        });
    }
    trace!("estimated gas {} for {} inputs, {} outputs", gas_box, input_count, output_count);
    Ok(gas_box)
}

/// Select UTXOs while estimating gas from the selection itself.
///
/// Starts from a selection covering `amounts` alone, then adds the next
/// ranked candidate one at a time until the selected ALPH also covers the
/// fee for the current input count.
///
/// # Arguments
/// * `amounts` - ALPH and token amounts the outputs need.
/// * `utxos` - Candidate outputs.
/// * `provided_gas` - Gas price and optional multiplier; the gas amount is ignored.
/// * `output_count` - Outputs before ALPH change; one change output is added.
/// * `order` - Ranking direction.
/// * `config` - Protocol constants.
pub fn select_with_estimation(
    amounts: &AssetAmounts,
    utxos: &[AssetOutputInfo],
    provided_gas: &ProvidedGas,
    output_count: usize,
    order: AssetOrder,
    config: &ProtocolConfig,
) -> Result<Selected, TransactionError> {
    let so_far = SelectionWithoutGasEstimation::new(order).select(amounts, utxos)?;
    let outputs = output_count + 1;

    let mut selected = so_far.selected;
    let mut alph = so_far.alph;
    let mut rest = so_far.rest.into_iter();
    loop {
        let gas = estimate_gas(selected.len().max(1), outputs, provided_gas.multiplier, config)?;
        let fee = provided_gas.gas_price.fee(gas).ok_or(TransactionError::FeeOverflow)?;
        let required = amounts.alph.add(&fee).ok_or(TransactionError::OutputAmountOverflow)?;
        if alph >= required && !selected.is_empty() {
            debug!("gas estimated at {} for {} inputs", gas, selected.len());
            return Ok(Selected { assets: selected, gas });
        }
        match rest.next() {
            Some(next) => {
                alph = alph.add(&next.output.amount).ok_or(TransactionError::InputAmountOverflow)?;
                selected.push(next);
            }
            None => {
                return Err(TransactionError::NotEnoughBalance {
                    available: alph,
                    required,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lockup::LockupScript;
    use crate::output::AssetOutput;
    use crate::output_ref::AssetOutputRef;
    use crate::utxo::OutputType;
    use alph_primitives::{Blake2b, GasPrice, U256};

    fn plain(seed: u8, amount: u64) -> AssetOutputInfo {
        let lockup = LockupScript::p2pkh(Blake2b::hash(b"owner"));
        AssetOutputInfo::new(
            AssetOutputRef::from_lockup(&lockup, Blake2b::hash(&[seed])),
            AssetOutput::new(U256::from(amount), lockup),
            OutputType::PersistedOutput,
        )
    }

    #[test]
    fn test_minimal_gas_floor() {
        let config = ProtocolConfig::default();
        // 1000 + 2000 + 2060 + 2 * 4500 = 14060
        assert_eq!(estimate_gas(1, 2, None, &config).unwrap(), GasBox::unchecked(20_000));
    }

    #[test]
    fn test_linear_growth() {
        let config = ProtocolConfig::default();
        // 1000 + 5 * 2000 + 2060 + 3 * 4500 = 26560
        assert_eq!(estimate_gas(5, 3, None, &config).unwrap(), GasBox::unchecked(26_560));
    }

    #[test]
    fn test_multiplier_scales_estimate() {
        let config = ProtocolConfig::default();
        let m = GasEstimationMultiplier::from_hundredths(150);
        assert_eq!(estimate_gas(1, 2, m, &config).unwrap(), GasBox::unchecked(30_000));
    }

    #[test]
    fn test_estimate_above_maximum() {
        let config = ProtocolConfig::default();
        assert!(matches!(
            estimate_gas(3000, 2, None, &config),
            Err(TransactionError::GasEstimateTooLarge { .. })
        ));
    }

    #[test]
    fn test_multiplier_pushes_estimate_above_maximum() {
        let config = ProtocolConfig::default();
        // 1000 + 2000 * 2000 + 2060 + 2 * 4500 = 4_012_060, doubled past 5_000_000
        assert!(estimate_gas(2000, 2, None, &config).is_ok());
        let m = GasEstimationMultiplier::from_hundredths(200);
        match estimate_gas(2000, 2, m, &config) {
            Err(TransactionError::GasEstimateTooLarge { estimated, .. }) => {
                assert_eq!(estimated, 8_024_120)
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_selection_grows_to_cover_fee() {
        let config = ProtocolConfig::default();
        let provided = ProvidedGas::estimated(GasPrice::new(U256::from(1u64)), None);
        let utxos = vec![plain(1, 10_000), plain(2, 15_000), plain(3, 50_000)];
        // 10_000 covers the amount; fee 20_000 needs more inputs
        let selected = select_with_estimation(
            &AssetAmounts::new(U256::from(10_000u64), vec![]),
            &utxos,
            &provided,
            1,
            AssetOrder::Ascending,
            &config,
        )
        .unwrap();
        assert_eq!(selected.assets.len(), 3);
        assert_eq!(selected.gas, GasBox::unchecked(20_000));
    }

    #[test]
    fn test_selection_exhausted() {
        let config = ProtocolConfig::default();
        let provided = ProvidedGas::estimated(GasPrice::new(U256::from(1u64)), None);
        let utxos = vec![plain(1, 10_000), plain(2, 15_000)];
        let err = select_with_estimation(
            &AssetAmounts::new(U256::from(10_000u64), vec![]),
            &utxos,
            &provided,
            1,
            AssetOrder::Ascending,
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::NotEnoughBalance { .. }));
        assert_eq!(err.shortfall(), Some(U256::from(5_000u64)));
    }
}
