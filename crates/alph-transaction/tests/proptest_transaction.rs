use proptest::prelude::*;

use alph_primitives::{Blake2b, GasBox, GasPrice, NetworkId, TimeStamp, U256};
use alph_transaction::utxo_selection::SelectionWithoutGasEstimation;
use alph_transaction::{
    AssetAmounts, AssetOrder, AssetOutput, AssetOutputInfo, AssetOutputRef, LockupScript,
    OutputType, PublicKey, TokenId, TransactionError, TxInput, UnlockScript, UnsignedTransaction,
};

fn arb_hash() -> impl Strategy<Value = Blake2b> {
    prop::collection::vec(any::<u8>(), 0..16).prop_map(|bytes| Blake2b::hash(&bytes))
}

fn arb_u256() -> impl Strategy<Value = U256> {
    prop::collection::vec(any::<u8>(), 0..=32).prop_map(|bytes| U256::from_be_bytes(&bytes).unwrap())
}

fn arb_lockup() -> impl Strategy<Value = LockupScript> {
    arb_hash().prop_map(LockupScript::p2pkh)
}

fn arb_unlock() -> impl Strategy<Value = UnlockScript> {
    prop_oneof![
        Just(UnlockScript::SameAsPrevious),
        prop::array::uniform32(any::<u8>()).prop_map(|bytes| {
            let mut key = [0x02u8; 33];
            key[1..].copy_from_slice(&bytes);
            UnlockScript::p2pkh(PublicKey::new(key))
        }),
    ]
}

fn arb_output() -> impl Strategy<Value = AssetOutput> {
    (
        arb_u256(),
        arb_lockup(),
        0i64..=i64::MAX,
        prop::collection::vec((arb_hash(), arb_u256()), 0..4),
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(amount, lockup, lock_time, tokens, data)| {
            AssetOutput::new(amount, lockup)
                .with_lock_time(TimeStamp::unchecked(lock_time))
                .with_tokens(tokens.into_iter().map(|(id, n)| (TokenId::new(id), n)).collect())
                .with_additional_data(data)
        })
}

fn arb_input() -> impl Strategy<Value = TxInput> {
    (arb_lockup(), arb_hash(), arb_unlock()).prop_map(|(lockup, key, unlock)| {
        TxInput::new(AssetOutputRef::from_lockup(&lockup, key), unlock)
    })
}

fn arb_tx() -> impl Strategy<Value = UnsignedTransaction> {
    (
        any::<u8>(),
        1u32..=5_000_000,
        arb_u256(),
        prop::collection::vec(arb_input(), 0..4),
        prop::collection::vec(arb_output(), 0..4),
    )
        .prop_map(|(network, gas, price, inputs, outputs)| {
            UnsignedTransaction::new(
                NetworkId::new(network),
                GasBox::unchecked(gas),
                GasPrice::new(price),
                inputs,
                outputs,
            )
        })
}

fn utxo(index: usize, amount: u64) -> AssetOutputInfo {
    let lockup = LockupScript::p2pkh(Blake2b::hash(b"owner"));
    AssetOutputInfo::new(
        AssetOutputRef::from_lockup(&lockup, Blake2b::hash(&index.to_be_bytes())),
        AssetOutput::new(U256::from(amount), lockup),
        OutputType::PersistedOutput,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn lockup_script_decodes_to_same_value(lockup in arb_lockup()) {
        prop_assert_eq!(LockupScript::from_bytes(&lockup.to_bytes()).unwrap(), lockup);
    }

    #[test]
    fn unlock_script_decodes_to_same_value(unlock in arb_unlock()) {
        prop_assert_eq!(UnlockScript::from_bytes(&unlock.to_bytes()).unwrap(), unlock);
    }

    #[test]
    fn asset_output_decodes_to_same_value(output in arb_output()) {
        prop_assert_eq!(AssetOutput::from_bytes(&output.to_bytes()).unwrap(), output);
    }

    #[test]
    fn input_decodes_to_same_value(input in arb_input()) {
        let decoded = TxInput::from_bytes(&input.to_bytes()).unwrap();
        prop_assert_eq!(decoded.output_ref.hint(), input.output_ref.hint());
        prop_assert_eq!(decoded, input);
    }

    #[test]
    fn transaction_decodes_with_same_id(tx in arb_tx()) {
        let decoded = UnsignedTransaction::from_bytes(&tx.to_bytes()).unwrap();
        prop_assert_eq!(decoded.id(), tx.id());
        prop_assert_eq!(decoded, tx);
    }

    #[test]
    fn truncated_transaction_is_rejected(tx in arb_tx(), cut in 1usize..64) {
        let bytes = tx.to_bytes();
        let cut = cut.min(bytes.len());
        prop_assert!(UnsignedTransaction::from_bytes(&bytes[..bytes.len() - cut]).is_err());
    }

    #[test]
    fn swapping_distinct_outputs_changes_id(tx in arb_tx(), a in arb_output(), b in arb_output()) {
        prop_assume!(a != b);
        let mut first = tx.clone();
        first.fixed_outputs.push(a.clone());
        first.fixed_outputs.push(b.clone());
        let mut second = tx;
        second.fixed_outputs.push(b);
        second.fixed_outputs.push(a);
        prop_assert_ne!(first.id(), second.id());
    }

    #[test]
    fn selection_covers_target_or_reports_shortfall(
        amounts in prop::collection::vec(1u64..1_000_000, 0..12),
        target in 1u64..6_000_000,
        descending in any::<bool>(),
    ) {
        let utxos: Vec<AssetOutputInfo> =
            amounts.iter().enumerate().map(|(i, &a)| utxo(i, a)).collect();
        let total: u64 = amounts.iter().sum();
        let order = if descending { AssetOrder::Descending } else { AssetOrder::Ascending };

        match SelectionWithoutGasEstimation::new(order)
            .select(&AssetAmounts::new(U256::from(target), vec![]), &utxos)
        {
            Ok(so_far) => {
                prop_assert!(total >= target);
                prop_assert!(so_far.alph >= U256::from(target));
                prop_assert_eq!(so_far.selected.len() + so_far.rest.len(), utxos.len());
            }
            Err(TransactionError::NotEnoughBalance { available, required }) => {
                prop_assert!(total < target);
                prop_assert_eq!(available, U256::from(total));
                prop_assert_eq!(required, U256::from(target));
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
