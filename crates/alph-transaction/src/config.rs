//! Protocol constants injected into selection and transfer assembly.

use serde::{Deserialize, Serialize};

use alph_primitives::{GasBox, GasPrice, U256};

use crate::TransactionError;

/// attoALPH per ALPH.
pub const ONE_ALPH: u128 = 1_000_000_000_000_000_000;
/// attoALPH per nanoALPH.
pub const ONE_NANO_ALPH: u128 = 1_000_000_000;
/// attoALPH per hundredth of an ALPH.
pub const ONE_CENT: u128 = ONE_ALPH / 100;

/// `n` ALPH in attoALPH.
pub fn alph(n: u64) -> U256 {
    U256::from(u128::from(n) * ONE_ALPH)
}

/// `n` nanoALPH in attoALPH.
pub fn nano_alph(n: u64) -> U256 {
    U256::from(u128::from(n) * ONE_NANO_ALPH)
}

/// `n` hundredths of an ALPH in attoALPH.
pub fn cent(n: u64) -> U256 {
    U256::from(u128::from(n) * ONE_CENT)
}

/// Gas charged per transaction part when estimating.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasSchedule {
    pub tx_base_gas: GasBox,
    pub input_base_gas: GasBox,
    pub output_base_gas: GasBox,
    pub p2pk_unlock_gas: GasBox,
}

impl Default for GasSchedule {
    fn default() -> Self {
        GasSchedule {
            tx_base_gas: GasBox::unchecked(1000),
            input_base_gas: GasBox::unchecked(2000),
            output_base_gas: GasBox::unchecked(4500),
            p2pk_unlock_gas: GasBox::unchecked(2060),
        }
    }
}

/// Protocol limits and defaults.
///
/// `Default` yields the mainnet values. Any subset of fields can be
/// overridden from JSON; missing fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Smallest amount an output may carry.
    pub dust_utxo_amount: U256,
    pub minimal_gas: GasBox,
    pub maximal_gas_per_tx: GasBox,
    /// Upper bound on any ALPH quantity, gas price included.
    pub max_alph_value: U256,
    pub max_tx_input_num: usize,
    pub max_tx_output_num: usize,
    pub default_gas_price: GasPrice,
    pub gas: GasSchedule,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        ProtocolConfig {
            dust_utxo_amount: U256::from(ONE_ALPH / 1000),
            minimal_gas: GasBox::unchecked(20_000),
            maximal_gas_per_tx: GasBox::unchecked(5_000_000),
            max_alph_value: alph(1_000_000_000),
            max_tx_input_num: 256,
            max_tx_output_num: 256,
            default_gas_price: GasPrice::new(nano_alph(100)),
            gas: GasSchedule::default(),
        }
    }
}

impl ProtocolConfig {
    /// Load a configuration from JSON.
    ///
    /// # Arguments
    /// * `json` - A JSON object; absent fields take their default value.
    ///
    /// # Returns
    /// The parsed configuration, or `InvalidConfig` if the JSON is malformed
    /// or describes inconsistent limits.
    pub fn from_json(json: &str) -> Result<Self, TransactionError> {
        let config: ProtocolConfig =
            serde_json::from_str(json).map_err(|e| TransactionError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, TransactionError> {
        serde_json::to_string_pretty(self).map_err(|e| TransactionError::InvalidConfig(e.to_string()))
    }

    /// Check that the limits are mutually consistent.
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.minimal_gas > self.maximal_gas_per_tx {
            return Err(TransactionError::InvalidConfig(format!(
                "minimal gas {} exceeds maximal gas per tx {}",
                self.minimal_gas, self.maximal_gas_per_tx
            )));
        }
        if self.max_tx_input_num == 0 || self.max_tx_output_num == 0 {
            return Err(TransactionError::InvalidConfig(
                "input and output limits must be positive".to_string(),
            ));
        }
        if self.dust_utxo_amount.is_zero() {
            return Err(TransactionError::InvalidConfig("dust amount must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_helpers() {
        assert_eq!(alph(1), U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(nano_alph(100), U256::from(100_000_000_000u64));
        assert_eq!(cent(1), U256::from(10_000_000_000_000_000u64));
    }

    #[test]
    fn test_mainnet_defaults() {
        let config = ProtocolConfig::default();
        assert_eq!(config.dust_utxo_amount, U256::from(1_000_000_000_000_000u64));
        assert_eq!(config.minimal_gas, GasBox::unchecked(20_000));
        assert_eq!(config.max_alph_value.to_string(), "1000000000000000000000000000");
        assert_eq!(config.default_gas_price.value(), &U256::from(100_000_000_000u64));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ProtocolConfig::from_json(
            r#"{"dust_utxo_amount": "5", "max_tx_input_num": 3, "gas": {"tx_base_gas": 10}}"#,
        )
        .unwrap();
        assert_eq!(config.dust_utxo_amount, U256::from(5u64));
        assert_eq!(config.max_tx_input_num, 3);
        assert_eq!(config.gas.tx_base_gas, GasBox::unchecked(10));
        assert_eq!(config.gas.input_base_gas, GasBox::unchecked(2000));
        assert_eq!(config.max_tx_output_num, 256);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ProtocolConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(ProtocolConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ProtocolConfig::from_json("{\"minimal_gas\": -1}"),
            Err(TransactionError::InvalidConfig(_))
        ));
        assert!(matches!(
            ProtocolConfig::from_json("{\"minimal_gas\": 6000000}"),
            Err(TransactionError::InvalidConfig(_))
        ));
    }
}
