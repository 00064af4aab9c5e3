//! Gas accounting types.
//!
//! `GasBox` is an amount of gas, `GasPrice` the ALPH paid per unit of gas,
//! and `GasEstimationMultiplier` a bounded factor applied to estimated gas.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PrimitivesError, U256};

// ---------------------------------------------------------------------------
// GasBox
// ---------------------------------------------------------------------------

/// A non-negative gas amount that fits in a signed 32-bit integer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct GasBox(u32);

impl GasBox {
    pub const ZERO: GasBox = GasBox(0);

    /// Largest representable gas amount.
    pub const MAX_VALUE: u32 = i32::MAX as u32;

    /// # Returns
    /// `Some(GasBox)` when `value <= i32::MAX`, otherwise `None`.
    pub fn new(value: u32) -> Option<Self> {
        if value <= Self::MAX_VALUE {
            Some(GasBox(value))
        } else {
            None
        }
    }

    /// # Returns
    /// `Some(GasBox)` when `value` is non-negative.
    pub fn from_i32(value: i32) -> Option<Self> {
        u32::try_from(value).ok().map(GasBox)
    }

    /// # Panics
    /// Panics when `value > i32::MAX`.
    pub fn unchecked(value: u32) -> Self {
        assert!(value <= Self::MAX_VALUE, "gas out of range: {}", value);
        GasBox(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    pub fn to_u256(&self) -> U256 {
        U256::from(self.0)
    }

    pub fn add(&self, that: GasBox) -> Option<GasBox> {
        self.0.checked_add(that.0).and_then(GasBox::new)
    }

    pub fn sub(&self, that: GasBox) -> Option<GasBox> {
        self.0.checked_sub(that.0).map(GasBox)
    }

    pub fn mul(&self, n: u32) -> Option<GasBox> {
        self.0.checked_mul(n).and_then(GasBox::new)
    }

    /// Consume `amount` from this box.
    ///
    /// # Returns
    /// The remaining gas, or `OutOfGas` when `amount` exceeds what is left.
    pub fn use_gas(&self, amount: GasBox) -> Result<GasBox, PrimitivesError> {
        self.sub(amount).ok_or(PrimitivesError::OutOfGas {
            remaining: self.0,
            requested: amount.0,
        })
    }
}

impl TryFrom<u32> for GasBox {
    type Error = PrimitivesError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        GasBox::new(value)
            .ok_or_else(|| PrimitivesError::OutOfRange(format!("gas {} exceeds i32::MAX", value)))
    }
}

impl From<GasBox> for u32 {
    fn from(gas: GasBox) -> u32 {
        gas.0
    }
}

impl fmt::Display for GasBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for GasBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GasBox({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// GasPrice
// ---------------------------------------------------------------------------

/// Price of one unit of gas, in attoALPH.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GasPrice(U256);

impl GasPrice {
    pub fn new(value: U256) -> Self {
        GasPrice(value)
    }

    pub fn value(&self) -> &U256 {
        &self.0
    }

    /// Total fee for `gas` units at this price.
    ///
    /// # Returns
    /// `None` when the product exceeds 256 bits.
    pub fn fee(&self, gas: GasBox) -> Option<U256> {
        self.0.mul(&gas.to_u256())
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// GasEstimationMultiplier
// ---------------------------------------------------------------------------

/// A factor in `[1.00, 2.00]` with at most two decimal places.
///
/// Stored as hundredths so that multiplication stays in integer arithmetic.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct GasEstimationMultiplier(u32);

impl GasEstimationMultiplier {
    const MIN_HUNDREDTHS: u32 = 100;
    const MAX_HUNDREDTHS: u32 = 200;

    /// Build from an integer number of hundredths, e.g. `150` for `1.5`.
    pub fn from_hundredths(hundredths: u32) -> Option<Self> {
        if (Self::MIN_HUNDREDTHS..=Self::MAX_HUNDREDTHS).contains(&hundredths) {
            Some(GasEstimationMultiplier(hundredths))
        } else {
            None
        }
    }

    /// Build from a decimal factor.
    ///
    /// # Returns
    /// An error when the factor is outside `[1.0, 2.0]` or has more than
    /// two decimal places.
    pub fn from_f64(value: f64) -> Result<Self, PrimitivesError> {
        if !(1.0..=2.0).contains(&value) {
            return Err(PrimitivesError::InvalidGasMultiplier(format!(
                "{} is not within [1.0, 2.0]",
                value
            )));
        }
        let scaled = value * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-9 {
            return Err(PrimitivesError::InvalidGasMultiplier(format!(
                "{} has more than two decimal places",
                value
            )));
        }
        Self::from_hundredths(rounded as u32).ok_or_else(|| {
            PrimitivesError::InvalidGasMultiplier(format!("{} is not within [1.0, 2.0]", value))
        })
    }

    pub fn hundredths(&self) -> u32 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Scale `gas` by this factor, truncating the fractional part.
    ///
    /// # Returns
    /// `None` when the scaled gas no longer fits in a `GasBox`.
    pub fn apply(&self, gas: GasBox) -> Option<GasBox> {
        let scaled = u64::from(gas.value()) * u64::from(self.0) / 100;
        u32::try_from(scaled).ok().and_then(GasBox::new)
    }
}

impl TryFrom<f64> for GasEstimationMultiplier {
    type Error = PrimitivesError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        GasEstimationMultiplier::from_f64(value)
    }
}

impl From<GasEstimationMultiplier> for f64 {
    fn from(m: GasEstimationMultiplier) -> f64 {
        m.as_f64()
    }
}
