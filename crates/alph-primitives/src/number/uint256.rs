//! 256-bit unsigned integer backed by `BigUint`.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PrimitivesError;

/// Number of bits a `U256` may occupy.
pub const BIT_LENGTH: u64 = 256;

/// An unsigned integer in the range `[0, 2^256)`.
///
/// Every constructor validates the range, so a `U256` value is always
/// in bounds. Amounts of ALPH and tokens are expressed in this type.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct U256(BigUint);

impl U256 {
    /// The value zero.
    pub fn zero() -> Self {
        U256(BigUint::zero())
    }

    /// The value one.
    pub fn one() -> Self {
        U256(BigUint::one())
    }

    /// The largest representable value, `2^256 - 1`.
    pub fn max_value() -> Self {
        U256((BigUint::one() << BIT_LENGTH) - BigUint::one())
    }

    fn in_range(value: &BigUint) -> bool {
        value.bits() <= BIT_LENGTH
    }

    /// Wrap an arbitrary-precision integer if it fits in 256 bits.
    ///
    /// # Arguments
    /// * `value` - The candidate value.
    ///
    /// # Returns
    /// `Some(U256)` when `value < 2^256`, otherwise `None`.
    pub fn from_biguint(value: BigUint) -> Option<Self> {
        if Self::in_range(&value) {
            Some(U256(value))
        } else {
            None
        }
    }

    /// Wrap an arbitrary-precision integer that the caller knows is in range.
    ///
    /// # Panics
    /// Panics if `value >= 2^256`.
    pub fn from_biguint_unchecked(value: BigUint) -> Self {
        assert!(Self::in_range(&value), "U256 out of range: {}", value);
        U256(value)
    }

    /// Interpret big-endian bytes as an unsigned magnitude.
    ///
    /// Leading zero bytes are accepted. An empty slice yields zero.
    ///
    /// # Returns
    /// `Some(U256)` when the magnitude fits in 256 bits, otherwise `None`.
    pub fn from_be_bytes(bytes: &[u8]) -> Option<Self> {
        Self::from_biguint(BigUint::from_bytes_be(bytes))
    }

    /// Minimal big-endian encoding of the magnitude.
    ///
    /// Zero encodes as a single `0x00` byte.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        self.0.to_bytes_be()
    }

    /// Borrow the underlying arbitrary-precision value.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Consume into the underlying arbitrary-precision value.
    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Number of significant bits.
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.0.to_u32()
    }

    /// Narrow to a byte whose value is at most `0x7f`.
    pub fn to_byte(&self) -> Option<u8> {
        if self.0.bits() <= 7 {
            self.0.to_u8()
        } else {
            None
        }
    }

    // -----------------------------------------------------------------------
    // Checked arithmetic
    // -----------------------------------------------------------------------

    pub fn add(&self, that: &U256) -> Option<U256> {
        Self::from_biguint(&self.0 + &that.0)
    }

    pub fn sub(&self, that: &U256) -> Option<U256> {
        if self.0 >= that.0 {
            Some(U256(&self.0 - &that.0))
        } else {
            None
        }
    }

    pub fn mul(&self, that: &U256) -> Option<U256> {
        Self::from_biguint(&self.0 * &that.0)
    }

    /// Integer division, `None` when `that` is zero.
    pub fn div(&self, that: &U256) -> Option<U256> {
        if that.is_zero() {
            None
        } else {
            Some(U256(&self.0 / &that.0))
        }
    }

    /// Remainder, `None` when `that` is zero.
    pub fn rem(&self, that: &U256) -> Option<U256> {
        if that.is_zero() {
            None
        } else {
            Some(U256(&self.0 % &that.0))
        }
    }

    // -----------------------------------------------------------------------
    // Asserting arithmetic
    // -----------------------------------------------------------------------

    /// # Panics
    /// Panics if the sum is `>= 2^256`.
    pub fn add_unchecked(&self, that: &U256) -> U256 {
        Self::from_biguint_unchecked(&self.0 + &that.0)
    }

    /// # Panics
    /// Panics if `that > self`.
    pub fn sub_unchecked(&self, that: &U256) -> U256 {
        assert!(self.0 >= that.0, "U256 underflow: {} - {}", self.0, that.0);
        U256(&self.0 - &that.0)
    }

    /// # Panics
    /// Panics if the product is `>= 2^256`.
    pub fn mul_unchecked(&self, that: &U256) -> U256 {
        Self::from_biguint_unchecked(&self.0 * &that.0)
    }

    /// # Panics
    /// Panics if `that` is zero.
    pub fn div_unchecked(&self, that: &U256) -> U256 {
        assert!(!that.is_zero(), "U256 division by zero");
        U256(&self.0 / &that.0)
    }

    /// # Panics
    /// Panics if `that` is zero.
    pub fn rem_unchecked(&self, that: &U256) -> U256 {
        assert!(!that.is_zero(), "U256 remainder by zero");
        U256(&self.0 % &that.0)
    }

    /// Subtraction clamped at zero.
    pub fn saturating_sub(&self, that: &U256) -> U256 {
        self.sub(that).unwrap_or_else(U256::zero)
    }
}

impl From<u64> for U256 {
    fn from(v: u64) -> Self {
        U256(BigUint::from(v))
    }
}

impl From<u32> for U256 {
    fn from(v: u32) -> Self {
        U256(BigUint::from(v))
    }
}

impl From<u128> for U256 {
    fn from(v: u128) -> Self {
        U256(BigUint::from(v))
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({})", self.0)
    }
}

/// Parse a decimal string.
impl FromStr for U256 {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = BigUint::from_str(s)
            .map_err(|e| PrimitivesError::InvalidNumber(format!("{}: {}", s, e)))?;
        U256::from_biguint(value)
            .ok_or_else(|| PrimitivesError::OutOfRange(format!("{} exceeds 256 bits", s)))
    }
}

/// Serialize as a decimal string in JSON.
impl Serialize for U256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for U256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        U256::from_str(&s).map_err(serde::de::Error::custom)
    }
}
