//! 32-bit unsigned integer.

use std::fmt;

use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// An unsigned integer in the range `[0, 2^32)`.
///
/// Values can be built from a signed 32-bit pattern with [`U32::from_bits`];
/// the pattern is then read as unsigned, so `U32::from_bits(-1)` is
/// `U32::MAX` and compares greater than `U32::ONE`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct U32(u32);

impl U32 {
    pub const ZERO: U32 = U32(0);
    pub const ONE: U32 = U32(1);
    pub const TWO: U32 = U32(2);
    pub const MAX: U32 = U32(u32::MAX);
    pub const MIN: U32 = U32(0);

    pub const fn new(value: u32) -> Self {
        U32(value)
    }

    /// Reinterpret a signed 32-bit pattern as unsigned.
    pub const fn from_bits(bits: i32) -> Self {
        U32(bits as u32)
    }

    /// Accept only non-negative signed values.
    pub fn from_i32(value: i32) -> Option<Self> {
        u32::try_from(value).ok().map(U32)
    }

    /// Accept an arbitrary-precision value of at most 32 bits.
    pub fn from_biguint(value: &BigUint) -> Option<Self> {
        value.to_u32().map(U32)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    /// The underlying bit pattern as a signed integer.
    pub const fn to_bits(&self) -> i32 {
        self.0 as i32
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from(self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn add(&self, that: U32) -> Option<U32> {
        self.0.checked_add(that.0).map(U32)
    }

    pub fn sub(&self, that: U32) -> Option<U32> {
        self.0.checked_sub(that.0).map(U32)
    }

    pub fn mul(&self, that: U32) -> Option<U32> {
        self.0.checked_mul(that.0).map(U32)
    }

    pub fn div(&self, that: U32) -> Option<U32> {
        self.0.checked_div(that.0).map(U32)
    }

    pub fn rem(&self, that: U32) -> Option<U32> {
        self.0.checked_rem(that.0).map(U32)
    }

    /// # Panics
    /// Panics on overflow.
    pub fn add_unchecked(&self, that: U32) -> U32 {
        self.add(that).unwrap_or_else(|| panic!("U32 overflow: {} + {}", self, that))
    }

    /// # Panics
    /// Panics on underflow.
    pub fn sub_unchecked(&self, that: U32) -> U32 {
        self.sub(that).unwrap_or_else(|| panic!("U32 underflow: {} - {}", self, that))
    }

    /// # Panics
    /// Panics on overflow.
    pub fn mul_unchecked(&self, that: U32) -> U32 {
        self.mul(that).unwrap_or_else(|| panic!("U32 overflow: {} * {}", self, that))
    }

    /// # Panics
    /// Panics if `that` is zero.
    pub fn div_unchecked(&self, that: U32) -> U32 {
        self.div(that).unwrap_or_else(|| panic!("U32 division by zero"))
    }

    /// # Panics
    /// Panics if `that` is zero.
    pub fn rem_unchecked(&self, that: U32) -> U32 {
        self.rem(that).unwrap_or_else(|| panic!("U32 remainder by zero"))
    }
}

impl From<u32> for U32 {
    fn from(v: u32) -> Self {
        U32(v)
    }
}

impl fmt::Display for U32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for U32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U32({})", self.0)
    }
}
