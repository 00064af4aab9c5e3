//! Script hints and output hints.
//!
//! A script hint is the DJB hash of a public-key hash with its low bit
//! forced to 1. An output hint reuses that value for asset outputs and
//! clears the low bit for contract outputs, so the bit tells the two kinds
//! of output apart.

use std::fmt;

use alph_primitives::hash::djb;
use alph_primitives::codec::{FixedBytes, Serde, SerdeExt};
use alph_primitives::Blake2b;

/// Owner-derived 32-bit value, always odd.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptHint(i32);

impl ScriptHint {
    /// Derive the hint of the script locked to `hash`.
    pub fn from_hash(hash: &Blake2b) -> Self {
        ScriptHint(djb::int_hash(hash.as_bytes()) | 1)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Debug for ScriptHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptHint({:#010x})", self.0 as u32)
    }
}

/// 4-byte output hint carried by every output reference.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hint(i32);

impl Hint {
    pub fn of_asset(script_hint: ScriptHint) -> Self {
        Hint(script_hint.value())
    }

    pub fn of_contract(script_hint: ScriptHint) -> Self {
        Hint(script_hint.value() ^ 1)
    }

    /// Wrap a raw hint value as received from a node.
    pub fn from_raw(value: i32) -> Self {
        Hint(value)
    }

    pub fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Hint(i32::from_be_bytes(bytes))
    }

    pub fn to_be_bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn is_asset_type(&self) -> bool {
        self.0 & 1 == 1
    }

    pub fn is_contract_type(&self) -> bool {
        !self.is_asset_type()
    }

    /// The script hint this output hint was derived from.
    pub fn script_hint(&self) -> ScriptHint {
        ScriptHint(self.0 | 1)
    }

    /// Four big-endian bytes.
    pub fn serde() -> impl Serde<Hint> {
        FixedBytes::<4>.xmap(Hint::from_be_bytes, |h: &Hint| h.to_be_bytes())
    }
}

impl fmt::Debug for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hint({:#010x})", self.0 as u32)
    }
}
