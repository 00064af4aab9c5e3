//! References to previously created outputs.
//!
//! A reference is a `(Hint, Key)` pair. The key alone identifies the output;
//! the hint is routing metadata whose low bit tells asset and contract
//! outputs apart.

use std::hash::{Hash, Hasher};

use alph_primitives::codec::{for_product2, HashSerde, Serde, SerdeExt};
use alph_primitives::Blake2b;

use crate::hint::Hint;
use crate::lockup::LockupScript;

// ---------------------------------------------------------------------------
// AssetOutputRef
// ---------------------------------------------------------------------------

/// Reference to an asset output. The hint always has its asset bit set.
#[derive(Debug, Clone, Copy)]
pub struct AssetOutputRef {
    hint: Hint,
    key: Blake2b,
}

impl AssetOutputRef {
    /// # Returns
    /// `None` if `hint` marks a contract output.
    pub fn new(hint: Hint, key: Blake2b) -> Option<Self> {
        if hint.is_asset_type() {
            Some(AssetOutputRef { hint, key })
        } else {
            None
        }
    }

    /// Reference an output of `lockup` stored under `key`.
    pub fn from_lockup(lockup: &LockupScript, key: Blake2b) -> Self {
        AssetOutputRef {
            hint: Hint::of_asset(lockup.script_hint()),
            key,
        }
    }

    pub fn hint(&self) -> Hint {
        self.hint
    }

    pub fn key(&self) -> &Blake2b {
        &self.key
    }

    /// Hint then key; decoding rejects contract hints.
    pub fn serde() -> impl Serde<AssetOutputRef> {
        for_product2(
            |hint: Hint, key: Blake2b| AssetOutputRef { hint, key },
            |r: &AssetOutputRef| (r.hint, r.key),
            Hint::serde(),
            HashSerde,
        )
        .validate(|r: &AssetOutputRef| {
            if r.hint.is_asset_type() {
                Ok(())
            } else {
                Err("Expect AssetOutputRef, got ContractOutputRef".to_string())
            }
        })
    }
}

impl PartialEq for AssetOutputRef {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for AssetOutputRef {}

impl Hash for AssetOutputRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

// ---------------------------------------------------------------------------
// ContractOutputRef
// ---------------------------------------------------------------------------

/// Reference to a contract output. The hint always has its asset bit clear.
#[derive(Debug, Clone, Copy)]
pub struct ContractOutputRef {
    hint: Hint,
    key: Blake2b,
}

impl ContractOutputRef {
    pub fn new(hint: Hint, key: Blake2b) -> Option<Self> {
        if hint.is_contract_type() {
            Some(ContractOutputRef { hint, key })
        } else {
            None
        }
    }

    pub fn hint(&self) -> Hint {
        self.hint
    }

    pub fn key(&self) -> &Blake2b {
        &self.key
    }
}

impl PartialEq for ContractOutputRef {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ContractOutputRef {}

impl Hash for ContractOutputRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

// ---------------------------------------------------------------------------
// TxOutputRef
// ---------------------------------------------------------------------------

/// Either kind of output reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxOutputRef {
    Asset(AssetOutputRef),
    Contract(ContractOutputRef),
}

impl TxOutputRef {
    /// Classify a reference by the asset bit of its hint.
    pub fn from_parts(hint: Hint, key: Blake2b) -> Self {
        if hint.is_asset_type() {
            TxOutputRef::Asset(AssetOutputRef { hint, key })
        } else {
            TxOutputRef::Contract(ContractOutputRef { hint, key })
        }
    }

    pub fn hint(&self) -> Hint {
        match self {
            TxOutputRef::Asset(r) => r.hint,
            TxOutputRef::Contract(r) => r.hint,
        }
    }

    pub fn key(&self) -> &Blake2b {
        match self {
            TxOutputRef::Asset(r) => &r.key,
            TxOutputRef::Contract(r) => &r.key,
        }
    }

    pub fn is_asset(&self) -> bool {
        matches!(self, TxOutputRef::Asset(_))
    }

    pub fn is_contract(&self) -> bool {
        !self.is_asset()
    }
}

impl From<AssetOutputRef> for TxOutputRef {
    fn from(r: AssetOutputRef) -> Self {
        TxOutputRef::Asset(r)
    }
}

impl From<ContractOutputRef> for TxOutputRef {
    fn from(r: ContractOutputRef) -> Self {
        TxOutputRef::Contract(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alph_primitives::SerdeError;

    fn key(seed: &[u8]) -> Blake2b {
        Blake2b::hash(seed)
    }

    #[test]
    fn test_asset_ref_rejects_contract_hint() {
        assert!(AssetOutputRef::new(Hint::from_raw(0x10), key(b"a")).is_none());
        assert!(AssetOutputRef::new(Hint::from_raw(0x11), key(b"a")).is_some());
        assert!(ContractOutputRef::new(Hint::from_raw(0x10), key(b"a")).is_some());
    }

    #[test]
    fn test_equality_ignores_hint() {
        let a = AssetOutputRef::new(Hint::from_raw(1), key(b"k")).unwrap();
        let b = AssetOutputRef::new(Hint::from_raw(3), key(b"k")).unwrap();
        let c = AssetOutputRef::new(Hint::from_raw(1), key(b"other")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_wire_form() {
        let r = AssetOutputRef::new(Hint::from_raw(0x5a66314f), key(b"k")).unwrap();
        let bytes = AssetOutputRef::serde().serialize(&r);
        assert_eq!(bytes.len(), 36);
        assert_eq!(&bytes[..4], &[0x5a, 0x66, 0x31, 0x4f]);
        let back = AssetOutputRef::serde().deserialize(&bytes).unwrap();
        assert_eq!(back.hint(), r.hint());
        assert_eq!(back.key(), r.key());
    }

    #[test]
    fn test_decoding_contract_ref_as_asset_fails() {
        let mut bytes = vec![0x5a, 0x66, 0x31, 0x4e];
        bytes.extend_from_slice(key(b"k").as_bytes());
        assert_eq!(
            AssetOutputRef::serde().deserialize(&bytes).unwrap_err(),
            SerdeError::Validation("Expect AssetOutputRef, got ContractOutputRef".to_string())
        );
    }

    #[test]
    fn test_classification() {
        let asset = TxOutputRef::from_parts(Hint::from_raw(7), key(b"x"));
        let contract = TxOutputRef::from_parts(Hint::from_raw(6), key(b"x"));
        assert!(asset.is_asset());
        assert!(contract.is_contract());
        assert_eq!(asset.key(), contract.key());
        assert_eq!(contract.hint().value(), 6);
    }
}
