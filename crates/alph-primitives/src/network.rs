//! Network identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One-byte identifier of the chain a transaction is valid on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(u8);

impl NetworkId {
    pub const MAIN_NET: NetworkId = NetworkId(0);
    pub const TEST_NET: NetworkId = NetworkId(1);
    pub const DEV_NET: NetworkId = NetworkId(4);

    pub const fn new(id: u8) -> Self {
        NetworkId(id)
    }

    pub const fn id(&self) -> u8 {
        self.0
    }

    /// Human-readable name of the well-known networks.
    pub fn name(&self) -> &'static str {
        match self.0 {
            0 => "mainnet",
            1 => "testnet",
            4 => "devnet",
            _ => "custom",
        }
    }
}

impl Default for NetworkId {
    fn default() -> Self {
        NetworkId::MAIN_NET
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.0)
    }
}

impl fmt::Debug for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NetworkId({})", self.0)
    }
}
