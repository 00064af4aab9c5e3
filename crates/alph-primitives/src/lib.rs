//! Alephium SDK - safe numerics, binary codec framework and hashing.
//!
//! This crate provides the foundational building blocks for transaction
//! construction:
//! - Range-checked integers (`U256`, `U32`) with checked and asserting arithmetic
//! - Gas accounting (`GasBox`, `GasPrice`, `GasEstimationMultiplier`)
//! - Millisecond timestamps and durations
//! - Network identifiers
//! - A composable binary codec with compact integer encoding
//! - Blake2b-256 hashing and the DJB string hash used for script hints

pub mod codec;
pub mod gas;
pub mod hash;
pub mod network;
pub mod number;
pub mod time;

mod error;
pub use error::PrimitivesError;

pub use codec::{ByteReader, ByteWriter, Serde, SerdeError, SerdeExt, SerdeResult};
pub use gas::{GasBox, GasEstimationMultiplier, GasPrice};
pub use hash::{Blake2b, Blake2b256};
pub use network::NetworkId;
pub use number::{U256, U32};
pub use time::{Duration, TimeStamp};
