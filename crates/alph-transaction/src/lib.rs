//! Alephium SDK - protocol entities, UTXO selection and transfer assembly.
//!
//! Provides the wire-level transaction types (lockup and unlock scripts,
//! output references, inputs, outputs, unsigned transactions), the UTXO
//! selection algorithm with optional gas estimation, and the pipeline that
//! assembles an unsigned transfer from spendable outputs.

pub mod address;
pub mod config;
pub mod gas_estimation;
pub mod hint;
pub mod input;
pub mod lockup;
pub mod output;
pub mod output_ref;
pub mod signer;
pub mod token;
pub mod transfer;
pub mod unlock;
pub mod unsigned_tx;
pub mod utxo;
pub mod utxo_selection;

mod error;
pub use error::{ChangeShortfall, TransactionError};

pub use address::Address;
pub use config::ProtocolConfig;
pub use hint::{Hint, ScriptHint};
pub use input::TxInput;
pub use lockup::LockupScript;
pub use output::{AssetOutput, TxOutput};
pub use output_ref::{AssetOutputRef, ContractOutputRef, TxOutputRef};
pub use signer::{sign_transaction, SignedTransfer, TransactionSigner};
pub use token::TokenId;
pub use transfer::{TotalAmountNeeded, TransferBuilder, TxOutputInfo};
pub use unlock::{PublicKey, UnlockScript};
pub use unsigned_tx::{TransactionId, UnsignedTransaction};
pub use utxo::{AssetOutputInfo, OutputType};
pub use utxo_selection::{AssetAmounts, AssetOrder, ProvidedGas, Selected};
