#![deny(missing_docs)]

//! Alephium SDK - transaction construction core.
//!
//! Re-exports the SDK components for convenient single-crate usage.

pub use alph_primitives as primitives;
pub use alph_transaction as transaction;

pub use alph_transaction::{
    sign_transaction, Address, ProtocolConfig, ProvidedGas, SignedTransfer, TransactionError,
    TransactionSigner, TransferBuilder, TxOutputInfo, UnsignedTransaction,
};
