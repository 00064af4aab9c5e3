//! Signing collaborator.
//!
//! Signatures are produced outside this crate. A [`TransactionSigner`]
//! receives the 32-byte transaction id and returns a detached signature;
//! [`sign_transaction`] packages it with the unsigned transaction in the
//! shape a node expects for submission.

use serde::{Deserialize, Serialize};

use crate::unsigned_tx::{TransactionId, UnsignedTransaction};
use crate::TransactionError;

/// Anything that can sign a transaction hash.
pub trait TransactionSigner {
    /// Sign the transaction id.
    ///
    /// # Arguments
    /// * `hash` - The transaction id bytes.
    ///
    /// # Returns
    /// The signature bytes, or `SigningError` on failure.
    fn sign(&self, hash: &[u8; 32]) -> Result<Vec<u8>, TransactionError>;
}

/// Submission payload: the unsigned transaction and one signature, both hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransfer {
    pub tx_id: TransactionId,
    #[serde(rename = "unsignedTx")]
    pub unsigned_tx_hex: String,
    #[serde(rename = "signature")]
    pub signature_hex: String,
}

/// Sign `tx` with `signer`.
pub fn sign_transaction<S: TransactionSigner + ?Sized>(
    tx: &UnsignedTransaction,
    signer: &S,
) -> Result<SignedTransfer, TransactionError> {
    let tx_id = tx.id();
    let signature = signer.sign(tx_id.as_bytes())?;
    if signature.is_empty() {
        return Err(TransactionError::SigningError("empty signature".to_string()));
    }
    Ok(SignedTransfer {
        tx_id,
        unsigned_tx_hex: tx.to_hex(),
        signature_hex: hex::encode(signature),
    })
}
