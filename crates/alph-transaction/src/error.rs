//! Errors raised while decoding, selecting and assembling transactions.

use alph_primitives::{GasBox, SerdeError, U256};

use crate::TokenId;

/// Which side of the change is underfunded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeShortfall {
    /// Only ALPH is left over, but less than one dust amount.
    Alph,
    /// Tokens are left over and ALPH cannot cover one dust amount per token.
    Token,
    /// ALPH covers the token change outputs but not an extra ALPH change output.
    AlphAndToken,
}

impl std::fmt::Display for ChangeShortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeShortfall::Alph => write!(f, "ALPH"),
            ChangeShortfall::Token => write!(f, "token"),
            ChangeShortfall::AlphAndToken => write!(f, "ALPH and token"),
        }
    }
}

/// Error types for transaction construction.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Malformed wire bytes (forwarded from the codec).
    #[error("serialization error: {0}")]
    Serde(#[from] SerdeError),

    /// An underlying primitives error (forwarded from `alph-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] alph_primitives::PrimitivesError),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- pre-checks --------------------------------------------------------

    #[error("provided gas {gas} too small, minimal {minimal}")]
    GasBelowMinimum { gas: GasBox, minimal: GasBox },

    #[error("provided gas {gas} too large, maximal {maximal}")]
    GasAboveMaximum { gas: GasBox, maximal: GasBox },

    #[error("gas price {price} too large, maximal {maximal}")]
    GasPriceTooHigh { price: U256, maximal: U256 },

    #[error("too many inputs for the transfer: {count}, maximal {max}")]
    TooManyInputs { count: usize, max: usize },

    #[error("too many outputs for the transfer: {count}, maximal {max}")]
    TooManyOutputs { count: usize, max: usize },

    #[error("inputs not unique")]
    DuplicateInputs,

    #[error("no outputs to transfer to")]
    NoOutputs,

    #[error("tx output value {amount} is too small, avoid spreading dust (minimal {dust})")]
    OutputBelowDust { amount: U256, dust: U256 },

    #[error("value is zero for token {0}")]
    ZeroTokenAmount(TokenId),

    #[error("new tokens found in outputs: {0:?}")]
    NewTokensInOutputs(Vec<TokenId>),

    // -- arithmetic --------------------------------------------------------

    #[error("input amount overflow")]
    InputAmountOverflow,

    #[error("output amount overflow")]
    OutputAmountOverflow,

    #[error("fee overflow")]
    FeeOverflow,

    #[error("amount overflow for token {0}")]
    TokenAmountOverflow(TokenId),

    #[error("estimated gas {estimated} exceeds maximal gas per tx {maximal}")]
    GasEstimateTooLarge { estimated: u64, maximal: GasBox },

    // -- insufficiency -----------------------------------------------------

    #[error("not enough balance: got {available}, expected {required}")]
    NotEnoughBalance { available: U256, required: U256 },

    #[error("not enough balance for token {token_id}: got {available}, expected {required}")]
    NotEnoughTokenBalance {
        token_id: TokenId,
        available: U256,
        required: U256,
    },

    #[error("not enough ALPH for {kind} change output, expected {expected}, got {got}")]
    NotEnoughAlphForChange {
        kind: ChangeShortfall,
        expected: U256,
        got: U256,
    },

    // -- signing -----------------------------------------------------------

    #[error("signing error: {0}")]
    SigningError(String),
}

impl TransactionError {
    /// Amount missing to satisfy an insufficiency error, if this is one.
    pub fn shortfall(&self) -> Option<U256> {
        match self {
            TransactionError::NotEnoughBalance { available, required }
            | TransactionError::NotEnoughTokenBalance {
                available, required, ..
            } => required.sub(available),
            TransactionError::NotEnoughAlphForChange { expected, got, .. } => expected.sub(got),
            _ => None,
        }
    }
}

impl From<hex::FromHexError> for TransactionError {
    fn from(e: hex::FromHexError) -> Self {
        TransactionError::InvalidHex(e.to_string())
    }
}
