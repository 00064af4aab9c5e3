/// Unified error type for primitives operations.
///
/// Covers parsing and range failures of the numeric types, hex decoding
/// and gas accounting. Codec failures have their own `SerdeError`.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("value out of range: {0}")]
    OutOfRange(String),

    #[error("out of gas: remaining {remaining}, requested {requested}")]
    OutOfGas { remaining: u32, requested: u32 },

    #[error("invalid gas estimation multiplier: {0}")]
    InvalidGasMultiplier(String),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
