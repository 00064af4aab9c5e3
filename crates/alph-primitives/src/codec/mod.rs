//! Composable binary codec.
//!
//! A [`Serde<T>`] value knows how to write a `T` into a [`ByteWriter`] and
//! read one back from a [`ByteReader`]. Leaf codecs for the primitive types
//! live in [`leaf`]; [`combinators`] builds codecs for lists, options,
//! products and mapped types out of existing ones. Integers on the wire use
//! the variable-length encoding in [`compact`].
//!
//! Decoding is all-or-error: a failed `read` never yields a partial value.

pub mod combinators;
pub mod compact;
pub mod leaf;
mod reader;

pub use combinators::{
    for_product2, tuple2, ByteVecSerde, FixedBytes, ListSerde, OptionSerde, Product2, Tuple2,
    Validate, XMap, XfMap,
};
pub use leaf::{
    BoolSerde, ByteSerde, GasBoxSerde, HashSerde, IntSerde, LongSerde, NetworkIdSerde,
    TimeStampSerde, U256Serde, U32Serde,
};
pub use reader::{ByteReader, ByteWriter};

/// Failure while decoding bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerdeError {
    #[error("too few bytes: expected {expected}, got {got}")]
    IncompleteData { expected: usize, got: usize },

    #[error("too many bytes: expected {expected}, got {got}")]
    Redundant { expected: usize, got: usize },

    #[error("wrong format: {0}")]
    WrongFormat(String),

    #[error("unknown {type_name} discriminant: {byte:#04x}")]
    UnknownDiscriminant { type_name: &'static str, byte: u8 },

    #[error("validation error: {0}")]
    Validation(String),
}

/// Result alias for codec operations.
pub type SerdeResult<T> = Result<T, SerdeError>;

/// Bidirectional binary codec for values of type `T`.
pub trait Serde<T> {
    /// Append the encoding of `value` to `writer`.
    fn write(&self, value: &T, writer: &mut ByteWriter);

    /// Decode one value from the reader's current position.
    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<T>;

    /// Encode `value` into a fresh byte vector.
    fn serialize(&self, value: &T) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.write(value, &mut writer);
        writer.into_bytes()
    }

    /// Decode one value from the front of `input`.
    ///
    /// # Returns
    /// The value and the unconsumed remainder of `input`.
    fn deserialize_partial<'a>(&self, input: &'a [u8]) -> SerdeResult<(T, &'a [u8])> {
        let mut reader = ByteReader::new(input);
        let value = self.read(&mut reader)?;
        Ok((value, reader.rest()))
    }

    /// Decode exactly one value spanning all of `input`.
    ///
    /// # Returns
    /// `Redundant` when bytes are left over after the value.
    fn deserialize(&self, input: &[u8]) -> SerdeResult<T> {
        let (value, rest) = self.deserialize_partial(input)?;
        if rest.is_empty() {
            Ok(value)
        } else {
            Err(SerdeError::Redundant {
                expected: input.len() - rest.len(),
                got: input.len(),
            })
        }
    }
}

/// Adapters available on every codec.
pub trait SerdeExt<T>: Serde<T> + Sized {
    /// Map through a total conversion in both directions.
    fn xmap<U, Fwd, Bwd>(self, to: Fwd, from: Bwd) -> XMap<Self, T, Fwd, Bwd>
    where
        Fwd: Fn(T) -> U,
        Bwd: Fn(&U) -> T,
    {
        XMap::new(self, to, from)
    }

    /// Map through a conversion that can fail while decoding.
    fn xfmap<U, Fwd, Bwd>(self, to: Fwd, from: Bwd) -> XfMap<Self, T, Fwd, Bwd>
    where
        Fwd: Fn(T) -> SerdeResult<U>,
        Bwd: Fn(&U) -> T,
    {
        XfMap::new(self, to, from)
    }

    /// Reject decoded values for which `test` returns an error message.
    fn validate<F>(self, test: F) -> Validate<Self, F>
    where
        F: Fn(&T) -> Result<(), String>,
    {
        Validate::new(self, test)
    }
}

impl<T, S: Serde<T>> SerdeExt<T> for S {}
