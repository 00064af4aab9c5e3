//! Codecs built from other codecs.

use std::marker::PhantomData;

use super::compact;
use super::{ByteReader, ByteWriter, Serde, SerdeError, SerdeResult};

// ---------------------------------------------------------------------------
// Fixed-size and length-prefixed bytes
// ---------------------------------------------------------------------------

/// Exactly `N` raw bytes, no length prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedBytes<const N: usize>;

impl<const N: usize> Serde<[u8; N]> for FixedBytes<N> {
    fn write(&self, value: &[u8; N], writer: &mut ByteWriter) {
        writer.write_bytes(value);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<[u8; N]> {
        reader.read_array::<N>()
    }
}

/// A byte string prefixed by its signed compact length.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteVecSerde;

impl Serde<Vec<u8>> for ByteVecSerde {
    fn write(&self, value: &Vec<u8>, writer: &mut ByteWriter) {
        compact::write_i32(value.len() as i32, writer);
        writer.write_bytes(value);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<Vec<u8>> {
        let size = compact::read_i32(reader)?;
        let size = usize::try_from(size)
            .map_err(|_| SerdeError::Validation(format!("Negative byte string length: {}", size)))?;
        Ok(reader.read_bytes(size)?.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// A sequence prefixed by its signed compact element count.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListSerde<S>(pub S);

impl<T, S: Serde<T>> Serde<Vec<T>> for ListSerde<S> {
    fn write(&self, value: &Vec<T>, writer: &mut ByteWriter) {
        compact::write_i32(value.len() as i32, writer);
        for item in value {
            self.0.write(item, writer);
        }
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<Vec<T>> {
        let count = compact::read_i32(reader)?;
        let count = usize::try_from(count)
            .map_err(|_| SerdeError::Validation(format!("Negative array size: {}", count)))?;
        // every element takes at least one byte
        if count > reader.remaining() {
            return Err(SerdeError::Validation(format!(
                "Malicious array size: {} with {} bytes left",
                count,
                reader.remaining()
            )));
        }
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.0.read(reader)?);
        }
        Ok(items)
    }
}

/// An optional value behind a `0x00` / `0x01` flag byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionSerde<S>(pub S);

impl<T, S: Serde<T>> Serde<Option<T>> for OptionSerde<S> {
    fn write(&self, value: &Option<T>, writer: &mut ByteWriter) {
        match value {
            None => writer.write_u8(0),
            Some(v) => {
                writer.write_u8(1);
                self.0.write(v, writer);
            }
        }
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<Option<T>> {
        match reader.read_u8()? {
            0 => Ok(None),
            1 => Ok(Some(self.0.read(reader)?)),
            flag => Err(SerdeError::WrongFormat(format!(
                "Expect 0 or 1 for option flag, got {}",
                flag
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Two codecs applied one after the other to a pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tuple2<S0, S1>(pub S0, pub S1);

/// Build a pair codec.
pub fn tuple2<S0, S1>(s0: S0, s1: S1) -> Tuple2<S0, S1> {
    Tuple2(s0, s1)
}

impl<A0, A1, S0: Serde<A0>, S1: Serde<A1>> Serde<(A0, A1)> for Tuple2<S0, S1> {
    fn write(&self, value: &(A0, A1), writer: &mut ByteWriter) {
        self.0.write(&value.0, writer);
        self.1.write(&value.1, writer);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<(A0, A1)> {
        let a0 = self.0.read(reader)?;
        let a1 = self.1.read(reader)?;
        Ok((a0, a1))
    }
}

/// A two-field record codec, see [`for_product2`].
pub struct Product2<S0, S1, A0, A1, Pack, Unpack> {
    s0: S0,
    s1: S1,
    pack: Pack,
    unpack: Unpack,
    _fields: PhantomData<fn() -> (A0, A1)>,
}

/// Build a codec for a two-field record.
///
/// Fields are encoded in order: `unpack` splits a record into its fields
/// for writing, `pack` rebuilds it after reading.
///
/// # Arguments
/// * `pack` - Constructor from the decoded fields.
/// * `unpack` - Projection onto the fields to encode.
/// * `s0`, `s1` - Field codecs.
pub fn for_product2<T, A0, A1, S0, S1, Pack, Unpack>(
    pack: Pack,
    unpack: Unpack,
    s0: S0,
    s1: S1,
) -> Product2<S0, S1, A0, A1, Pack, Unpack>
where
    S0: Serde<A0>,
    S1: Serde<A1>,
    Pack: Fn(A0, A1) -> T,
    Unpack: Fn(&T) -> (A0, A1),
{
    Product2 {
        s0,
        s1,
        pack,
        unpack,
        _fields: PhantomData,
    }
}

impl<T, A0, A1, S0, S1, Pack, Unpack> Serde<T> for Product2<S0, S1, A0, A1, Pack, Unpack>
where
    S0: Serde<A0>,
    S1: Serde<A1>,
    Pack: Fn(A0, A1) -> T,
    Unpack: Fn(&T) -> (A0, A1),
{
    fn write(&self, value: &T, writer: &mut ByteWriter) {
        let (a0, a1) = (self.unpack)(value);
        self.s0.write(&a0, writer);
        self.s1.write(&a1, writer);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<T> {
        let a0 = self.s0.read(reader)?;
        let a1 = self.s1.read(reader)?;
        Ok((self.pack)(a0, a1))
    }
}

// ---------------------------------------------------------------------------
// Mapping and validation
// ---------------------------------------------------------------------------

/// Codec for `U` through a total bijection with `T`, see [`super::SerdeExt::xmap`].
pub struct XMap<S, T, Fwd, Bwd> {
    inner: S,
    to: Fwd,
    from: Bwd,
    _inner: PhantomData<fn() -> T>,
}

impl<S, T, Fwd, Bwd> XMap<S, T, Fwd, Bwd> {
    pub(crate) fn new(inner: S, to: Fwd, from: Bwd) -> Self {
        XMap {
            inner,
            to,
            from,
            _inner: PhantomData,
        }
    }
}

impl<S, T, U, Fwd, Bwd> Serde<U> for XMap<S, T, Fwd, Bwd>
where
    S: Serde<T>,
    Fwd: Fn(T) -> U,
    Bwd: Fn(&U) -> T,
{
    fn write(&self, value: &U, writer: &mut ByteWriter) {
        self.inner.write(&(self.from)(value), writer);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<U> {
        self.inner.read(reader).map(&self.to)
    }
}

/// Codec for `U` through a conversion from `T` that may fail.
pub struct XfMap<S, T, Fwd, Bwd> {
    inner: S,
    to: Fwd,
    from: Bwd,
    _inner: PhantomData<fn() -> T>,
}

impl<S, T, Fwd, Bwd> XfMap<S, T, Fwd, Bwd> {
    pub(crate) fn new(inner: S, to: Fwd, from: Bwd) -> Self {
        XfMap {
            inner,
            to,
            from,
            _inner: PhantomData,
        }
    }
}

impl<S, T, U, Fwd, Bwd> Serde<U> for XfMap<S, T, Fwd, Bwd>
where
    S: Serde<T>,
    Fwd: Fn(T) -> SerdeResult<U>,
    Bwd: Fn(&U) -> T,
{
    fn write(&self, value: &U, writer: &mut ByteWriter) {
        self.inner.write(&(self.from)(value), writer);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<U> {
        self.inner.read(reader).and_then(&self.to)
    }
}

/// Codec that rejects decoded values failing a predicate.
pub struct Validate<S, F> {
    inner: S,
    test: F,
}

impl<S, F> Validate<S, F> {
    pub(crate) fn new(inner: S, test: F) -> Self {
        Validate { inner, test }
    }
}

impl<T, S, F> Serde<T> for Validate<S, F>
where
    S: Serde<T>,
    F: Fn(&T) -> Result<(), String>,
{
    fn write(&self, value: &T, writer: &mut ByteWriter) {
        self.inner.write(value, writer);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<T> {
        let value = self.inner.read(reader)?;
        (self.test)(&value).map_err(SerdeError::Validation)?;
        Ok(value)
    }
}
