//! Codecs for the primitive types of this crate.

use super::compact;
use super::{ByteReader, ByteWriter, Serde, SerdeError, SerdeResult};
use crate::hash::HASH_SIZE;
use crate::{Blake2b, GasBox, NetworkId, TimeStamp, U256, U32};

/// `0x00` or `0x01`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolSerde;

impl Serde<bool> for BoolSerde {
    fn write(&self, value: &bool, writer: &mut ByteWriter) {
        writer.write_u8(u8::from(*value));
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<bool> {
        match reader.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(SerdeError::Validation(format!("Invalid bool from byte {}", b))),
        }
    }
}

/// A single raw byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteSerde;

impl Serde<u8> for ByteSerde {
    fn write(&self, value: &u8, writer: &mut ByteWriter) {
        writer.write_u8(*value);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<u8> {
        reader.read_u8()
    }
}

/// Signed compact `i32`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntSerde;

impl Serde<i32> for IntSerde {
    fn write(&self, value: &i32, writer: &mut ByteWriter) {
        compact::write_i32(*value, writer);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<i32> {
        compact::read_i32(reader)
    }
}

/// Signed compact `i64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongSerde;

impl Serde<i64> for LongSerde {
    fn write(&self, value: &i64, writer: &mut ByteWriter) {
        compact::write_i64(*value, writer);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<i64> {
        compact::read_i64(reader)
    }
}

/// Unsigned compact `U32`.
#[derive(Debug, Clone, Copy, Default)]
pub struct U32Serde;

impl Serde<U32> for U32Serde {
    fn write(&self, value: &U32, writer: &mut ByteWriter) {
        compact::write_u32(*value, writer);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<U32> {
        compact::read_u32(reader)
    }
}

/// Unsigned compact `U256`.
#[derive(Debug, Clone, Copy, Default)]
pub struct U256Serde;

impl Serde<U256> for U256Serde {
    fn write(&self, value: &U256, writer: &mut ByteWriter) {
        compact::write_u256(value, writer);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<U256> {
        compact::read_u256(reader)
    }
}

/// Eight big-endian bytes, rejecting negative values.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeStampSerde;

impl Serde<TimeStamp> for TimeStampSerde {
    fn write(&self, value: &TimeStamp, writer: &mut ByteWriter) {
        writer.write_i64_be(value.millis());
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<TimeStamp> {
        let millis = reader.read_i64_be()?;
        TimeStamp::from_millis(millis)
            .ok_or_else(|| SerdeError::Validation(format!("Negative timestamp: {}", millis)))
    }
}

/// Signed compact gas amount, rejecting negative values.
#[derive(Debug, Clone, Copy, Default)]
pub struct GasBoxSerde;

impl Serde<GasBox> for GasBoxSerde {
    fn write(&self, value: &GasBox, writer: &mut ByteWriter) {
        compact::write_i32(value.value() as i32, writer);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<GasBox> {
        let gas = compact::read_i32(reader)?;
        GasBox::from_i32(gas).ok_or_else(|| SerdeError::Validation(format!("Negative gas: {}", gas)))
    }
}

/// One raw byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkIdSerde;

impl Serde<NetworkId> for NetworkIdSerde {
    fn write(&self, value: &NetworkId, writer: &mut ByteWriter) {
        writer.write_u8(value.id());
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<NetworkId> {
        reader.read_u8().map(NetworkId::new)
    }
}

/// 32 raw digest bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashSerde;

impl Serde<Blake2b> for HashSerde {
    fn write(&self, value: &Blake2b, writer: &mut ByteWriter) {
        writer.write_bytes(value.as_bytes());
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<Blake2b> {
        reader.read_array::<HASH_SIZE>().map(Blake2b::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool() {
        assert_eq!(BoolSerde.serialize(&true), vec![1]);
        assert!(!BoolSerde.deserialize(&[0]).unwrap());
        assert!(matches!(BoolSerde.deserialize(&[2]), Err(SerdeError::Validation(_))));
    }

    #[test]
    fn test_timestamp_is_fixed_width() {
        let ts = TimeStamp::unchecked(1_700_000_000_000);
        let bytes = TimeStampSerde.serialize(&ts);
        assert_eq!(bytes, 1_700_000_000_000i64.to_be_bytes().to_vec());
        assert_eq!(TimeStampSerde.deserialize(&bytes).unwrap(), ts);
        assert_eq!(TimeStampSerde.serialize(&TimeStamp::ZERO), vec![0u8; 8]);
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        let bytes = (-1i64).to_be_bytes();
        assert!(matches!(
            TimeStampSerde.deserialize(&bytes),
            Err(SerdeError::Validation(_))
        ));
    }

    #[test]
    fn test_gas_box() {
        assert_eq!(
            GasBoxSerde.serialize(&GasBox::unchecked(20000)),
            vec![0x80, 0x00, 0x4e, 0x20]
        );
        assert_eq!(
            GasBoxSerde.deserialize(&[0x80, 0x00, 0x4e, 0x20]).unwrap(),
            GasBox::unchecked(20000)
        );
        assert!(matches!(GasBoxSerde.deserialize(&[0x3f]), Err(SerdeError::Validation(_))));
    }

    #[test]
    fn test_hash() {
        let h = Blake2b::hash(b"abc");
        let bytes = HashSerde.serialize(&h);
        assert_eq!(bytes.len(), 32);
        assert_eq!(HashSerde.deserialize(&bytes).unwrap(), h);
        assert!(HashSerde.deserialize(&bytes[..31]).is_err());
    }

    #[test]
    fn test_u256_and_u32() {
        let v = U256::from(100_000_000_000u64);
        assert_eq!(U256Serde.serialize(&v), vec![0xc1, 0x17, 0x48, 0x76, 0xe8, 0x00]);
        assert_eq!(U32Serde.serialize(&U32::new(5)), vec![0x05]);
        assert_eq!(NetworkIdSerde.serialize(&NetworkId::TEST_NET), vec![0x01]);
    }
}
