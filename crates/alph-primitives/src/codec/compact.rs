//! Variable-length integer encoding.
//!
//! The two most significant bits of the first byte select the mode:
//!
//! | bits | mode        | body                                  |
//! |------|-------------|---------------------------------------|
//! | `00` | single byte | 1 byte                                |
//! | `01` | two bytes   | 2 bytes                               |
//! | `10` | four bytes  | 4 bytes                               |
//! | `11` | multi byte  | header + `(header & 0x3f) + 4` bytes  |
//!
//! Unsigned values use the remaining 6 (14, 30) bits as magnitude. Signed
//! values additionally reserve bit `0x20` of the first byte as sign flag,
//! and negative values are stored in two's complement with the mode bits
//! xor-ed in.

use super::{ByteReader, ByteWriter, SerdeError, SerdeResult};
use crate::{U256, U32};

const MASK_MODE: u8 = 0x3f;
const MASK_MODE_NEG: i32 = 0xffff_ffc0_u32 as i32;

const SINGLE_BYTE_PREFIX: u8 = 0x00;
const TWO_BYTE_PREFIX: u8 = 0x40;
const FOUR_BYTE_PREFIX: u8 = 0x80;
const MULTI_BYTE_PREFIX: u8 = 0xc0;

const SINGLE_BYTE_NEG_PREFIX: i32 = 0xc0;
const TWO_BYTE_NEG_PREFIX: i32 = 0x80;
const FOUR_BYTE_NEG_PREFIX: i32 = 0x40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    SingleByte,
    TwoByte,
    FourByte,
    MultiByte,
}

/// Split the next compact integer off the reader.
///
/// # Returns
/// The mode and the full body, header byte included.
fn read_body<'a>(reader: &mut ByteReader<'a>) -> SerdeResult<(Mode, &'a [u8])> {
    let first = reader.peek_u8()?;
    let (mode, len) = match first & 0xc0 {
        SINGLE_BYTE_PREFIX => (Mode::SingleByte, 1),
        TWO_BYTE_PREFIX => (Mode::TwoByte, 2),
        FOUR_BYTE_PREFIX => (Mode::FourByte, 4),
        _ => (Mode::MultiByte, usize::from(first & MASK_MODE) + 4 + 1),
    };
    let body = reader.read_bytes(len)?;
    Ok((mode, body))
}

fn be_i32(bytes: &[u8]) -> i32 {
    let mut arr = [0u8; 4];
    arr.copy_from_slice(bytes);
    i32::from_be_bytes(arr)
}

fn be_i64(bytes: &[u8]) -> i64 {
    let mut arr = [0u8; 8];
    arr.copy_from_slice(bytes);
    i64::from_be_bytes(arr)
}

// ---------------------------------------------------------------------------
// Unsigned
// ---------------------------------------------------------------------------

const U_ONE_BYTE_BOUND: u32 = 0x40;
const U_TWO_BYTE_BOUND: u32 = U_ONE_BYTE_BOUND << 8;
const U_FOUR_BYTE_BOUND: u32 = U_ONE_BYTE_BOUND << 24;

/// Append the compact encoding of an unsigned 32-bit value.
pub fn write_u32(n: U32, writer: &mut ByteWriter) {
    let v = n.value();
    if v < U_ONE_BYTE_BOUND {
        writer.write_u8(v as u8 + SINGLE_BYTE_PREFIX);
    } else if v < U_TWO_BYTE_BOUND {
        writer.write_u8((v >> 8) as u8 + TWO_BYTE_PREFIX);
        writer.write_u8(v as u8);
    } else if v < U_FOUR_BYTE_BOUND {
        writer.write_u8((v >> 24) as u8 + FOUR_BYTE_PREFIX);
        writer.write_u8((v >> 16) as u8);
        writer.write_u8((v >> 8) as u8);
        writer.write_u8(v as u8);
    } else {
        writer.write_u8(MULTI_BYTE_PREFIX);
        writer.write_bytes(&v.to_be_bytes());
    }
}

/// Append the compact encoding of an unsigned 256-bit value.
///
/// Values of `2^30` and above use multi-byte mode with the minimal
/// big-endian magnitude.
pub fn write_u256(n: &U256, writer: &mut ByteWriter) {
    match n.to_u32() {
        Some(v) if v < U_FOUR_BYTE_BOUND => write_u32(U32::new(v), writer),
        _ => {
            let data = n.to_be_bytes();
            writer.write_u8((data.len() - 4) as u8 + MULTI_BYTE_PREFIX);
            writer.write_bytes(&data);
        }
    }
}

fn fixed_width_unsigned(mode: Mode, body: &[u8]) -> u32 {
    match mode {
        Mode::SingleByte => u32::from(body[0]),
        Mode::TwoByte => (u32::from(body[0] & MASK_MODE) << 8) | u32::from(body[1]),
        _ => {
            (u32::from(body[0] & MASK_MODE) << 24)
                | (u32::from(body[1]) << 16)
                | (u32::from(body[2]) << 8)
                | u32::from(body[3])
        }
    }
}

/// Decode an unsigned 32-bit value.
///
/// Multi-byte encodings must carry exactly four magnitude bytes.
pub fn read_u32(reader: &mut ByteReader<'_>) -> SerdeResult<U32> {
    let (mode, body) = read_body(reader)?;
    match mode {
        Mode::MultiByte if body.len() == 5 => Ok(U32::new(be_i32(&body[1..]) as u32)),
        Mode::MultiByte => Err(SerdeError::WrongFormat(format!(
            "Expect 4 bytes int, but got {} bytes int",
            body.len() - 1
        ))),
        _ => Ok(U32::new(fixed_width_unsigned(mode, body))),
    }
}

/// Decode an unsigned 256-bit value.
pub fn read_u256(reader: &mut ByteReader<'_>) -> SerdeResult<U256> {
    let (mode, body) = read_body(reader)?;
    match mode {
        Mode::MultiByte => U256::from_be_bytes(&body[1..]).ok_or_else(|| {
            SerdeError::WrongFormat(format!("Expect U256, but got {} bytes", body.len() - 1))
        }),
        _ => Ok(U256::from(fixed_width_unsigned(mode, body))),
    }
}

// ---------------------------------------------------------------------------
// Signed
// ---------------------------------------------------------------------------

const SIGN_FLAG: u8 = 0x20;
const S_ONE_BYTE_BOUND: i32 = 0x20;
const S_TWO_BYTE_BOUND: i32 = S_ONE_BYTE_BOUND << 8;
const S_FOUR_BYTE_BOUND: i32 = S_ONE_BYTE_BOUND << 24;

/// Append the compact encoding of a signed 32-bit value.
pub fn write_i32(n: i32, writer: &mut ByteWriter) {
    if n >= 0 {
        if n < S_ONE_BYTE_BOUND {
            writer.write_u8(n as u8 + SINGLE_BYTE_PREFIX);
        } else if n < S_TWO_BYTE_BOUND {
            writer.write_u8((n >> 8) as u8 + TWO_BYTE_PREFIX);
            writer.write_u8(n as u8);
        } else if n < S_FOUR_BYTE_BOUND {
            writer.write_u8((n >> 24) as u8 + FOUR_BYTE_PREFIX);
            writer.write_u8((n >> 16) as u8);
            writer.write_u8((n >> 8) as u8);
            writer.write_u8(n as u8);
        } else {
            writer.write_u8(MULTI_BYTE_PREFIX);
            writer.write_i32_be(n);
        }
    } else if n >= -S_ONE_BYTE_BOUND {
        writer.write_u8((n ^ SINGLE_BYTE_NEG_PREFIX) as u8);
    } else if n >= -S_TWO_BYTE_BOUND {
        writer.write_u8(((n >> 8) ^ TWO_BYTE_NEG_PREFIX) as u8);
        writer.write_u8(n as u8);
    } else if n >= -S_FOUR_BYTE_BOUND {
        writer.write_u8(((n >> 24) ^ FOUR_BYTE_NEG_PREFIX) as u8);
        writer.write_u8((n >> 16) as u8);
        writer.write_u8((n >> 8) as u8);
        writer.write_u8(n as u8);
    } else {
        writer.write_u8(MULTI_BYTE_PREFIX);
        writer.write_i32_be(n);
    }
}

/// Append the compact encoding of a signed 64-bit value.
///
/// Values outside `[-2^29, 2^29)` use multi-byte mode with all 8 bytes.
pub fn write_i64(n: i64, writer: &mut ByteWriter) {
    if (-0x2000_0000..0x2000_0000).contains(&n) {
        write_i32(n as i32, writer);
    } else {
        writer.write_u8(4 | MULTI_BYTE_PREFIX);
        writer.write_i64_be(n);
    }
}

fn fixed_width_signed(mode: Mode, body: &[u8]) -> i32 {
    let positive = body[0] & SIGN_FLAG == 0;
    if positive {
        fixed_width_unsigned(mode, body) as i32
    } else {
        let head = i32::from(body[0]) | MASK_MODE_NEG;
        match mode {
            Mode::SingleByte => head,
            Mode::TwoByte => (head << 8) | i32::from(body[1]),
            _ => {
                (head << 24)
                    | (i32::from(body[1]) << 16)
                    | (i32::from(body[2]) << 8)
                    | i32::from(body[3])
            }
        }
    }
}

/// Decode a signed 32-bit value.
pub fn read_i32(reader: &mut ByteReader<'_>) -> SerdeResult<i32> {
    let (mode, body) = read_body(reader)?;
    match mode {
        Mode::MultiByte if body.len() == 5 => Ok(be_i32(&body[1..])),
        Mode::MultiByte => Err(SerdeError::WrongFormat(format!(
            "Expect 4 bytes int, but got {} bytes int",
            body.len() - 1
        ))),
        _ => Ok(fixed_width_signed(mode, body)),
    }
}

/// Decode a signed 64-bit value.
pub fn read_i64(reader: &mut ByteReader<'_>) -> SerdeResult<i64> {
    let (mode, body) = read_body(reader)?;
    match mode {
        Mode::MultiByte if body.len() == 9 => Ok(be_i64(&body[1..])),
        Mode::MultiByte => Err(SerdeError::WrongFormat(format!(
            "Expect 8 bytes long, but got {} bytes long",
            body.len() - 1
        ))),
        _ => Ok(i64::from(fixed_width_signed(mode, body))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc_i32(n: i32) -> Vec<u8> {
        let mut w = ByteWriter::new();
        write_i32(n, &mut w);
        w.into_bytes()
    }

    fn enc_u256(n: &U256) -> Vec<u8> {
        let mut w = ByteWriter::new();
        write_u256(n, &mut w);
        w.into_bytes()
    }

    fn dec_i32(bytes: &[u8]) -> SerdeResult<i32> {
        read_i32(&mut ByteReader::new(bytes))
    }

    #[test]
    fn test_signed_known_encodings() {
        assert_eq!(enc_i32(0), vec![0x00]);
        assert_eq!(enc_i32(31), vec![0x1f]);
        assert_eq!(enc_i32(32), vec![0x40, 0x20]);
        assert_eq!(enc_i32(-1), vec![0x3f]);
        assert_eq!(enc_i32(-32), vec![0x20]);
        assert_eq!(enc_i32(-33), vec![0x7f, 0xdf]);
        assert_eq!(enc_i32(20000), vec![0x80, 0x00, 0x4e, 0x20]);
        assert_eq!(enc_i32(i32::MAX), vec![0xc0, 0x7f, 0xff, 0xff, 0xff]);
        assert_eq!(enc_i32(i32::MIN), vec![0xc0, 0x80, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_signed_boundaries_decode_back() {
        for n in [
            0, 1, -1, 31, 32, -32, -33, 0x1fff, 0x2000, -0x2000, -0x2001,
            0x1fff_ffff, 0x2000_0000, -0x2000_0000, -0x2000_0001, i32::MAX, i32::MIN,
        ] {
            assert_eq!(dec_i32(&enc_i32(n)).unwrap(), n, "value {}", n);
        }
    }

    #[test]
    fn test_i64_wide_values() {
        let mut w = ByteWriter::new();
        write_i64(1 << 40, &mut w);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 9);
        assert_eq!(bytes[0], 0xc4);
        assert_eq!(read_i64(&mut ByteReader::new(&bytes)).unwrap(), 1 << 40);

        let mut w = ByteWriter::new();
        write_i64(-5, &mut w);
        assert_eq!(w.as_bytes(), &[0x3b]);
    }

    #[test]
    fn test_u256_known_encodings() {
        assert_eq!(enc_u256(&U256::from(0u64)), vec![0x00]);
        assert_eq!(enc_u256(&U256::from(0x3fu64)), vec![0x3f]);
        assert_eq!(enc_u256(&U256::from(0x40u64)), vec![0x40, 0x40]);
        assert_eq!(
            enc_u256(&U256::from(100_000_000_000u64)),
            vec![0xc1, 0x17, 0x48, 0x76, 0xe8, 0x00]
        );
        assert_eq!(
            enc_u256(&U256::from(4_966_000_000_000_000_000u64)),
            vec![0xc4, 0x44, 0xea, 0xc6, 0xb0, 0x62, 0x97, 0x00, 0x00]
        );
        let max = enc_u256(&U256::max_value());
        assert_eq!(max.len(), 33);
        assert_eq!(max[0], 0xc0 + 28);
    }

    #[test]
    fn test_u256_decode() {
        let bytes = [0xc1, 0x17, 0x48, 0x76, 0xe8, 0x00];
        let mut r = ByteReader::new(&bytes);
        assert_eq!(read_u256(&mut r).unwrap(), U256::from(100_000_000_000u64));
        assert_eq!(r.remaining(), 0);

        let max = enc_u256(&U256::max_value());
        assert_eq!(read_u256(&mut ByteReader::new(&max)).unwrap(), U256::max_value());
    }

    #[test]
    fn test_u256_above_256_bits_is_rejected() {
        // header 0xdd announces 33 magnitude bytes
        let mut bytes = vec![0xdd];
        bytes.extend_from_slice(&[0xff; 33]);
        assert!(matches!(
            read_u256(&mut ByteReader::new(&bytes)),
            Err(SerdeError::WrongFormat(_))
        ));
    }

    #[test]
    fn test_u32_requires_four_byte_body() {
        let mut w = ByteWriter::new();
        write_u32(U32::MAX, &mut w);
        assert_eq!(w.as_bytes(), &[0xc0, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(read_u32(&mut ByteReader::new(w.as_bytes())).unwrap(), U32::MAX);

        let six = [0xc1, 0x01, 0x00, 0x00, 0x00, 0x00];
        assert!(matches!(
            read_u32(&mut ByteReader::new(&six)),
            Err(SerdeError::WrongFormat(_))
        ));
    }

    #[test]
    fn test_truncated_body() {
        assert_eq!(
            dec_i32(&[0x80, 0x00]),
            Err(SerdeError::IncompleteData { expected: 4, got: 2 })
        );
        assert_eq!(
            dec_i32(&[]),
            Err(SerdeError::IncompleteData { expected: 1, got: 0 })
        );
    }
}
