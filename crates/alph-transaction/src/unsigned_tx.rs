//! Unsigned transaction type.
//!
//! Holds the fields a signer commits to: network, gas, inputs and fixed
//! outputs. The transaction id is the Blake2b-256 digest of the serialized
//! bytes and is recomputed on demand.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use alph_primitives::codec::{
    ByteReader, ByteWriter, GasBoxSerde, ListSerde, NetworkIdSerde, Serde, SerdeError,
    SerdeResult, U256Serde,
};
use alph_primitives::{Blake2b, GasBox, GasPrice, NetworkId};

use crate::input::TxInput;
use crate::output::{AssetOutput, AssetOutputSerde};
use crate::TransactionError;

/// The only transaction version produced.
pub const DEFAULT_TX_VERSION: u8 = 0;

const SCRIPT_NONE: u8 = 0x00;
const SCRIPT_SOME: u8 = 0x01;

// ---------------------------------------------------------------------------
// TransactionId
// ---------------------------------------------------------------------------

/// Blake2b-256 digest of a serialized unsigned transaction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Blake2b);

impl TransactionId {
    pub fn hash(&self) -> &Blake2b {
        &self.0
    }

    /// The 32 bytes a signer signs.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        Ok(TransactionId(Blake2b::from_hex(hex_str)?))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionId::from_hex(s)
    }
}

// ---------------------------------------------------------------------------
// UnsignedTransaction
// ---------------------------------------------------------------------------

/// A transaction before signatures are attached.
///
/// # Wire format
///
/// | Field         | Encoding                          |
/// |---------------|-----------------------------------|
/// | version       | 1 byte                            |
/// | network id    | 1 byte                            |
/// | script        | 1 byte, always `0x00` (none)      |
/// | gas amount    | signed compact                    |
/// | gas price     | unsigned compact U256             |
/// | inputs        | compact count + inputs            |
/// | fixed outputs | compact count + asset outputs     |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub version: u8,
    pub network_id: NetworkId,
    pub gas_amount: GasBox,
    pub gas_price: GasPrice,
    pub inputs: Vec<TxInput>,
    pub fixed_outputs: Vec<AssetOutput>,
}

impl UnsignedTransaction {
    /// Build a version-0 transaction.
    pub fn new(
        network_id: NetworkId,
        gas_amount: GasBox,
        gas_price: GasPrice,
        inputs: Vec<TxInput>,
        fixed_outputs: Vec<AssetOutput>,
    ) -> Self {
        UnsignedTransaction {
            version: DEFAULT_TX_VERSION,
            network_id,
            gas_amount,
            gas_price,
            inputs,
            fixed_outputs,
        }
    }

    /// Parse a transaction from a hex string.
    ///
    /// # Arguments
    /// * `hex_str` - Hex of the serialized transaction.
    ///
    /// # Returns
    /// The transaction, or an error if the hex is invalid, the bytes are
    /// malformed, or bytes are left over.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction spanning exactly `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        Ok(UnsignedTransactionSerde.deserialize(bytes)?)
    }

    /// Decode one transaction from the reader's current position.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        Ok(UnsignedTransactionSerde.read(reader)?)
    }

    /// Append the wire form to `writer`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        UnsignedTransactionSerde.write(self, writer);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        UnsignedTransactionSerde.serialize(self)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Compute the transaction id.
    ///
    /// # Returns
    /// The Blake2b-256 digest of [`to_bytes`](Self::to_bytes).
    pub fn id(&self) -> TransactionId {
        TransactionId(Blake2b::hash(&self.to_bytes()))
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.fixed_outputs.len()
    }
}

/// Codec for [`UnsignedTransaction`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsignedTransactionSerde;

impl Serde<UnsignedTransaction> for UnsignedTransactionSerde {
    fn write(&self, value: &UnsignedTransaction, writer: &mut ByteWriter) {
        writer.write_u8(value.version);
        NetworkIdSerde.write(&value.network_id, writer);
        writer.write_u8(SCRIPT_NONE);
        GasBoxSerde.write(&value.gas_amount, writer);
        U256Serde.write(value.gas_price.value(), writer);
        ListSerde(TxInput::serde()).write(&value.inputs, writer);
        ListSerde(AssetOutputSerde).write(&value.fixed_outputs, writer);
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> SerdeResult<UnsignedTransaction> {
        let version = reader.read_u8()?;
        let network_id = NetworkIdSerde.read(reader)?;
        match reader.read_u8()? {
            SCRIPT_NONE => {}
            SCRIPT_SOME => {
                return Err(SerdeError::Validation(
                    "Transaction scripts are not supported".to_string(),
                ))
            }
            flag => {
                return Err(SerdeError::WrongFormat(format!(
                    "Expect 0 or 1 for script flag, got {}",
                    flag
                )))
            }
        }
        let gas_amount = GasBoxSerde.read(reader)?;
        let gas_price = GasPrice::new(U256Serde.read(reader)?);
        let inputs = ListSerde(TxInput::serde()).read(reader)?;
        let fixed_outputs = ListSerde(AssetOutputSerde).read(reader)?;
        Ok(UnsignedTransaction {
            version,
            network_id,
            gas_amount,
            gas_price,
            inputs,
            fixed_outputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alph_primitives::U256;

    use crate::lockup::LockupScript;

    fn sample() -> UnsignedTransaction {
        let lockup = LockupScript::p2pkh(Blake2b::hash(b"owner"));
        UnsignedTransaction::new(
            NetworkId::TEST_NET,
            GasBox::unchecked(20_000),
            GasPrice::new(U256::from(100_000_000_000u64)),
            Vec::new(),
            vec![AssetOutput::new(U256::from(1_000u64), lockup)],
        )
    }

    #[test]
    fn test_header_bytes() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[..3], &[0x00, 0x01, 0x00]);
        assert_eq!(&bytes[3..7], &[0x80, 0x00, 0x4e, 0x20]);
        assert_eq!(&bytes[7..13], &[0xc1, 0x17, 0x48, 0x76, 0xe8, 0x00]);
        // empty input list
        assert_eq!(bytes[13], 0x00);
    }

    #[test]
    fn test_roundtrip_and_id() {
        let tx = sample();
        let decoded = UnsignedTransaction::from_hex(&tx.to_hex()).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.id(), tx.id());
        assert_eq!(tx.id().hash(), &Blake2b::hash(&tx.to_bytes()));
    }

    #[test]
    fn test_script_slot_decisions() {
        let mut bytes = sample().to_bytes();
        bytes[2] = 0x01;
        assert!(matches!(
            UnsignedTransaction::from_bytes(&bytes),
            Err(TransactionError::Serde(SerdeError::Validation(_)))
        ));
        bytes[2] = 0x05;
        assert!(matches!(
            UnsignedTransaction::from_bytes(&bytes),
            Err(TransactionError::Serde(SerdeError::WrongFormat(msg))) if msg.ends_with("got 5")
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = sample().to_bytes();
        bytes.push(0);
        assert!(matches!(
            UnsignedTransaction::from_bytes(&bytes),
            Err(TransactionError::Serde(SerdeError::Redundant { .. }))
        ));
    }

    #[test]
    fn test_read_from_leaves_rest() {
        let tx = sample();
        let mut bytes = tx.to_bytes();
        bytes.extend_from_slice(&[0xaa, 0xbb]);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(UnsignedTransaction::read_from(&mut reader).unwrap(), tx);
        assert_eq!(reader.rest(), &[0xaa, 0xbb]);
    }

    #[test]
    fn test_transaction_id_hex() {
        let id = sample().id();
        assert_eq!(id.to_string().parse::<TransactionId>().unwrap(), id);
        assert_eq!(id.as_bytes(), id.hash().as_bytes());
    }
}
