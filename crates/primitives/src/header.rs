//! Common transaction preambles.
//!
//! The u32 size prefix that precedes both preambles on the wire belongs
//! to the transaction envelope, not the header codec; header sizes are
//! constant per kind.

use cinder_consensus::constants::{
    EMBEDDED_HEADER_SIZE, KEY_SIZE, SIGNATURE_SIZE, SIZE_FIELD_WIDTH, TRANSACTION_HEADER_SIZE,
};
use cinder_consensus::{EntityType, NetworkType};

use crate::encoding::{CodecError, Decoder, Encoder};

/// Preamble shared by all top-level transactions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionHeader {
    pub signature: [u8; SIGNATURE_SIZE],
    pub signer_public_key: [u8; KEY_SIZE],
    pub version: u8,
    pub network: NetworkType,
    pub entity_type: EntityType,
    pub max_fee: u64,
    pub deadline: u64,
}

impl TransactionHeader {
    /// Encoded preamble width, excluding the size prefix.
    pub const SIZE: usize = TRANSACTION_HEADER_SIZE - SIZE_FIELD_WIDTH;

    pub fn encode(&self, encoder: &mut Encoder) {
        encoder.write_bytes(&self.signature);
        encoder.write_bytes(&self.signer_public_key);
        encoder.write_u8(self.version);
        encoder.write_u8(self.network.0);
        encoder.write_u16_le(self.entity_type.0);
        encoder.write_u64_le(self.max_fee);
        encoder.write_u64_le(self.deadline);
    }

    pub fn decode(decoder: &mut Decoder<'_>) -> Result<Self, CodecError> {
        let signature = decoder.read_fixed::<SIGNATURE_SIZE>("signature")?;
        let signer_public_key = decoder.read_fixed::<KEY_SIZE>("signer_public_key")?;
        let version = decoder.read_u8("version")?;
        let network = NetworkType(decoder.read_u8("network_type")?);
        let entity_type = EntityType(decoder.read_u16_le("type_tag")?);
        let max_fee = decoder.read_u64_le("max_fee")?;
        let deadline = decoder.read_u64_le("deadline")?;
        Ok(Self {
            signature,
            signer_public_key,
            version,
            network,
            entity_type,
            max_fee,
            deadline,
        })
    }
}

/// Reduced preamble carried by transactions embedded in an aggregate.
///
/// No signature, fee, or deadline; the enclosing aggregate owns those.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddedTransactionHeader {
    pub signer_public_key: [u8; KEY_SIZE],
    pub version: u8,
    pub network: NetworkType,
    pub entity_type: EntityType,
}

impl EmbeddedTransactionHeader {
    /// Encoded preamble width, excluding the size prefix.
    pub const SIZE: usize = EMBEDDED_HEADER_SIZE - SIZE_FIELD_WIDTH;

    pub fn encode(&self, encoder: &mut Encoder) {
        encoder.write_bytes(&self.signer_public_key);
        encoder.write_u8(self.version);
        encoder.write_u8(self.network.0);
        encoder.write_u16_le(self.entity_type.0);
    }

    pub fn decode(decoder: &mut Decoder<'_>) -> Result<Self, CodecError> {
        let signer_public_key = decoder.read_fixed::<KEY_SIZE>("signer_public_key")?;
        let version = decoder.read_u8("version")?;
        let network = NetworkType(decoder.read_u8("network_type")?);
        let entity_type = EntityType(decoder.read_u16_le("type_tag")?);
        Ok(Self {
            signer_public_key,
            version,
            network,
            entity_type,
        })
    }
}
