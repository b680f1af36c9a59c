//! Transaction model: typed bodies, per-type layouts, envelope codec.

use cinder_consensus::constants::{
    ADDRESS_SIZE, HASH_SIZE, KEY_SIZE, MODIFICATION_SIZE, MOSAIC_SIZE, SIZE_FIELD_WIDTH,
};
use cinder_consensus::EntityType;

use crate::aggregate::AggregateBody;
use crate::encoding::{CodecError, Decoder, Encoder};
use crate::header::{EmbeddedTransactionHeader, TransactionHeader};
use crate::layout::{to_array, u32_le, u64_le, BodyFields, BodyLayout, FieldSpec};

/// A mosaic quantity attached to a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mosaic {
    pub id: u64,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferBody {
    pub recipient_address: [u8; ADDRESS_SIZE],
    pub message: Vec<u8>,
    pub mosaics: Vec<Mosaic>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MosaicDefinitionBody {
    pub nonce: u32,
    pub id: u64,
    pub flags: u8,
    pub divisibility: u8,
    pub duration: u64,
}

/// Metadata attached to a namespace.
///
/// `value` holds the difference against any existing value; with no
/// existing value it is the value itself. Its length is not written to
/// the wire, it is inferred from the transaction's declared size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceMetadataBody {
    pub target_public_key: [u8; KEY_SIZE],
    pub scoped_metadata_key: u64,
    pub target_namespace_id: u64,
    pub value_size_delta: i16,
    pub value: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CosignatoryModification {
    pub action: u8,
    pub cosignatory_public_key: [u8; KEY_SIZE],
}

impl CosignatoryModification {
    pub const ACTION_ADD: u8 = 0;
    pub const ACTION_REMOVE: u8 = 1;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisigAccountModificationBody {
    pub min_removal_delta: i8,
    pub min_approval_delta: i8,
    pub modifications: Vec<CosignatoryModification>,
}

/// Tagged body variant, one case per registered transaction type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionBody {
    Transfer(TransferBody),
    MosaicDefinition(MosaicDefinitionBody),
    NamespaceMetadata(NamespaceMetadataBody),
    MultisigAccountModification(MultisigAccountModificationBody),
    Aggregate(AggregateBody),
}

const TRANSFER_LAYOUT: BodyLayout = BodyLayout {
    fields: &[
        FieldSpec::fixed("recipient_address", ADDRESS_SIZE),
        FieldSpec::count("message_size", 2, "message"),
        FieldSpec::count("mosaics_count", 1, "mosaics"),
        FieldSpec::elements("message", 1),
        FieldSpec::elements("mosaics", MOSAIC_SIZE),
    ],
};

const MOSAIC_DEFINITION_LAYOUT: BodyLayout = BodyLayout {
    fields: &[
        FieldSpec::fixed("nonce", 4),
        FieldSpec::fixed("id", 8),
        FieldSpec::fixed("flags", 1),
        FieldSpec::fixed("divisibility", 1),
        FieldSpec::fixed("duration", 8),
    ],
};

const MULTISIG_ACCOUNT_MODIFICATION_LAYOUT: BodyLayout = BodyLayout {
    fields: &[
        FieldSpec::fixed("min_removal_delta", 1),
        FieldSpec::fixed("min_approval_delta", 1),
        FieldSpec::count("modifications_count", 1, "modifications"),
        FieldSpec::elements("modifications", MODIFICATION_SIZE),
    ],
};

const NAMESPACE_METADATA_LAYOUT: BodyLayout = BodyLayout {
    fields: &[
        FieldSpec::fixed("target_public_key", KEY_SIZE),
        FieldSpec::fixed("scoped_metadata_key", 8),
        FieldSpec::fixed("target_namespace_id", 8),
        FieldSpec::fixed("value_size_delta", 2),
        FieldSpec::remaining("value"),
    ],
};

const AGGREGATE_LAYOUT: BodyLayout = BodyLayout {
    fields: &[
        FieldSpec::fixed("transactions_hash", HASH_SIZE),
        FieldSpec::count("payload_size", 4, "payload"),
        FieldSpec::elements("payload", 1),
        FieldSpec::remaining("cosignatures"),
    ],
};

/// Looks up the registered wire layout for a type tag.
pub fn body_layout(entity_type: EntityType) -> Option<&'static BodyLayout> {
    match entity_type {
        EntityType::TRANSFER => Some(&TRANSFER_LAYOUT),
        EntityType::MOSAIC_DEFINITION => Some(&MOSAIC_DEFINITION_LAYOUT),
        EntityType::MULTISIG_ACCOUNT_MODIFICATION => Some(&MULTISIG_ACCOUNT_MODIFICATION_LAYOUT),
        EntityType::NAMESPACE_METADATA => Some(&NAMESPACE_METADATA_LAYOUT),
        EntityType::AGGREGATE_COMPLETE | EntityType::AGGREGATE_BONDED => Some(&AGGREGATE_LAYOUT),
        _ => None,
    }
}

impl TransferBody {
    fn to_fields(&self) -> BodyFields {
        let mut fields = BodyFields::new();
        fields.push("recipient_address", self.recipient_address.to_vec());
        fields.push("message", self.message.clone());
        let mut mosaics = Vec::with_capacity(self.mosaics.len() * MOSAIC_SIZE);
        for mosaic in &self.mosaics {
            mosaics.extend_from_slice(&mosaic.id.to_le_bytes());
            mosaics.extend_from_slice(&mosaic.amount.to_le_bytes());
        }
        fields.push("mosaics", mosaics);
        fields
    }

    fn from_fields(fields: &BodyFields) -> Result<Self, CodecError> {
        let recipient_address =
            to_array::<ADDRESS_SIZE>(fields.get("recipient_address")?, "recipient_address")?;
        let message = fields.get("message")?.to_vec();
        let data = fields.get("mosaics")?;
        let mut mosaics = Vec::with_capacity(data.len() / MOSAIC_SIZE);
        for chunk in data.chunks_exact(MOSAIC_SIZE) {
            mosaics.push(Mosaic {
                id: u64_le(&chunk[..8], "mosaic_id")?,
                amount: u64_le(&chunk[8..], "mosaic_amount")?,
            });
        }
        Ok(Self {
            recipient_address,
            message,
            mosaics,
        })
    }
}

impl MosaicDefinitionBody {
    fn to_fields(&self) -> BodyFields {
        let mut fields = BodyFields::new();
        fields.push("nonce", self.nonce.to_le_bytes().to_vec());
        fields.push("id", self.id.to_le_bytes().to_vec());
        fields.push("flags", vec![self.flags]);
        fields.push("divisibility", vec![self.divisibility]);
        fields.push("duration", self.duration.to_le_bytes().to_vec());
        fields
    }

    fn from_fields(fields: &BodyFields) -> Result<Self, CodecError> {
        Ok(Self {
            nonce: u32_le(fields.get("nonce")?, "nonce")?,
            id: u64_le(fields.get("id")?, "id")?,
            flags: to_array::<1>(fields.get("flags")?, "flags")?[0],
            divisibility: to_array::<1>(fields.get("divisibility")?, "divisibility")?[0],
            duration: u64_le(fields.get("duration")?, "duration")?,
        })
    }
}

impl NamespaceMetadataBody {
    fn to_fields(&self) -> BodyFields {
        let mut fields = BodyFields::new();
        fields.push("target_public_key", self.target_public_key.to_vec());
        fields.push(
            "scoped_metadata_key",
            self.scoped_metadata_key.to_le_bytes().to_vec(),
        );
        fields.push(
            "target_namespace_id",
            self.target_namespace_id.to_le_bytes().to_vec(),
        );
        fields.push(
            "value_size_delta",
            self.value_size_delta.to_le_bytes().to_vec(),
        );
        fields.push("value", self.value.clone());
        fields
    }

    fn from_fields(fields: &BodyFields) -> Result<Self, CodecError> {
        let target_public_key =
            to_array::<KEY_SIZE>(fields.get("target_public_key")?, "target_public_key")?;
        let value_size_delta = i16::from_le_bytes(to_array::<2>(
            fields.get("value_size_delta")?,
            "value_size_delta",
        )?);
        Ok(Self {
            target_public_key,
            scoped_metadata_key: u64_le(fields.get("scoped_metadata_key")?, "scoped_metadata_key")?,
            target_namespace_id: u64_le(fields.get("target_namespace_id")?, "target_namespace_id")?,
            value_size_delta,
            value: fields.get("value")?.to_vec(),
        })
    }
}

impl MultisigAccountModificationBody {
    fn to_fields(&self) -> BodyFields {
        let mut fields = BodyFields::new();
        fields.push("min_removal_delta", vec![self.min_removal_delta as u8]);
        fields.push("min_approval_delta", vec![self.min_approval_delta as u8]);
        let mut modifications = Vec::with_capacity(self.modifications.len() * MODIFICATION_SIZE);
        for modification in &self.modifications {
            modifications.push(modification.action);
            modifications.extend_from_slice(&modification.cosignatory_public_key);
        }
        fields.push("modifications", modifications);
        fields
    }

    fn from_fields(fields: &BodyFields) -> Result<Self, CodecError> {
        let min_removal_delta =
            to_array::<1>(fields.get("min_removal_delta")?, "min_removal_delta")?[0] as i8;
        let min_approval_delta =
            to_array::<1>(fields.get("min_approval_delta")?, "min_approval_delta")?[0] as i8;
        let data = fields.get("modifications")?;
        let mut modifications = Vec::with_capacity(data.len() / MODIFICATION_SIZE);
        for chunk in data.chunks_exact(MODIFICATION_SIZE) {
            modifications.push(CosignatoryModification {
                action: chunk[0],
                cosignatory_public_key: to_array::<KEY_SIZE>(
                    &chunk[1..],
                    "cosignatory_public_key",
                )?,
            });
        }
        Ok(Self {
            min_removal_delta,
            min_approval_delta,
            modifications,
        })
    }
}

impl TransactionBody {
    fn to_fields(&self) -> Result<BodyFields, CodecError> {
        match self {
            Self::Transfer(body) => Ok(body.to_fields()),
            Self::MosaicDefinition(body) => Ok(body.to_fields()),
            Self::NamespaceMetadata(body) => Ok(body.to_fields()),
            Self::MultisigAccountModification(body) => Ok(body.to_fields()),
            Self::Aggregate(body) => body.to_fields(),
        }
    }

    fn from_fields(entity_type: EntityType, fields: &BodyFields) -> Result<Self, CodecError> {
        match entity_type {
            EntityType::TRANSFER => Ok(Self::Transfer(TransferBody::from_fields(fields)?)),
            EntityType::MOSAIC_DEFINITION => Ok(Self::MosaicDefinition(
                MosaicDefinitionBody::from_fields(fields)?,
            )),
            EntityType::MULTISIG_ACCOUNT_MODIFICATION => Ok(Self::MultisigAccountModification(
                MultisigAccountModificationBody::from_fields(fields)?,
            )),
            EntityType::NAMESPACE_METADATA => Ok(Self::NamespaceMetadata(
                NamespaceMetadataBody::from_fields(fields)?,
            )),
            EntityType::AGGREGATE_COMPLETE | EntityType::AGGREGATE_BONDED => {
                Ok(Self::Aggregate(AggregateBody::from_fields(fields)?))
            }
            _ => Err(CodecError::UnsupportedType {
                type_tag: entity_type.0,
            }),
        }
    }

    fn matches_type(&self, entity_type: EntityType) -> bool {
        match self {
            Self::Transfer(_) => entity_type == EntityType::TRANSFER,
            Self::MosaicDefinition(_) => entity_type == EntityType::MOSAIC_DEFINITION,
            Self::NamespaceMetadata(_) => entity_type == EntityType::NAMESPACE_METADATA,
            Self::MultisigAccountModification(_) => {
                entity_type == EntityType::MULTISIG_ACCOUNT_MODIFICATION
            }
            Self::Aggregate(_) => entity_type.is_aggregate(),
        }
    }
}

/// A top-level transaction: common header plus typed body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub header: TransactionHeader,
    pub body: TransactionBody,
}

impl Transaction {
    /// The declared total size of the serialized transaction, computed
    /// without producing any output.
    pub fn size(&self) -> Result<usize, CodecError> {
        let (layout, fields) = self.checked_fields()?;
        Ok(SIZE_FIELD_WIDTH + TransactionHeader::SIZE + layout.measure(&fields)?)
    }

    pub fn serialize(&self) -> Result<Vec<u8>, CodecError> {
        let (layout, fields) = self.checked_fields()?;
        let total = SIZE_FIELD_WIDTH + TransactionHeader::SIZE + layout.measure(&fields)?;
        let size = u32::try_from(total).map_err(|_| CodecError::InvalidField {
            field: "size",
            reason: "transaction exceeds size field range",
        })?;
        let mut encoder = Encoder::with_capacity(total);
        encoder.write_u32_le(size);
        self.header.encode(&mut encoder);
        layout.encode(&fields, &mut encoder)?;
        let bytes = encoder.into_inner();
        if bytes.len() != total {
            return Err(CodecError::InvalidField {
                field: "size",
                reason: "serialized size disagrees with declared size",
            });
        }
        Ok(bytes)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut decoder = Decoder::new(bytes);
        let declared = decoder.read_u32_le("size")? as usize;
        if declared < SIZE_FIELD_WIDTH + TransactionHeader::SIZE {
            return Err(CodecError::InvalidField {
                field: "size",
                reason: "size below transaction preamble",
            });
        }
        if bytes.len() < declared {
            return Err(CodecError::Truncated {
                field: "transaction",
                offset: bytes.len(),
            });
        }
        if bytes.len() > declared {
            return Err(CodecError::InvalidField {
                field: "size",
                reason: "trailing bytes after declared size",
            });
        }
        let header = TransactionHeader::decode(&mut decoder)?;
        let layout = body_layout(header.entity_type).ok_or(CodecError::UnsupportedType {
            type_tag: header.entity_type.0,
        })?;
        let body_size = declared - SIZE_FIELD_WIDTH - TransactionHeader::SIZE;
        let fields = layout.decode(&mut decoder, body_size)?;
        let body = TransactionBody::from_fields(header.entity_type, &fields)?;
        Ok(Self { header, body })
    }

    fn checked_fields(&self) -> Result<(&'static BodyLayout, BodyFields), CodecError> {
        let layout = body_layout(self.header.entity_type).ok_or(CodecError::UnsupportedType {
            type_tag: self.header.entity_type.0,
        })?;
        if !self.body.matches_type(self.header.entity_type) {
            return Err(CodecError::InvalidField {
                field: "type_tag",
                reason: "body does not match type tag",
            });
        }
        Ok((layout, self.body.to_fields()?))
    }
}

/// A transaction embedded inside an aggregate: reduced header, same body
/// layouts, never itself an aggregate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddedTransaction {
    pub header: EmbeddedTransactionHeader,
    pub body: TransactionBody,
}

impl EmbeddedTransaction {
    /// The declared total size of the unpadded serialization.
    pub fn size(&self) -> Result<usize, CodecError> {
        let (layout, fields) = self.checked_fields()?;
        Ok(SIZE_FIELD_WIDTH + EmbeddedTransactionHeader::SIZE + layout.measure(&fields)?)
    }

    pub fn serialize(&self) -> Result<Vec<u8>, CodecError> {
        let (layout, fields) = self.checked_fields()?;
        let total = SIZE_FIELD_WIDTH + EmbeddedTransactionHeader::SIZE + layout.measure(&fields)?;
        let size = u32::try_from(total).map_err(|_| CodecError::InvalidField {
            field: "size",
            reason: "transaction exceeds size field range",
        })?;
        let mut encoder = Encoder::with_capacity(total);
        encoder.write_u32_le(size);
        self.header.encode(&mut encoder);
        layout.encode(&fields, &mut encoder)?;
        let bytes = encoder.into_inner();
        if bytes.len() != total {
            return Err(CodecError::InvalidField {
                field: "size",
                reason: "serialized size disagrees with declared size",
            });
        }
        Ok(bytes)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut decoder = Decoder::new(bytes);
        let declared = decoder.read_u32_le("size")? as usize;
        if declared < SIZE_FIELD_WIDTH + EmbeddedTransactionHeader::SIZE {
            return Err(CodecError::InvalidField {
                field: "size",
                reason: "size below embedded preamble",
            });
        }
        if bytes.len() < declared {
            return Err(CodecError::Truncated {
                field: "embedded_transaction",
                offset: bytes.len(),
            });
        }
        if bytes.len() > declared {
            return Err(CodecError::InvalidField {
                field: "size",
                reason: "trailing bytes after declared size",
            });
        }
        let header = EmbeddedTransactionHeader::decode(&mut decoder)?;
        if header.entity_type.is_aggregate() {
            return Err(CodecError::UnsupportedType {
                type_tag: header.entity_type.0,
            });
        }
        let layout = body_layout(header.entity_type).ok_or(CodecError::UnsupportedType {
            type_tag: header.entity_type.0,
        })?;
        let body_size = declared - SIZE_FIELD_WIDTH - EmbeddedTransactionHeader::SIZE;
        let fields = layout.decode(&mut decoder, body_size)?;
        let body = TransactionBody::from_fields(header.entity_type, &fields)?;
        Ok(Self { header, body })
    }

    fn checked_fields(&self) -> Result<(&'static BodyLayout, BodyFields), CodecError> {
        if self.header.entity_type.is_aggregate() {
            return Err(CodecError::InvalidField {
                field: "type_tag",
                reason: "aggregates cannot be embedded",
            });
        }
        let layout = body_layout(self.header.entity_type).ok_or(CodecError::UnsupportedType {
            type_tag: self.header.entity_type.0,
        })?;
        if !self.body.matches_type(self.header.entity_type) {
            return Err(CodecError::InvalidField {
                field: "type_tag",
                reason: "body does not match type tag",
            });
        }
        Ok((layout, self.body.to_fields()?))
    }
}
