//! Aggregate body and embedded-transaction framing.
//!
//! Embedded transactions sit in one contiguous payload, each padded with
//! zeros to the next 8-byte boundary. The padding is wire-only: it is
//! excluded from every embedded transaction's declared size and from the
//! Merkle leaves.

use cinder_consensus::constants::{
    COSIGNATURE_SIZE, EMBEDDED_ALIGNMENT, EMBEDDED_HEADER_SIZE, HASH_SIZE, KEY_SIZE,
    MAX_EMBEDDED_TRANSACTIONS, SIGNATURE_SIZE, SIZE_FIELD_WIDTH,
};
use cinder_consensus::Hash256;

use crate::encoding::CodecError;
use crate::hash::Digest32;
use crate::layout::{to_array, BodyFields};
use crate::merkle::compute_transactions_hash;
use crate::transaction::EmbeddedTransaction;

/// A cosigner's signature over an aggregate's transactions hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cosignature {
    pub signer_public_key: [u8; KEY_SIZE],
    pub signature: [u8; SIGNATURE_SIZE],
}

/// Body of an aggregate transaction: the commitment hash over the inner
/// transactions, the inner transactions themselves, and any cosignatures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateBody {
    pub transactions_hash: Hash256,
    pub transactions: Vec<EmbeddedTransaction>,
    pub cosignatures: Vec<Cosignature>,
}

impl AggregateBody {
    /// Builds an aggregate body with `transactions_hash` computed from
    /// the inner transactions using the supplied digest.
    pub fn compute<D: Digest32>(
        transactions: Vec<EmbeddedTransaction>,
        cosignatures: Vec<Cosignature>,
        digest: &D,
    ) -> Result<Self, CodecError> {
        let transactions_hash = compute_transactions_hash(&transactions, digest)?;
        Ok(Self {
            transactions_hash,
            transactions,
            cosignatures,
        })
    }

    pub(crate) fn to_fields(&self) -> Result<BodyFields, CodecError> {
        let mut fields = BodyFields::new();
        fields.push("transactions_hash", self.transactions_hash.to_vec());
        fields.push("payload", pack_transactions(&self.transactions)?);
        let mut cosignatures = Vec::with_capacity(self.cosignatures.len() * COSIGNATURE_SIZE);
        for cosignature in &self.cosignatures {
            cosignatures.extend_from_slice(&cosignature.signer_public_key);
            cosignatures.extend_from_slice(&cosignature.signature);
        }
        fields.push("cosignatures", cosignatures);
        Ok(fields)
    }

    pub(crate) fn from_fields(fields: &BodyFields) -> Result<Self, CodecError> {
        let transactions_hash =
            to_array::<HASH_SIZE>(fields.get("transactions_hash")?, "transactions_hash")?;
        let transactions = unpack_transactions(fields.get("payload")?)?;
        let data = fields.get("cosignatures")?;
        if data.len() % COSIGNATURE_SIZE != 0 {
            return Err(CodecError::InvalidField {
                field: "cosignatures",
                reason: "not a whole number of cosignatures",
            });
        }
        let mut cosignatures = Vec::with_capacity(data.len() / COSIGNATURE_SIZE);
        for chunk in data.chunks_exact(COSIGNATURE_SIZE) {
            cosignatures.push(Cosignature {
                signer_public_key: to_array::<KEY_SIZE>(&chunk[..KEY_SIZE], "signer_public_key")?,
                signature: to_array::<SIGNATURE_SIZE>(&chunk[KEY_SIZE..], "signature")?,
            });
        }
        Ok(Self {
            transactions_hash,
            transactions,
            cosignatures,
        })
    }
}

/// The smallest multiple of the embedded alignment at or above `size`.
pub const fn padded_size(size: usize) -> usize {
    (size + EMBEDDED_ALIGNMENT - 1) / EMBEDDED_ALIGNMENT * EMBEDDED_ALIGNMENT
}

/// Serializes embedded transactions into one contiguous payload, zero
/// padding each (the last included) to the next 8-byte boundary.
pub fn pack_transactions(transactions: &[EmbeddedTransaction]) -> Result<Vec<u8>, CodecError> {
    if transactions.len() > MAX_EMBEDDED_TRANSACTIONS {
        return Err(CodecError::InvalidField {
            field: "transactions",
            reason: "too many embedded transactions",
        });
    }
    let mut out = Vec::new();
    for transaction in transactions {
        let bytes = transaction.serialize()?;
        let padded = padded_size(bytes.len());
        out.reserve(padded);
        out.extend_from_slice(&bytes);
        out.resize(out.len() + (padded - bytes.len()), 0);
    }
    Ok(out)
}

/// Walks a payload by each embedded transaction's leading size field,
/// skipping to the next 8-byte boundary after each, until the payload is
/// exhausted exactly.
pub fn unpack_transactions(payload: &[u8]) -> Result<Vec<EmbeddedTransaction>, CodecError> {
    let mut transactions = Vec::new();
    let mut offset = 0usize;
    while offset < payload.len() {
        if transactions.len() == MAX_EMBEDDED_TRANSACTIONS {
            return Err(CodecError::InvalidField {
                field: "transactions",
                reason: "too many embedded transactions",
            });
        }
        let remaining = &payload[offset..];
        if remaining.len() < SIZE_FIELD_WIDTH {
            return Err(CodecError::Truncated {
                field: "embedded_size",
                offset,
            });
        }
        let size =
            u32::from_le_bytes([remaining[0], remaining[1], remaining[2], remaining[3]]) as usize;
        if size < EMBEDDED_HEADER_SIZE {
            return Err(CodecError::InvalidField {
                field: "embedded_size",
                reason: "size below embedded preamble",
            });
        }
        if size > remaining.len() {
            return Err(CodecError::Truncated {
                field: "embedded_transaction",
                offset,
            });
        }
        let transaction = EmbeddedTransaction::deserialize(&remaining[..size])?;
        let padded = padded_size(size);
        if padded > remaining.len() {
            return Err(CodecError::Truncated {
                field: "padding",
                offset: offset + size,
            });
        }
        if remaining[size..padded].iter().any(|byte| *byte != 0) {
            return Err(CodecError::InvalidField {
                field: "padding",
                reason: "nonzero padding byte",
            });
        }
        transactions.push(transaction);
        offset += padded;
    }
    Ok(transactions)
}
