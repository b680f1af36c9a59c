//! Canonical transaction wire codec and aggregate transactions hashing.

pub mod aggregate;
pub mod encoding;
pub mod hash;
pub mod header;
pub mod layout;
pub mod merkle;
pub mod transaction;

pub use aggregate::{
    pack_transactions, padded_size, unpack_transactions, AggregateBody, Cosignature,
};
pub use encoding::{CodecError, Decoder, Encoder};
pub use hash::{sha3_256, Digest32, Sha3Digest};
pub use header::{EmbeddedTransactionHeader, TransactionHeader};
pub use merkle::{compute_transactions_hash, hash_to_hex, MerkleHashBuilder};
pub use transaction::{
    body_layout, CosignatoryModification, EmbeddedTransaction, Mosaic, MosaicDefinitionBody,
    MultisigAccountModificationBody, NamespaceMetadataBody, Transaction, TransactionBody,
    TransferBody,
};
