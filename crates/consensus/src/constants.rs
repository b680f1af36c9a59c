//! Wire-format constants shared across the codec.

/// Width of a signature on the wire.
pub const SIGNATURE_SIZE: usize = 64;
/// Width of a public key on the wire.
pub const KEY_SIZE: usize = 32;
/// Width of a digest on the wire.
pub const HASH_SIZE: usize = 32;
/// Width of an encoded address: network byte, 160-bit account hash, checksum.
pub const ADDRESS_SIZE: usize = 25;
/// Width of the leading little-endian total-size field of every transaction.
pub const SIZE_FIELD_WIDTH: usize = 4;
/// Full top-level preamble: size field plus the common header fields.
pub const TRANSACTION_HEADER_SIZE: usize = 120;
/// Full embedded preamble: size field plus the reduced header fields.
pub const EMBEDDED_HEADER_SIZE: usize = 40;
/// Embedded transactions are padded to this boundary inside an aggregate.
pub const EMBEDDED_ALIGNMENT: usize = 8;
/// Width of one aggregate cosignature: signer key plus signature.
pub const COSIGNATURE_SIZE: usize = KEY_SIZE + SIGNATURE_SIZE;
/// Width of one mosaic (id plus amount) in a transfer.
pub const MOSAIC_SIZE: usize = 16;
/// Width of one cosignatory modification: action byte plus key.
pub const MODIFICATION_SIZE: usize = 1 + KEY_SIZE;
/// The maximum number of embedded transactions in one aggregate (network rule).
pub const MAX_EMBEDDED_TRANSACTIONS: usize = 1_000;
