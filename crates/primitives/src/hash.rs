use cinder_consensus::Hash256;
use sha3::{Digest, Sha3_256};

use crate::encoding::CodecError;

pub fn sha3_256(data: &[u8]) -> Hash256 {
    let digest = Sha3_256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// The injected 32-byte digest primitive behind the Merkle hash builder.
///
/// Implementations must be stateless per call or safe for concurrent
/// use; a failure is fatal and surfaces as `HashFailure`.
pub trait Digest32 {
    fn digest(&self, data: &[u8]) -> Result<Hash256, CodecError>;
}

/// SHA3-256, the protocol's configured digest.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha3Digest;

impl Digest32 for Sha3Digest {
    fn digest(&self, data: &[u8]) -> Result<Hash256, CodecError> {
        Ok(sha3_256(data))
    }
}
