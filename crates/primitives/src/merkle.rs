//! Merkle root construction for an aggregate's transactions hash.

use cinder_consensus::Hash256;

use crate::encoding::CodecError;
use crate::hash::Digest32;
use crate::transaction::EmbeddedTransaction;

/// Accumulates leaf digests and folds them into a single root.
///
/// Leaves keep their insertion order; nothing is sorted or deduplicated.
/// A level with an odd number of digests duplicates its last digest to
/// form the final pair. An empty builder produces the all-zero hash; a
/// single leaf is its own root.
pub struct MerkleHashBuilder<'a, D: Digest32> {
    digest: &'a D,
    leaves: Vec<Hash256>,
}

impl<'a, D: Digest32> MerkleHashBuilder<'a, D> {
    pub fn new(digest: &'a D) -> Self {
        Self {
            digest,
            leaves: Vec::new(),
        }
    }

    pub fn update(&mut self, leaf: Hash256) {
        self.leaves.push(leaf);
    }

    pub fn root(&self) -> Result<Hash256, CodecError> {
        if self.leaves.is_empty() {
            return Ok([0u8; 32]);
        }
        let mut level = self.leaves.clone();
        while level.len() > 1 {
            if level.len() % 2 == 1 {
                let last = level[level.len() - 1];
                level.push(last);
            }
            let mut next = Vec::with_capacity(level.len() / 2);
            for pair in level.chunks_exact(2) {
                let mut buf = [0u8; 64];
                buf[..32].copy_from_slice(&pair[0]);
                buf[32..].copy_from_slice(&pair[1]);
                next.push(self.digest.digest(&buf)?);
            }
            level = next;
        }
        Ok(level[0])
    }
}

/// Computes an aggregate's transactions hash over its inner transactions.
///
/// Each leaf is the digest of an embedded transaction's unpadded
/// serialization, in the given order; framing padding never enters the
/// hash.
pub fn compute_transactions_hash<D: Digest32>(
    transactions: &[EmbeddedTransaction],
    digest: &D,
) -> Result<Hash256, CodecError> {
    let mut builder = MerkleHashBuilder::new(digest);
    for transaction in transactions {
        builder.update(digest.digest(&transaction.serialize()?)?);
    }
    builder.root()
}

/// Renders a digest as uppercase hex, the form embedded in DTOs.
pub fn hash_to_hex(hash: &Hash256) -> String {
    hex::encode_upper(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{sha3_256, Sha3Digest};

    fn pair_hash(left: &Hash256, right: &Hash256) -> Hash256 {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(left);
        buf[32..].copy_from_slice(right);
        sha3_256(&buf)
    }

    fn leaf(seed: u8) -> Hash256 {
        [seed; 32]
    }

    #[test]
    fn empty_tree_is_zero_hash() {
        let builder = MerkleHashBuilder::new(&Sha3Digest);
        assert_eq!(builder.root().expect("root"), [0u8; 32]);
    }

    #[test]
    fn single_leaf_is_its_own_root() {
        let mut builder = MerkleHashBuilder::new(&Sha3Digest);
        builder.update(leaf(0x5a));
        assert_eq!(builder.root().expect("root"), leaf(0x5a));
    }

    #[test]
    fn two_leaves_hash_as_one_pair() {
        let mut builder = MerkleHashBuilder::new(&Sha3Digest);
        builder.update(leaf(1));
        builder.update(leaf(2));
        assert_eq!(builder.root().expect("root"), pair_hash(&leaf(1), &leaf(2)));
    }

    #[test]
    fn odd_level_duplicates_last_leaf() {
        let mut builder = MerkleHashBuilder::new(&Sha3Digest);
        builder.update(leaf(1));
        builder.update(leaf(2));
        builder.update(leaf(3));
        let expected = pair_hash(
            &pair_hash(&leaf(1), &leaf(2)),
            &pair_hash(&leaf(3), &leaf(3)),
        );
        assert_eq!(builder.root().expect("root"), expected);
    }

    #[test]
    fn leaf_order_changes_the_root() {
        let mut forward = MerkleHashBuilder::new(&Sha3Digest);
        forward.update(leaf(1));
        forward.update(leaf(2));
        let mut reversed = MerkleHashBuilder::new(&Sha3Digest);
        reversed.update(leaf(2));
        reversed.update(leaf(1));
        assert_ne!(
            forward.root().expect("root"),
            reversed.root().expect("root")
        );
    }

    #[test]
    fn digest_failure_propagates() {
        struct FailingDigest;

        impl Digest32 for FailingDigest {
            fn digest(&self, _data: &[u8]) -> Result<Hash256, CodecError> {
                Err(CodecError::HashFailure("backend unavailable"))
            }
        }

        let mut builder = MerkleHashBuilder::new(&FailingDigest);
        builder.update(leaf(1));
        builder.update(leaf(2));
        assert_eq!(
            builder.root().expect_err("failing digest"),
            CodecError::HashFailure("backend unavailable")
        );
    }

    #[test]
    fn hex_rendering_is_uppercase() {
        assert_eq!(hash_to_hex(&[0xab; 32]), "AB".repeat(32));
    }
}
