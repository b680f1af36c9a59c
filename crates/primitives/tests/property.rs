use cinder_consensus::{EntityType, NetworkType};
use cinder_primitives::aggregate::{AggregateBody, Cosignature};
use cinder_primitives::hash::Sha3Digest;
use cinder_primitives::header::{EmbeddedTransactionHeader, TransactionHeader};
use cinder_primitives::transaction::{
    CosignatoryModification, EmbeddedTransaction, Mosaic, MosaicDefinitionBody,
    MultisigAccountModificationBody, NamespaceMetadataBody, Transaction, TransactionBody,
    TransferBody,
};

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u8(&mut self) -> u8 {
        self.next_u64() as u8
    }

    fn gen_range(&mut self, max: usize) -> usize {
        if max == 0 {
            0
        } else {
            (self.next_u64() % max as u64) as usize
        }
    }
}

fn fill_bytes<const N: usize>(rng: &mut Lcg) -> [u8; N] {
    std::array::from_fn(|_| rng.next_u8())
}

fn random_vec(rng: &mut Lcg, max_len: usize) -> Vec<u8> {
    let len = rng.gen_range(max_len + 1);
    let mut bytes = Vec::with_capacity(len);
    for _ in 0..len {
        bytes.push(rng.next_u8());
    }
    bytes
}

fn random_network(rng: &mut Lcg) -> NetworkType {
    match rng.gen_range(3) {
        0 => NetworkType::MAINNET,
        1 => NetworkType::TESTNET,
        _ => NetworkType::DEVNET,
    }
}

fn random_body(rng: &mut Lcg, entity_type: EntityType) -> TransactionBody {
    match entity_type {
        EntityType::TRANSFER => {
            let mosaics = (0..rng.gen_range(4))
                .map(|_| Mosaic {
                    id: rng.next_u64(),
                    amount: rng.next_u64(),
                })
                .collect();
            TransactionBody::Transfer(TransferBody {
                recipient_address: fill_bytes::<25>(rng),
                message: random_vec(rng, 40),
                mosaics,
            })
        }
        EntityType::MOSAIC_DEFINITION => TransactionBody::MosaicDefinition(MosaicDefinitionBody {
            nonce: rng.next_u32(),
            id: rng.next_u64(),
            flags: rng.next_u8(),
            divisibility: rng.next_u8(),
            duration: rng.next_u64(),
        }),
        EntityType::MULTISIG_ACCOUNT_MODIFICATION => {
            let modifications = (0..rng.gen_range(4))
                .map(|_| CosignatoryModification {
                    action: (rng.next_u8() & 1),
                    cosignatory_public_key: fill_bytes::<32>(rng),
                })
                .collect();
            TransactionBody::MultisigAccountModification(MultisigAccountModificationBody {
                min_removal_delta: rng.next_u8() as i8,
                min_approval_delta: rng.next_u8() as i8,
                modifications,
            })
        }
        _ => TransactionBody::NamespaceMetadata(NamespaceMetadataBody {
            target_public_key: fill_bytes::<32>(rng),
            scoped_metadata_key: rng.next_u64(),
            target_namespace_id: rng.next_u64(),
            value_size_delta: rng.next_u32() as i16,
            value: random_vec(rng, 64),
        }),
    }
}

fn random_embeddable_type(rng: &mut Lcg) -> EntityType {
    match rng.gen_range(4) {
        0 => EntityType::TRANSFER,
        1 => EntityType::MOSAIC_DEFINITION,
        2 => EntityType::MULTISIG_ACCOUNT_MODIFICATION,
        _ => EntityType::NAMESPACE_METADATA,
    }
}

fn random_embedded(rng: &mut Lcg) -> EmbeddedTransaction {
    let entity_type = random_embeddable_type(rng);
    EmbeddedTransaction {
        header: EmbeddedTransactionHeader {
            signer_public_key: fill_bytes::<32>(rng),
            version: rng.next_u8(),
            network: random_network(rng),
            entity_type,
        },
        body: random_body(rng, entity_type),
    }
}

fn random_top_level(rng: &mut Lcg) -> Transaction {
    let entity_type = random_embeddable_type(rng);
    Transaction {
        header: TransactionHeader {
            signature: fill_bytes::<64>(rng),
            signer_public_key: fill_bytes::<32>(rng),
            version: rng.next_u8(),
            network: random_network(rng),
            entity_type,
            max_fee: rng.next_u64(),
            deadline: rng.next_u64(),
        },
        body: random_body(rng, entity_type),
    }
}

fn random_aggregate(rng: &mut Lcg) -> Transaction {
    let transactions: Vec<EmbeddedTransaction> =
        (0..rng.gen_range(4)).map(|_| random_embedded(rng)).collect();
    let cosignatures: Vec<Cosignature> = (0..rng.gen_range(3))
        .map(|_| Cosignature {
            signer_public_key: fill_bytes::<32>(rng),
            signature: fill_bytes::<64>(rng),
        })
        .collect();
    let entity_type = if rng.gen_range(2) == 0 {
        EntityType::AGGREGATE_COMPLETE
    } else {
        EntityType::AGGREGATE_BONDED
    };
    Transaction {
        header: TransactionHeader {
            signature: fill_bytes::<64>(rng),
            signer_public_key: fill_bytes::<32>(rng),
            version: rng.next_u8(),
            network: random_network(rng),
            entity_type,
            max_fee: rng.next_u64(),
            deadline: rng.next_u64(),
        },
        body: TransactionBody::Aggregate(
            AggregateBody::compute(transactions, cosignatures, &Sha3Digest)
                .expect("compute aggregate body"),
        ),
    }
}

#[test]
fn randomized_transaction_roundtrip() {
    let mut rng = Lcg::new(0x1234_5678);
    for _ in 0..200 {
        let tx = random_top_level(&mut rng);
        let encoded = tx.serialize().expect("encode random tx");
        assert_eq!(encoded.len(), tx.size().expect("size"));
        let decoded = Transaction::deserialize(&encoded).expect("decode random tx");
        assert_eq!(decoded, tx);
    }
}

#[test]
fn randomized_embedded_roundtrip() {
    let mut rng = Lcg::new(0x5eed);
    for _ in 0..200 {
        let tx = random_embedded(&mut rng);
        let encoded = tx.serialize().expect("encode random embedded tx");
        assert_eq!(encoded.len(), tx.size().expect("size"));
        let decoded = EmbeddedTransaction::deserialize(&encoded).expect("decode random embedded");
        assert_eq!(decoded, tx);
    }
}

#[test]
fn randomized_aggregate_roundtrip() {
    let mut rng = Lcg::new(0x00c0_ffee);
    for _ in 0..50 {
        let tx = random_aggregate(&mut rng);
        let encoded = tx.serialize().expect("encode random aggregate");
        assert_eq!(encoded.len(), tx.size().expect("size"));
        let decoded = Transaction::deserialize(&encoded).expect("decode random aggregate");
        assert_eq!(decoded, tx);
    }
}
