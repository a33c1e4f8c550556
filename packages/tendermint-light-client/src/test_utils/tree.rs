//! An in-memory Merkle store that produces ICS-23 proofs in the simple Merkle tree format.

use std::collections::BTreeMap;

use ics23::{
    commitment_proof::Proof, CommitmentProof, ExistenceProof, HashOp, InnerOp, LeafOp, LengthOp,
    NonExistenceProof,
};
use prost::Message;
use sha2::{Digest, Sha256};

use crate::membership::MerkleProof;

/// A sorted key-value tree hashed like a Tendermint simple Merkle tree.
#[derive(Clone, Debug, Default)]
pub struct MerkleTree {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MerkleTree {
    /// Inserts or replaces `key`.
    pub fn insert(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.entries.insert(key.into(), value.into());
    }

    /// The root hash.
    #[must_use]
    pub fn root(&self) -> [u8; 32] {
        subtree_hash(&self.leaf_hashes())
    }

    /// Returns an existence proof if `key` is present and a non-existence proof otherwise.
    #[must_use]
    pub fn commitment_proof(&self, key: &[u8]) -> CommitmentProof {
        let keys: Vec<&Vec<u8>> = self.entries.keys().collect();
        let proof = match keys.binary_search_by(|probe| probe.as_slice().cmp(key)) {
            Ok(index) => Proof::Exist(self.existence_proof(index)),
            Err(index) => Proof::Nonexist(NonExistenceProof {
                key: key.to_vec(),
                left: index.checked_sub(1).map(|left| self.existence_proof(left)),
                right: (index < keys.len()).then(|| self.existence_proof(index)),
            }),
        };
        CommitmentProof { proof: Some(proof) }
    }

    fn leaf_hashes(&self) -> Vec<[u8; 32]> {
        self.entries
            .iter()
            .map(|(key, value)| leaf_hash(key, value))
            .collect()
    }

    fn existence_proof(&self, index: usize) -> ExistenceProof {
        let (key, value) = self
            .entries
            .iter()
            .nth(index)
            .expect("index within the tree");
        ExistenceProof {
            key: key.clone(),
            value: value.clone(),
            leaf: Some(leaf_op()),
            path: inner_path(&self.leaf_hashes(), index),
        }
    }
}

/// A cosmos-sdk style multistore: one provable store next to another store, committed together
/// into the app hash.
#[derive(Clone, Debug)]
pub struct ProvableStore {
    store_key: String,
    store: MerkleTree,
}

impl ProvableStore {
    /// Creates an empty store mounted under `store_key`.
    #[must_use]
    pub fn new(store_key: &str) -> Self {
        Self {
            store_key: store_key.to_string(),
            store: MerkleTree::default(),
        }
    }

    /// Sets `key` to `value` in the provable store.
    pub fn set(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.store.insert(key, value);
    }

    /// The app hash committing to every store.
    #[must_use]
    pub fn app_hash(&self) -> [u8; 32] {
        self.multistore().root()
    }

    /// The Merkle path of `key`, store key first.
    #[must_use]
    pub fn path(&self, key: &[u8]) -> Vec<Vec<u8>> {
        vec![self.store_key.as_bytes().to_vec(), key.to_vec()]
    }

    /// The encoded chained proof of `key`, an existence proof if it is set and a non-existence
    /// proof otherwise.
    #[must_use]
    pub fn proof(&self, key: &[u8]) -> Vec<u8> {
        MerkleProof {
            proofs: vec![
                self.store.commitment_proof(key),
                self.multistore().commitment_proof(self.store_key.as_bytes()),
            ],
        }
        .encode_to_vec()
    }

    fn multistore(&self) -> MerkleTree {
        let mut multistore = MerkleTree::default();
        multistore.insert("acc", Sha256::digest(b"acc").to_vec());
        multistore.insert(self.store_key.as_bytes(), self.store.root().to_vec());
        multistore
    }
}

fn leaf_op() -> LeafOp {
    LeafOp {
        hash: HashOp::Sha256.into(),
        prehash_key: HashOp::NoHash.into(),
        prehash_value: HashOp::Sha256.into(),
        length: LengthOp::VarProto.into(),
        prefix: vec![0],
    }
}

fn leaf_hash(key: &[u8], value: &[u8]) -> [u8; 32] {
    let mut preimage = vec![0];
    prost::encoding::encode_varint(key.len() as u64, &mut preimage);
    preimage.extend_from_slice(key);
    prost::encoding::encode_varint(32, &mut preimage);
    preimage.extend_from_slice(&Sha256::digest(value));
    Sha256::digest(&preimage).into()
}

fn inner_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([1]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

const fn split_point(length: usize) -> usize {
    let mut split = 1;
    while split * 2 < length {
        split *= 2;
    }
    split
}

fn subtree_hash(leaves: &[[u8; 32]]) -> [u8; 32] {
    match leaves {
        [] => Sha256::digest(b"").into(),
        [leaf] => *leaf,
        _ => {
            let split = split_point(leaves.len());
            inner_hash(&subtree_hash(&leaves[..split]), &subtree_hash(&leaves[split..]))
        }
    }
}

/// Inner operations from the leaf at `index` up to the root.
fn inner_path(leaves: &[[u8; 32]], index: usize) -> Vec<InnerOp> {
    if leaves.len() <= 1 {
        return vec![];
    }

    let split = split_point(leaves.len());
    let (left, right) = leaves.split_at(split);
    if index < split {
        let mut path = inner_path(left, index);
        path.push(InnerOp {
            hash: HashOp::Sha256.into(),
            prefix: vec![1],
            suffix: subtree_hash(right).to_vec(),
        });
        path
    } else {
        let mut path = inner_path(right, index - split);
        let mut prefix = vec![1];
        prefix.extend_from_slice(&subtree_hash(left));
        path.push(InnerOp {
            hash: HashOp::Sha256.into(),
            prefix,
            suffix: vec![],
        });
        path
    }
}
