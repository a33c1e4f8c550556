//! This module defines [`Header`] and the signed block header it carries.

use light_client_interface::Height;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use tendermint::{crypto::default::Sha256, merkle};

use crate::{chain_id, commit::Commit, consensus_state::ConsensusState, validators::ValidatorSet};

/// The signed part of a block header
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BlockHeader {
    /// The chain id of the remote chain
    pub chain_id: String,
    /// The block height
    pub height: u64,
    /// The block time in nanoseconds since the unix epoch
    #[serde(with = "light_client_utils::serde::number_as_string")]
    #[schemars(with = "String")]
    pub time: u64,
    /// Hash of the validator set that signs this block
    #[serde(with = "light_client_utils::serde::hex_bytes")]
    #[schemars(with = "String")]
    pub validators_hash: [u8; 32],
    /// Hash of the validator set that signs the next block
    #[serde(with = "light_client_utils::serde::hex_bytes")]
    #[schemars(with = "String")]
    pub next_validators_hash: [u8; 32],
    /// The application state root after the previous block
    #[serde(with = "light_client_utils::serde::hex_bytes")]
    #[schemars(with = "String")]
    pub app_hash: [u8; 32],
}

impl BlockHeader {
    /// Returns the block id, the Merkle root over the header fields.
    #[must_use]
    pub fn hash(&self) -> [u8; 32] {
        let fields: [&[u8]; 6] = [
            self.chain_id.as_bytes(),
            &self.height.to_be_bytes(),
            &self.time.to_be_bytes(),
            &self.validators_hash,
            &self.next_validators_hash,
            &self.app_hash,
        ];
        merkle::simple_hash_from_byte_vectors::<Sha256>(&fields)
    }
}

/// A block header with the commit that signs it
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
pub struct SignedHeader {
    /// The block header
    pub header: BlockHeader,
    /// The commit for the block header
    pub commit: Commit,
}

/// A header used to update the client
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
pub struct Header {
    /// The signed block header
    pub signed_header: SignedHeader,
    /// The validator set that signed the block
    pub validator_set: ValidatorSet,
    /// The validator set that signs the next block
    pub next_validator_set: ValidatorSet,
    /// The height of the consensus state this header is verified against
    pub trusted_height: Height,
    /// The next validator set of the trusted consensus state
    pub trusted_validator_set: ValidatorSet,
}

impl Header {
    /// The chain id of the header.
    #[must_use]
    pub fn chain_id(&self) -> &str {
        &self.signed_header.header.chain_id
    }

    /// The height of the header, with the revision taken from the chain id.
    #[must_use]
    pub fn height(&self) -> Height {
        Height::new(
            chain_id::revision_number(self.chain_id()),
            self.signed_header.header.height,
        )
    }

    /// The block time in nanoseconds.
    #[must_use]
    pub const fn time(&self) -> u64 {
        self.signed_header.header.time
    }

    /// The block id of the signed header.
    #[must_use]
    pub fn hash(&self) -> [u8; 32] {
        self.signed_header.header.hash()
    }

    /// The consensus state this header produces.
    #[must_use]
    pub fn consensus_state(&self) -> ConsensusState {
        ConsensusState {
            timestamp: self.time(),
            root: self.signed_header.header.app_hash,
            next_validators_hash: self.signed_header.header.next_validators_hash,
        }
    }
}
