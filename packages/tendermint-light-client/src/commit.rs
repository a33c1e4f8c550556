//! This module defines [`Commit`] and the vote sign bytes its signatures cover.

use std::collections::{BTreeMap, BTreeSet};

use light_client_utils::ensure;
use prost::Message;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tendermint_proto::{
    google::protobuf::Timestamp,
    v0_38::types::{CanonicalBlockId, CanonicalPartSetHeader, CanonicalVote, SignedMsgType},
};

use crate::{
    error::CommitError,
    signature::SignatureVerifier,
    validators::{Address, Validator, ValidatorSet},
};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// How a validator voted in a commit
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Copy, Debug)]
#[serde(rename_all = "snake_case")]
pub enum BlockIdFlag {
    /// No vote was received
    Absent,
    /// Voted for the committed block
    Commit,
    /// Voted nil
    Nil,
}

/// A single validator's vote in a commit
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CommitSig {
    /// How the validator voted
    pub block_id_flag: BlockIdFlag,
    /// Address of the validator
    #[serde(with = "light_client_utils::serde::hex_bytes")]
    #[schemars(with = "String")]
    pub validator_address: Address,
    /// Time of the vote in nanoseconds
    #[serde(with = "light_client_utils::serde::number_as_string")]
    #[schemars(with = "String")]
    pub timestamp: u64,
    /// ed25519 signature over the vote sign bytes
    #[serde(with = "light_client_utils::serde::hex_bytes")]
    #[schemars(with = "String")]
    pub signature: Vec<u8>,
}

/// Signatures of a validator set over a block at a height
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
pub struct Commit {
    /// Height of the committed block
    pub height: u64,
    /// Consensus round of the commit
    pub round: u32,
    /// Hash of the committed block header
    #[serde(with = "light_client_utils::serde::hex_bytes")]
    #[schemars(with = "String")]
    pub block_id: [u8; 32],
    /// The votes, one per validator
    pub signatures: Vec<CommitSig>,
}

impl Commit {
    /// Returns the bytes a validator signs when voting for this commit's block at `timestamp`:
    /// the length-delimited protobuf `CanonicalVote` of a precommit.
    #[must_use]
    pub fn vote_sign_bytes(&self, chain_id: &str, timestamp: u64) -> Vec<u8> {
        CanonicalVote {
            r#type: SignedMsgType::Precommit.into(),
            height: i64::try_from(self.height).unwrap_or(i64::MAX),
            round: i64::from(self.round),
            block_id: Some(CanonicalBlockId {
                hash: self.block_id.to_vec(),
                part_set_header: Some(CanonicalPartSetHeader::default()),
            }),
            timestamp: Some(proto_timestamp(timestamp)),
            chain_id: chain_id.to_string(),
        }
        .encode_length_delimited_to_vec()
    }

    /// Returns the voting power of the validators in `validator_set` that signed this commit.
    ///
    /// Only [`BlockIdFlag::Commit`] votes count. Votes from validators outside the set are
    /// ignored.
    /// # Errors
    /// Returns an error if a counted signature does not verify or a validator voted twice.
    pub fn signed_voting_power<V: SignatureVerifier>(
        &self,
        chain_id: &str,
        validator_set: &ValidatorSet,
        verifier: &V,
    ) -> Result<u64, CommitError> {
        let validators: BTreeMap<Address, &Validator> = validator_set
            .validators
            .iter()
            .map(|validator| (validator.address(), validator))
            .collect();

        let mut seen = BTreeSet::new();
        let mut signed_power = 0u64;
        for vote in self
            .signatures
            .iter()
            .filter(|vote| vote.block_id_flag == BlockIdFlag::Commit)
        {
            let Some(validator) = validators.get(&vote.validator_address) else {
                continue;
            };
            ensure!(
                seen.insert(vote.validator_address),
                CommitError::DuplicateSignature {
                    address: hex::encode(vote.validator_address)
                }
            );

            let sign_bytes = self.vote_sign_bytes(chain_id, vote.timestamp);
            ensure!(
                verifier.verify_signature(&validator.pub_key, &sign_bytes, &vote.signature),
                CommitError::InvalidSignature {
                    address: hex::encode(vote.validator_address)
                }
            );

            signed_power = signed_power.saturating_add(validator.voting_power);
        }

        Ok(signed_power)
    }
}

fn proto_timestamp(nanos: u64) -> Timestamp {
    Timestamp {
        seconds: i64::try_from(nanos / NANOS_PER_SECOND).unwrap_or(i64::MAX),
        nanos: i32::try_from(nanos % NANOS_PER_SECOND).unwrap_or_default(),
    }
}
