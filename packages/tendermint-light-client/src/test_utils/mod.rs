//! Deterministic validators, headers and Merkle stores for tests.

pub mod fixtures;
pub mod tree;

use ed25519_dalek::{Signer, SigningKey};
use light_client_interface::Height;

use crate::{
    chain_id,
    commit::{BlockIdFlag, Commit, CommitSig},
    header::{BlockHeader, Header, SignedHeader},
    validators::{Validator, ValidatorSet},
};

/// Validators with known signing keys.
#[derive(Clone, Debug)]
pub struct TestValidators {
    keys: Vec<SigningKey>,
    powers: Vec<u64>,
}

impl TestValidators {
    /// Creates validators with the given voting powers.
    #[must_use]
    pub fn new(powers: &[u64]) -> Self {
        Self::with_seed(0, powers)
    }

    /// Creates validators whose keys are derived from `seed`, so that different seeds give
    /// disjoint validator sets.
    #[must_use]
    pub fn with_seed(seed: u8, powers: &[u64]) -> Self {
        let keys = (0..powers.len())
            .map(|index| {
                let mut secret = [seed; 32];
                secret[31] = u8::try_from(index).unwrap_or(u8::MAX);
                SigningKey::from_bytes(&secret)
            })
            .collect();
        Self {
            keys,
            powers: powers.to_vec(),
        }
    }

    /// Returns the validators of `self` followed by the validators of `other`.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        Self {
            keys: self.keys.iter().chain(&other.keys).cloned().collect(),
            powers: self.powers.iter().chain(&other.powers).copied().collect(),
        }
    }

    /// The number of validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if there are no validators.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The validator set.
    #[must_use]
    pub fn validator_set(&self) -> ValidatorSet {
        ValidatorSet::new(
            self.keys
                .iter()
                .zip(&self.powers)
                .map(|(key, power)| Validator {
                    pub_key: key.verifying_key().to_bytes(),
                    voting_power: *power,
                })
                .collect(),
        )
    }

    /// Returns one vote per validator: a commit vote from the validators at `signers`, absent
    /// for the rest.
    #[must_use]
    pub fn sign(
        &self,
        chain_id: &str,
        commit: &Commit,
        signers: &[usize],
        timestamp: u64,
    ) -> Vec<CommitSig> {
        let validator_set = self.validator_set();
        self.keys
            .iter()
            .zip(&validator_set.validators)
            .enumerate()
            .map(|(index, (key, validator))| {
                if signers.contains(&index) {
                    let sign_bytes = commit.vote_sign_bytes(chain_id, timestamp);
                    CommitSig {
                        block_id_flag: BlockIdFlag::Commit,
                        validator_address: validator.address(),
                        timestamp,
                        signature: key.sign(&sign_bytes).to_bytes().to_vec(),
                    }
                } else {
                    CommitSig {
                        block_id_flag: BlockIdFlag::Absent,
                        validator_address: validator.address(),
                        timestamp: 0,
                        signature: vec![],
                    }
                }
            })
            .collect()
    }
}

/// Builds signed headers. By default every validator signs, the next validator set is the
/// current one and the header is adjacent to its trusted height.
#[derive(Clone, Debug)]
pub struct HeaderBuilder {
    chain_id: String,
    height: u64,
    time: u64,
    round: u32,
    app_hash: [u8; 32],
    validators: TestValidators,
    next_validators: TestValidators,
    signers: Vec<usize>,
    trusted_height: Height,
    trusted_validators: TestValidators,
}

impl HeaderBuilder {
    /// Starts a header at `height` and `time` signed by `validators`.
    #[must_use]
    pub fn new(chain_id: &str, height: u64, time: u64, validators: &TestValidators) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            height,
            time,
            round: 0,
            app_hash: fixtures::APP_HASH,
            validators: validators.clone(),
            next_validators: validators.clone(),
            signers: (0..validators.len()).collect(),
            trusted_height: Height::new(
                chain_id::revision_number(chain_id),
                height.saturating_sub(1),
            ),
            trusted_validators: validators.clone(),
        }
    }

    /// Sets the trusted height and the trusted validators.
    #[must_use]
    pub fn trusted(mut self, height: Height, validators: &TestValidators) -> Self {
        self.trusted_height = height;
        self.trusted_validators = validators.clone();
        self
    }

    /// Sets the next validators.
    #[must_use]
    pub fn next_validators(mut self, validators: &TestValidators) -> Self {
        self.next_validators = validators.clone();
        self
    }

    /// Sets which validators, by index, sign the commit.
    #[must_use]
    pub fn signers(mut self, signers: &[usize]) -> Self {
        self.signers = signers.to_vec();
        self
    }

    /// Sets the app hash.
    #[must_use]
    pub const fn app_hash(mut self, app_hash: [u8; 32]) -> Self {
        self.app_hash = app_hash;
        self
    }

    /// Sets the commit round.
    #[must_use]
    pub const fn round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }

    /// Builds and signs the header.
    #[must_use]
    pub fn build(self) -> Header {
        let validator_set = self.validators.validator_set();
        let next_validator_set = self.next_validators.validator_set();

        let block = BlockHeader {
            chain_id: self.chain_id.clone(),
            height: self.height,
            time: self.time,
            validators_hash: validator_set.hash(),
            next_validators_hash: next_validator_set.hash(),
            app_hash: self.app_hash,
        };

        let mut commit = Commit {
            height: self.height,
            round: self.round,
            block_id: block.hash(),
            signatures: vec![],
        };
        commit.signatures = self
            .validators
            .sign(&self.chain_id, &commit, &self.signers, self.time);

        Header {
            signed_header: SignedHeader {
                header: block,
                commit,
            },
            validator_set,
            next_validator_set,
            trusted_height: self.trusted_height,
            trusted_validator_set: self.trusted_validators.validator_set(),
        }
    }
}
