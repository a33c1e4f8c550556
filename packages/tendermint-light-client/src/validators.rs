//! This module defines [`Validator`] and [`ValidatorSet`].

use std::collections::BTreeSet;

use light_client_utils::ensure;
use prost::Message;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tendermint::merkle;
use tendermint_proto::v0_38::{
    crypto::{public_key::Sum, PublicKey},
    types::SimpleValidator,
};

use crate::error::ValidatorSetError;

/// Length of a validator address.
pub const ADDRESS_LENGTH: usize = 20;

/// Upper bound on the total voting power of a validator set.
#[allow(clippy::cast_sign_loss)]
pub const MAX_TOTAL_VOTING_POWER: u64 = (i64::MAX / 8) as u64;

/// A validator address, the first 20 bytes of the sha256 hash of the public key.
pub type Address = [u8; ADDRESS_LENGTH];

/// A validator of the remote chain
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
pub struct Validator {
    /// The ed25519 public key
    #[serde(with = "light_client_utils::serde::hex_bytes")]
    #[schemars(with = "String")]
    pub pub_key: [u8; 32],
    /// The voting power
    pub voting_power: u64,
}

impl Validator {
    /// Returns the address of the validator.
    #[must_use]
    pub fn address(&self) -> Address {
        let digest = Sha256::digest(self.pub_key);
        let mut address = [0; ADDRESS_LENGTH];
        address.copy_from_slice(&digest[..ADDRESS_LENGTH]);
        address
    }

    /// The protobuf `SimpleValidator` encoding committed to by the validator set hash.
    fn hash_bytes(&self) -> Vec<u8> {
        SimpleValidator {
            pub_key: Some(PublicKey {
                sum: Some(Sum::Ed25519(self.pub_key.to_vec())),
            }),
            voting_power: i64::try_from(self.voting_power).unwrap_or(i64::MAX),
        }
        .encode_to_vec()
    }
}

/// An ordered set of validators
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug, Default)]
pub struct ValidatorSet {
    /// The validators in canonical order
    pub validators: Vec<Validator>,
}

impl ValidatorSet {
    /// Creates a validator set from validators in canonical order.
    #[must_use]
    pub const fn new(validators: Vec<Validator>) -> Self {
        Self { validators }
    }

    /// Checks that the set is non-empty, has no duplicate or powerless validators and that its
    /// total power is within bounds.
    /// # Errors
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ValidatorSetError> {
        ensure!(!self.validators.is_empty(), ValidatorSetError::Empty);

        let mut seen = BTreeSet::new();
        let mut total: u128 = 0;
        for validator in &self.validators {
            let address = validator.address();
            ensure!(
                validator.voting_power > 0,
                ValidatorSetError::ZeroVotingPower {
                    address: hex::encode(address)
                }
            );
            ensure!(
                seen.insert(address),
                ValidatorSetError::DuplicateValidator {
                    address: hex::encode(address)
                }
            );
            total += u128::from(validator.voting_power);
        }

        ensure!(
            total <= u128::from(MAX_TOTAL_VOTING_POWER),
            ValidatorSetError::TotalVotingPowerTooLarge {
                total,
                max: MAX_TOTAL_VOTING_POWER,
            }
        );

        Ok(())
    }

    /// Returns the sum of all voting power, saturating on overflow.
    #[must_use]
    pub fn total_voting_power(&self) -> u64 {
        self.validators
            .iter()
            .fold(0u64, |total, v| total.saturating_add(v.voting_power))
    }

    /// Returns the Merkle root over the validators in order.
    #[must_use]
    pub fn hash(&self) -> [u8; 32] {
        let leaves: Vec<Vec<u8>> = self.validators.iter().map(Validator::hash_bytes).collect();
        merkle::simple_hash_from_byte_vectors::<tendermint::crypto::default::Sha256>(&leaves)
    }
}
