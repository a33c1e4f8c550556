//! This module defines [`ConsensusState`].

use light_client_utils::ensure;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::TendermintClientError;

/// Snapshot of the remote chain at one height
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
pub struct ConsensusState {
    /// Block time in nanoseconds since the unix epoch
    #[serde(with = "light_client_utils::serde::number_as_string")]
    #[schemars(with = "String")]
    pub timestamp: u64,
    /// The commitment root (app hash) membership proofs are verified against
    #[serde(with = "light_client_utils::serde::hex_bytes")]
    #[schemars(with = "String")]
    pub root: [u8; 32],
    /// Hash of the validator set expected to sign the next block
    #[serde(with = "light_client_utils::serde::hex_bytes")]
    #[schemars(with = "String")]
    pub next_validators_hash: [u8; 32],
}

impl ConsensusState {
    /// Checks that the consensus state carries a timestamp.
    /// # Errors
    /// Returns an error if the timestamp is zero.
    pub fn validate(&self) -> Result<(), TendermintClientError> {
        ensure!(
            self.timestamp > 0,
            TendermintClientError::InvalidConsensusState("timestamp must be non-zero".to_string())
        );
        Ok(())
    }

    /// Returns true if the root is the placeholder set after a client upgrade.
    #[must_use]
    pub fn has_sentinel_root(&self) -> bool {
        self.root == sentinel_root()
    }
}

/// The root of a consensus state created by an upgrade. No key can be proven against it.
#[must_use]
pub fn sentinel_root() -> [u8; 32] {
    Sha256::digest(b"sentinel_root").into()
}
