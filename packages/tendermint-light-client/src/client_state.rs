//! This module defines [`ClientState`].

use light_client_interface::{Height, Status};
use light_client_utils::ensure;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    chain_id, consensus_state::ConsensusState, error::TendermintClientError,
    trust_threshold::TrustThreshold,
};

/// Nanoseconds per second
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// The ICS-23 proof format of one store in a chained membership proof
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Copy, Debug)]
#[serde(rename_all = "snake_case")]
pub enum ProofSpec {
    /// IAVL tree, used by cosmos-sdk module stores
    Iavl,
    /// Simple Merkle tree, used by the cosmos-sdk multistore
    Tendermint,
}

impl ProofSpec {
    /// Returns the ICS-23 proof spec.
    #[must_use]
    pub fn to_ics23(self) -> ics23::ProofSpec {
        match self {
            Self::Iavl => ics23::iavl_spec(),
            Self::Tendermint => ics23::tendermint_spec(),
        }
    }

    /// The proof specs of a cosmos-sdk chain, innermost store first.
    #[must_use]
    pub fn cosmos() -> Vec<Self> {
        vec![Self::Iavl, Self::Tendermint]
    }
}

/// The Tendermint client state
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
pub struct ClientState {
    /// The chain id of the remote chain
    pub chain_id: String,
    /// Fraction of trusted voting power required for non-adjacent updates
    pub trust_level: TrustThreshold,
    /// How long a consensus state can be used as a trusted anchor, in seconds
    pub trusting_period_seconds: u64,
    /// The unbonding period of the remote chain, in seconds
    pub unbonding_period_seconds: u64,
    /// The maximum tolerated clock drift between the header time and the local clock, in seconds
    pub max_clock_drift_seconds: u64,
    /// The latest verified height
    pub latest_height: Height,
    /// The height misbehaviour was detected at, zero if not frozen
    #[serde(default)]
    pub frozen_height: Height,
    /// Proof specs for membership proofs, innermost store first
    pub proof_specs: Vec<ProofSpec>,
    /// The store path under which the remote chain commits upgraded client states
    #[serde(default)]
    pub upgrade_path: Vec<String>,
}

impl ClientState {
    /// Checks the client state invariants.
    /// # Errors
    /// Returns an error describing the first violated invariant.
    pub fn validate(&self) -> Result<(), TendermintClientError> {
        ensure!(
            !self.chain_id.trim().is_empty(),
            TendermintClientError::InvalidClientState("chain id cannot be empty".to_string())
        );
        self.trust_level.validate()?;
        ensure!(
            self.trusting_period_seconds > 0 && self.max_clock_drift_seconds > 0,
            TendermintClientError::InvalidClientState(
                "trusting period and max clock drift must be non-zero".to_string()
            )
        );
        ensure!(
            self.trusting_period_seconds < self.unbonding_period_seconds,
            TendermintClientError::TrustingPeriodNotBelowUnbonding {
                trusting_period_seconds: self.trusting_period_seconds,
                unbonding_period_seconds: self.unbonding_period_seconds,
            }
        );
        ensure!(
            self.latest_height.revision_height > 0,
            TendermintClientError::InvalidClientState(
                "latest height must be non-zero".to_string()
            )
        );

        let revision = chain_id::revision_number(&self.chain_id);
        ensure!(
            self.latest_height.revision_number == revision,
            TendermintClientError::InvalidClientState(format!(
                "latest height revision {} does not match chain id revision {revision}",
                self.latest_height.revision_number
            ))
        );
        ensure!(
            !self.proof_specs.is_empty(),
            TendermintClientError::InvalidClientState("proof specs cannot be empty".to_string())
        );
        ensure!(
            self.upgrade_path.iter().all(|key| !key.trim().is_empty()),
            TendermintClientError::InvalidClientState(
                "upgrade path keys cannot be empty".to_string()
            )
        );

        Ok(())
    }

    /// Returns true if misbehaviour froze the client.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        !self.frozen_height.is_zero()
    }

    /// Returns the client state frozen at `height`. A frozen client keeps its first freeze height.
    #[must_use]
    pub fn freeze(&self, height: Height) -> Self {
        let mut frozen = self.clone();
        if !self.is_frozen() {
            frozen.frozen_height = height;
        }
        frozen
    }

    /// Trusting period in nanoseconds.
    #[must_use]
    pub const fn trusting_period_nanos(&self) -> u64 {
        self.trusting_period_seconds.saturating_mul(NANOS_PER_SECOND)
    }

    /// Maximum clock drift in nanoseconds.
    #[must_use]
    pub const fn max_clock_drift_nanos(&self) -> u64 {
        self.max_clock_drift_seconds.saturating_mul(NANOS_PER_SECOND)
    }

    /// Returns true if a consensus state with `consensus_timestamp` is at least one trusting
    /// period old at `now`.
    #[must_use]
    pub const fn is_expired(&self, consensus_timestamp: u64, now: u64) -> bool {
        now.saturating_sub(consensus_timestamp) >= self.trusting_period_nanos()
    }

    /// Computes the client status.
    #[must_use]
    pub const fn status(&self, latest_consensus_state: Option<&ConsensusState>, now: u64) -> Status {
        if self.is_frozen() {
            return Status::Frozen;
        }

        match latest_consensus_state {
            None => Status::Unknown,
            Some(consensus_state) if self.is_expired(consensus_state.timestamp, now) => {
                Status::Expired
            }
            Some(_) => Status::Active,
        }
    }

    /// Returns the client state with every client-chosen field cleared, as committed by the
    /// remote chain for upgrades.
    #[must_use]
    pub fn zero_custom_fields(&self) -> Self {
        Self {
            chain_id: self.chain_id.clone(),
            trust_level: TrustThreshold {
                numerator: 0,
                denominator: 0,
            },
            trusting_period_seconds: 0,
            unbonding_period_seconds: self.unbonding_period_seconds,
            max_clock_drift_seconds: 0,
            latest_height: self.latest_height,
            frozen_height: Height::zero(),
            proof_specs: self.proof_specs.clone(),
            upgrade_path: self.upgrade_path.clone(),
        }
    }
}
