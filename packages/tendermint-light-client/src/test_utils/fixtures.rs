//! Default client and consensus states for tests.

use light_client_interface::Height;

use crate::{
    client_state::{ClientState, ProofSpec, NANOS_PER_SECOND},
    consensus_state::ConsensusState,
    trust_threshold::TrustThreshold,
};

/// Chain id used by most tests
pub const CHAIN_ID: &str = "testchain-1";
/// Two weeks
pub const TRUSTING_PERIOD_SECONDS: u64 = 14 * 24 * 60 * 60;
/// Three weeks
pub const UNBONDING_PERIOD_SECONDS: u64 = 21 * 24 * 60 * 60;
/// Ten seconds
pub const MAX_CLOCK_DRIFT_SECONDS: u64 = 10;
/// Time of the trusted consensus state in most tests
pub const TRUSTED_TIME: u64 = 1_700_000_000 * NANOS_PER_SECOND;
/// App hash of built headers unless overridden
pub const APP_HASH: [u8; 32] = [0xAA; 32];

/// A valid client state with a one third trust level, two-level simple Merkle proof specs and
/// the cosmos-sdk upgrade path.
#[must_use]
pub fn client_state(chain_id: &str, latest_height: Height) -> ClientState {
    ClientState {
        chain_id: chain_id.to_string(),
        trust_level: TrustThreshold::ONE_THIRD,
        trusting_period_seconds: TRUSTING_PERIOD_SECONDS,
        unbonding_period_seconds: UNBONDING_PERIOD_SECONDS,
        max_clock_drift_seconds: MAX_CLOCK_DRIFT_SECONDS,
        latest_height,
        frozen_height: Height::zero(),
        proof_specs: vec![ProofSpec::Tendermint, ProofSpec::Tendermint],
        upgrade_path: vec!["upgrade".to_string(), "upgradedIBCState".to_string()],
    }
}

/// A consensus state with the default app hash as root.
#[must_use]
pub const fn consensus_state(timestamp: u64, next_validators_hash: [u8; 32]) -> ConsensusState {
    ConsensusState {
        timestamp,
        root: APP_HASH,
        next_validators_hash,
    }
}

/// `seconds` after [`TRUSTED_TIME`].
#[must_use]
pub const fn after_trusted(seconds: u64) -> u64 {
    TRUSTED_TIME + seconds * NANOS_PER_SECOND
}
