//! Verification of client upgrades committed by the remote chain.
//!
//! Before a planned upgrade the remote chain commits the upgraded client state, with its
//! client-chosen fields cleared, and the upgraded consensus state under the client's upgrade
//! path. The client verifies both against its latest consensus state and continues from the
//! upgraded states, keeping its own trust level, trusting period and clock drift.

use light_client_interface::UpdateOutput;
use light_client_utils::ensure;

use crate::{
    client_state::ClientState,
    consensus_state::{sentinel_root, ConsensusState},
    error::TendermintClientError,
    membership::verify_membership,
};

/// Key suffix of the committed upgraded client state
pub const UPGRADED_CLIENT_STATE_KEY: &str = "upgradedClient";
/// Key suffix of the committed upgraded consensus state
pub const UPGRADED_CONSENSUS_STATE_KEY: &str = "upgradedConsState";

/// Returns the Merkle path of an upgraded state committed at `height` under `upgrade_path`.
///
/// The last key of the upgrade path is extended with `/{height}/{suffix}`.
#[must_use]
pub fn upgrade_merkle_path(upgrade_path: &[String], height: u64, suffix: &str) -> Vec<Vec<u8>> {
    let mut path: Vec<Vec<u8>> = upgrade_path.iter().map(|key| key.as_bytes().to_vec()).collect();
    if let Some(last) = path.last_mut() {
        last.extend_from_slice(format!("/{height}/{suffix}").as_bytes());
    }
    path
}

/// Verifies the upgraded client and consensus state against `consensus_state`, the consensus
/// state at the client's latest height, and returns the states the client continues from.
/// # Errors
/// Returns an error if the client is frozen, has no upgrade path, the upgraded height does not
/// increase, either proof fails, or the resulting client state is invalid.
pub fn verify_upgrade(
    client_state: &ClientState,
    consensus_state: &ConsensusState,
    upgraded_client_state: &ClientState,
    upgraded_consensus_state: &ConsensusState,
    proof_upgrade_client: &[u8],
    proof_upgrade_consensus_state: &[u8],
) -> Result<UpdateOutput<ClientState, ConsensusState>, TendermintClientError> {
    ensure!(
        !client_state.is_frozen(),
        TendermintClientError::ClientFrozen {
            frozen_height: client_state.frozen_height,
        }
    );
    ensure!(
        !client_state.upgrade_path.is_empty(),
        TendermintClientError::EmptyUpgradePath
    );
    ensure!(
        upgraded_client_state.latest_height > client_state.latest_height,
        TendermintClientError::UpgradeHeightNotIncreasing {
            current_height: client_state.latest_height,
            upgraded_height: upgraded_client_state.latest_height,
        }
    );

    let committed_height = client_state.latest_height.revision_height;
    let committed_client_state = encode(&upgraded_client_state.zero_custom_fields())?;
    verify_membership(
        &client_state.proof_specs,
        &consensus_state.root,
        proof_upgrade_client,
        &upgrade_merkle_path(
            &client_state.upgrade_path,
            committed_height,
            UPGRADED_CLIENT_STATE_KEY,
        ),
        &committed_client_state,
    )
    .map_err(|e| TendermintClientError::InvalidUpgradeProof {
        kind: "client state",
        source: Box::new(e),
    })?;

    let committed_consensus_state = encode(upgraded_consensus_state)?;
    verify_membership(
        &client_state.proof_specs,
        &consensus_state.root,
        proof_upgrade_consensus_state,
        &upgrade_merkle_path(
            &client_state.upgrade_path,
            committed_height,
            UPGRADED_CONSENSUS_STATE_KEY,
        ),
        &committed_consensus_state,
    )
    .map_err(|e| TendermintClientError::InvalidUpgradeProof {
        kind: "consensus state",
        source: Box::new(e),
    })?;

    let new_client_state = ClientState {
        chain_id: upgraded_client_state.chain_id.clone(),
        trust_level: client_state.trust_level,
        trusting_period_seconds: client_state.trusting_period_seconds,
        unbonding_period_seconds: upgraded_client_state.unbonding_period_seconds,
        max_clock_drift_seconds: client_state.max_clock_drift_seconds,
        latest_height: upgraded_client_state.latest_height,
        frozen_height: light_client_interface::Height::zero(),
        proof_specs: upgraded_client_state.proof_specs.clone(),
        upgrade_path: upgraded_client_state.upgrade_path.clone(),
    };
    new_client_state.validate()?;

    let new_consensus_state = ConsensusState {
        timestamp: upgraded_consensus_state.timestamp,
        root: sentinel_root(),
        next_validators_hash: upgraded_consensus_state.next_validators_hash,
    };
    new_consensus_state.validate()?;

    tracing::debug!(
        chain_id = %new_client_state.chain_id,
        height = %new_client_state.latest_height,
        "upgrade verified"
    );

    Ok(UpdateOutput {
        height: new_client_state.latest_height,
        client_state: new_client_state,
        consensus_state: new_consensus_state,
    })
}

/// The remote chain commits upgraded states in their JSON encoding.
fn encode<T: serde::Serialize>(state: &T) -> Result<Vec<u8>, TendermintClientError> {
    serde_json::to_vec(state).map_err(|e| TendermintClientError::InvalidClientState(e.to_string()))
}
