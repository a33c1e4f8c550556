//! Integration tests for client upgrades

mod helpers;

use helpers::*;
use ics07_tendermint_light_client::{
    consensus_state::sentinel_root,
    error::TendermintClientError,
    test_utils::{fixtures, tree::ProvableStore},
    upgrade::{UPGRADED_CLIENT_STATE_KEY, UPGRADED_CONSENSUS_STATE_KEY},
    ClientState, ConsensusState,
};
use light_client_interface::{Height, LightClient, UpdateOutput};

struct UpgradeContext {
    ctx: TestContext,
    upgraded_client_state: ClientState,
    upgraded_consensus_state: ConsensusState,
    proof_client: Vec<u8>,
    proof_consensus: Vec<u8>,
}

fn upgrade_key(suffix: &str) -> Vec<u8> {
    format!("upgradedIBCState/10/{suffix}").into_bytes()
}

/// The remote chain commits `committed_client_state` and the upgraded consensus state under
/// the upgrade store.
fn setup_upgrade(committed: impl Fn(&ClientState) -> ClientState) -> UpgradeContext {
    let mut ctx = setup_test_context();

    let mut upgraded_client_state =
        fixtures::client_state("testchain-2", Height::new(2, 1));
    upgraded_client_state.unbonding_period_seconds = fixtures::UNBONDING_PERIOD_SECONDS * 2;
    let upgraded_consensus_state =
        fixtures::consensus_state(fixtures::after_trusted(30), [7; 32]);

    let mut store = ProvableStore::new("upgrade");
    store.set(
        upgrade_key(UPGRADED_CLIENT_STATE_KEY),
        serde_json::to_vec(&committed(&upgraded_client_state)).unwrap(),
    );
    store.set(
        upgrade_key(UPGRADED_CONSENSUS_STATE_KEY),
        serde_json::to_vec(&upgraded_consensus_state).unwrap(),
    );
    ctx.trusted_consensus_state.root = store.app_hash();

    UpgradeContext {
        proof_client: store.proof(&upgrade_key(UPGRADED_CLIENT_STATE_KEY)),
        proof_consensus: store.proof(&upgrade_key(UPGRADED_CONSENSUS_STATE_KEY)),
        ctx,
        upgraded_client_state,
        upgraded_consensus_state,
    }
}

fn verify(
    upgrade: &UpgradeContext,
) -> Result<UpdateOutput<ClientState, ConsensusState>, TendermintClientError> {
    upgrade.ctx.client.verify_upgrade(
        &upgrade.ctx.client_state,
        &upgrade.ctx.trusted_consensus_state,
        &upgrade.upgraded_client_state,
        &upgrade.upgraded_consensus_state,
        &upgrade.proof_client,
        &upgrade.proof_consensus,
    )
}

#[test]
fn test_upgrade() {
    let mut upgrade = setup_upgrade(ClientState::zero_custom_fields);
    upgrade.ctx.client_state.trusting_period_seconds = 1_000;

    let output = verify(&upgrade).expect("upgrade should verify");

    assert_eq!(output.height, Height::new(2, 1));
    let client_state = output.client_state;
    assert_eq!(client_state.chain_id, "testchain-2");
    assert_eq!(client_state.latest_height, Height::new(2, 1));
    assert_eq!(client_state.trusting_period_seconds, 1_000);
    assert_eq!(
        client_state.unbonding_period_seconds,
        fixtures::UNBONDING_PERIOD_SECONDS * 2
    );
    assert!(!client_state.is_frozen());

    let consensus_state = output.consensus_state;
    assert_eq!(consensus_state.root, sentinel_root());
    assert!(consensus_state.has_sentinel_root());
    assert_eq!(consensus_state.timestamp, fixtures::after_trusted(30));
    assert_eq!(consensus_state.next_validators_hash, [7; 32]);
}

#[test]
fn test_upgrade_with_client_chosen_fields_committed() {
    let upgrade = setup_upgrade(ClientState::clone);

    assert!(matches!(
        verify(&upgrade),
        Err(TendermintClientError::InvalidUpgradeProof {
            kind: "client state",
            ..
        })
    ));
}

#[test]
fn test_upgrade_with_tampered_consensus_state() {
    let mut upgrade = setup_upgrade(ClientState::zero_custom_fields);
    upgrade.upgraded_consensus_state.timestamp += 1;

    assert!(matches!(
        verify(&upgrade),
        Err(TendermintClientError::InvalidUpgradeProof {
            kind: "consensus state",
            ..
        })
    ));
}

#[test]
fn test_upgrade_height_must_increase() {
    let mut upgrade = setup_upgrade(ClientState::zero_custom_fields);
    upgrade.ctx.client_state.latest_height = Height::new(2, 1);
    upgrade.ctx.client_state.chain_id = "testchain-2".to_string();

    assert_eq!(
        verify(&upgrade),
        Err(TendermintClientError::UpgradeHeightNotIncreasing {
            current_height: Height::new(2, 1),
            upgraded_height: Height::new(2, 1),
        })
    );
}

#[test]
fn test_upgrade_without_upgrade_path() {
    let mut upgrade = setup_upgrade(ClientState::zero_custom_fields);
    upgrade.ctx.client_state.upgrade_path.clear();

    assert_eq!(verify(&upgrade), Err(TendermintClientError::EmptyUpgradePath));
}

#[test]
fn test_upgrade_shortening_unbonding_below_trusting_period() {
    let mut upgrade = setup_upgrade(|client_state| {
        let mut committed = client_state.zero_custom_fields();
        committed.unbonding_period_seconds = 60;
        committed
    });
    upgrade.upgraded_client_state.unbonding_period_seconds = 60;

    assert!(matches!(
        verify(&upgrade),
        Err(TendermintClientError::TrustingPeriodNotBelowUnbonding { .. })
    ));
}
