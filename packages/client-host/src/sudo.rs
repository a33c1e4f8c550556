//! This module contains the state-changing and proof verification entry points.

use light_client_interface::{Height, Status};
use light_client_utils::ensure;

use crate::{
    any::{AnyClientState, AnyConsensusState, AnyHeader, AnyMisbehaviour},
    error::HostError,
    prune::prune_client,
    query::client_status,
    router::{
        find_consensus_state, get_consensus_state, load_client, with_client, ClientRouter,
        RoutedClient,
    },
    state::ClientStore,
};

/// Verifies `header` against the trusted consensus state it names and stores the resulting
/// consensus state. Expired consensus states are pruned before anything is written.
///
/// Resubmitting a header whose consensus state is already stored succeeds without writing.
/// # Errors
/// Returns an error if the client is frozen, the trusted consensus state is missing, the header
/// does not verify, a different consensus state is stored at the header height, or the new
/// timestamp is not between those of its stored neighbours.
#[tracing::instrument(skip_all, fields(client_id = %client_id))]
pub fn update_client(
    router: &ClientRouter,
    store: &mut impl ClientStore,
    client_id: &str,
    header: AnyHeader,
) -> Result<Height, HostError> {
    let (module, client_state) = load_client(router, store, client_id)?;
    let max_pruned = router.config().max_pruned_per_update;

    with_client!(module, client => {
        update(client, store, client_id, client_state, header, max_pruned)
    })
}

fn update<C: RoutedClient>(
    client: &C,
    store: &mut impl ClientStore,
    client_id: &str,
    client_state: AnyClientState,
    header: AnyHeader,
    max_pruned: usize,
) -> Result<Height, HostError> {
    let client_state = client.downcast_client_state(client_state)?;
    let header = client.downcast_header(header)?;
    let now = store.host_timestamp()?;
    ensure_not_frozen(client, &client_state, client_id, now)?;

    let trusted_height = client.trusted_height(&header);
    let trusted_consensus_state = get_consensus_state(client, store, client_id, trusted_height)?;
    let output = client
        .verify_header(&client_state, &trusted_consensus_state, &header, now)
        .map_err(C::wrap_error)?;
    tracing::debug!(%trusted_height, height = %output.height, "header verified");

    if let Some(existing) = find_consensus_state(client, store, client_id, output.height)? {
        if existing == output.consensus_state {
            tracing::debug!(height = %output.height, "consensus state already stored");
            return Ok(output.height);
        }
        tracing::warn!(height = %output.height, "conflicting consensus state rejected");
        return Err(HostError::ConsensusStateConflict {
            client_id: client_id.to_string(),
            height: output.height,
        });
    }

    let timestamp = client.consensus_timestamp(&output.consensus_state);
    check_monotonic_timestamp(client, store, client_id, output.height, timestamp)?;

    prune_client(
        client,
        store,
        client_id,
        &output.client_state,
        Some((output.height, timestamp)),
        max_pruned,
    )?;

    store.set_consensus_state(
        client_id,
        output.height,
        C::wrap_consensus_state(output.consensus_state),
    )?;
    store.set_client_state(client_id, C::wrap_client_state(output.client_state))?;
    tracing::info!(height = %output.height, "client updated");

    Ok(output.height)
}

/// The consensus timestamp at `height` must lie strictly between the timestamps of the closest
/// stored consensus states below and above it.
fn check_monotonic_timestamp<C: RoutedClient>(
    client: &C,
    store: &impl ClientStore,
    client_id: &str,
    height: Height,
    timestamp: u64,
) -> Result<(), HostError> {
    let mut previous = None;
    let mut next = None;
    for (stored_height, consensus_state) in store.consensus_states(client_id)? {
        if stored_height < height {
            previous = Some(consensus_state);
        } else if stored_height > height {
            next = Some(consensus_state);
            break;
        }
    }

    if let Some(previous) = previous {
        let previous = client.downcast_consensus_state(previous)?;
        ensure!(
            client.consensus_timestamp(&previous) < timestamp,
            HostError::NonMonotonicTimestamp { height }
        );
    }
    if let Some(next) = next {
        let next = client.downcast_consensus_state(next)?;
        ensure!(
            timestamp < client.consensus_timestamp(&next),
            HostError::NonMonotonicTimestamp { height }
        );
    }
    Ok(())
}

/// Verifies `misbehaviour` and freezes the client at the height it returns.
/// # Errors
/// Returns an error if the client is already frozen, a trusted consensus state is missing, or
/// the evidence does not prove misbehaviour.
#[tracing::instrument(skip_all, fields(client_id = %client_id))]
pub fn submit_misbehaviour(
    router: &ClientRouter,
    store: &mut impl ClientStore,
    client_id: &str,
    misbehaviour: AnyMisbehaviour,
) -> Result<Height, HostError> {
    let (module, client_state) = load_client(router, store, client_id)?;

    with_client!(module, client => {
        freeze_on_misbehaviour(client, store, client_id, client_state, misbehaviour)
    })
}

fn freeze_on_misbehaviour<C: RoutedClient>(
    client: &C,
    store: &mut impl ClientStore,
    client_id: &str,
    client_state: AnyClientState,
    misbehaviour: AnyMisbehaviour,
) -> Result<Height, HostError> {
    let client_state = client.downcast_client_state(client_state)?;
    let misbehaviour = client.downcast_misbehaviour(misbehaviour)?;
    let now = store.host_timestamp()?;
    ensure_not_frozen(client, &client_state, client_id, now)?;

    let (trusted_height_1, trusted_height_2) = client.misbehaviour_trusted_heights(&misbehaviour);
    let trusted_consensus_state_1 = get_consensus_state(client, store, client_id, trusted_height_1)?;
    let trusted_consensus_state_2 = get_consensus_state(client, store, client_id, trusted_height_2)?;

    let frozen_height = client
        .check_misbehaviour(
            &client_state,
            &trusted_consensus_state_1,
            &trusted_consensus_state_2,
            &misbehaviour,
            now,
        )
        .map_err(C::wrap_error)?;

    store.set_client_state(
        client_id,
        C::wrap_client_state(client.freeze(&client_state, frozen_height)),
    )?;
    tracing::info!(%frozen_height, "client frozen on misbehaviour");
    Ok(frozen_height)
}

/// Upgrades an active client to the client and consensus state the remote chain committed
/// under the client's upgrade path.
/// # Errors
/// Returns an error if the client is not active, the upgraded states belong to another client
/// type, or the upgrade does not verify.
#[tracing::instrument(skip_all, fields(client_id = %client_id))]
pub fn upgrade_client(
    router: &ClientRouter,
    store: &mut impl ClientStore,
    client_id: &str,
    upgraded_client_state: AnyClientState,
    upgraded_consensus_state: AnyConsensusState,
    proof_upgrade_client: &[u8],
    proof_upgrade_consensus_state: &[u8],
) -> Result<Height, HostError> {
    let (module, client_state) = load_client(router, store, client_id)?;
    let upgrade = Upgrade {
        client_state: upgraded_client_state,
        consensus_state: upgraded_consensus_state,
        proof_client: proof_upgrade_client,
        proof_consensus_state: proof_upgrade_consensus_state,
    };

    with_client!(module, client => upgrade_to(client, store, client_id, client_state, upgrade))
}

struct Upgrade<'a> {
    client_state: AnyClientState,
    consensus_state: AnyConsensusState,
    proof_client: &'a [u8],
    proof_consensus_state: &'a [u8],
}

fn upgrade_to<C: RoutedClient>(
    client: &C,
    store: &mut impl ClientStore,
    client_id: &str,
    client_state: AnyClientState,
    upgrade: Upgrade<'_>,
) -> Result<Height, HostError> {
    let client_state = client.downcast_client_state(client_state)?;
    let upgraded_client_state = client.downcast_client_state(upgrade.client_state)?;
    let upgraded_consensus_state = client.downcast_consensus_state(upgrade.consensus_state)?;
    let now = store.host_timestamp()?;
    ensure_active(client, store, client_id, &client_state, now)?;

    let latest_consensus_state = get_consensus_state(
        client,
        store,
        client_id,
        client.latest_height(&client_state),
    )?;
    let output = client
        .verify_upgrade(
            &client_state,
            &latest_consensus_state,
            &upgraded_client_state,
            &upgraded_consensus_state,
            upgrade.proof_client,
            upgrade.proof_consensus_state,
        )
        .map_err(C::wrap_error)?;

    store.set_consensus_state(
        client_id,
        output.height,
        C::wrap_consensus_state(output.consensus_state),
    )?;
    store.set_client_state(client_id, C::wrap_client_state(output.client_state))?;
    tracing::info!(height = %output.height, "client upgraded");
    Ok(output.height)
}

/// Verifies that `value` is stored at `path` under the root of the consensus state of
/// `client_id` at `height`.
/// # Errors
/// Returns an error if the client is not active, no consensus state is stored at `height`, or
/// the proof does not verify.
#[tracing::instrument(skip_all, fields(client_id = %client_id, height = %height))]
pub fn verify_membership(
    router: &ClientRouter,
    store: &impl ClientStore,
    client_id: &str,
    height: Height,
    proof: &[u8],
    path: &[Vec<u8>],
    value: &[u8],
) -> Result<(), HostError> {
    let (module, client_state) = load_client(router, store, client_id)?;
    let query = ProofQuery {
        height,
        proof,
        path,
        value: Some(value),
    };

    with_client!(module, client => verify_proof(client, store, client_id, client_state, &query))
}

/// Verifies that nothing is stored at `path` under the root of the consensus state of
/// `client_id` at `height`.
/// # Errors
/// Returns an error if the client is not active, no consensus state is stored at `height`, or
/// the proof does not verify.
#[tracing::instrument(skip_all, fields(client_id = %client_id, height = %height))]
pub fn verify_non_membership(
    router: &ClientRouter,
    store: &impl ClientStore,
    client_id: &str,
    height: Height,
    proof: &[u8],
    path: &[Vec<u8>],
) -> Result<(), HostError> {
    let (module, client_state) = load_client(router, store, client_id)?;
    let query = ProofQuery {
        height,
        proof,
        path,
        value: None,
    };

    with_client!(module, client => verify_proof(client, store, client_id, client_state, &query))
}

/// A membership proof, or a non-membership proof when `value` is `None`
struct ProofQuery<'a> {
    height: Height,
    proof: &'a [u8],
    path: &'a [Vec<u8>],
    value: Option<&'a [u8]>,
}

fn verify_proof<C: RoutedClient>(
    client: &C,
    store: &impl ClientStore,
    client_id: &str,
    client_state: AnyClientState,
    query: &ProofQuery<'_>,
) -> Result<(), HostError> {
    let client_state = client.downcast_client_state(client_state)?;
    let now = store.host_timestamp()?;
    ensure_active(client, store, client_id, &client_state, now)?;

    let consensus_state = get_consensus_state(client, store, client_id, query.height)?;
    match query.value {
        Some(value) => client.verify_membership(
            &client_state,
            &consensus_state,
            query.proof,
            query.path,
            value,
        ),
        None => client.verify_non_membership(
            &client_state,
            &consensus_state,
            query.proof,
            query.path,
        ),
    }
    .map_err(C::wrap_error)
}

fn ensure_not_frozen<C: RoutedClient>(
    client: &C,
    client_state: &C::ClientState,
    client_id: &str,
    now: u64,
) -> Result<(), HostError> {
    ensure!(
        client.status(client_state, None, now) != Status::Frozen,
        HostError::ClientFrozen {
            client_id: client_id.to_string(),
        }
    );
    Ok(())
}

fn ensure_active<C: RoutedClient>(
    client: &C,
    store: &impl ClientStore,
    client_id: &str,
    client_state: &C::ClientState,
    now: u64,
) -> Result<(), HostError> {
    let status = client_status(client, store, client_id, client_state, now)?;
    ensure!(
        status.is_active(),
        HostError::ClientNotActive {
            client_id: client_id.to_string(),
            status,
        }
    );
    Ok(())
}
