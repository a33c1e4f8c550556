//! This module contains the read-only entry points.

use light_client_interface::{Height, LightClient, Status};

use crate::{
    any::{AnyClientState, AnyConsensusState},
    error::HostError,
    router::{
        find_consensus_state, get_consensus_state, load_client, with_client, ClientRouter,
        RoutedClient,
    },
    state::ClientStore,
};

/// Computes the status of `client_id`. A client that does not exist is [`Status::Unknown`].
/// # Errors
/// Returns an error if the client type is not allowed or the store fails.
pub fn status(
    router: &ClientRouter,
    store: &impl ClientStore,
    client_id: &str,
) -> Result<Status, HostError> {
    let Some(client_state) = store.client_state(client_id)? else {
        return Ok(Status::Unknown);
    };
    let module = router.module(client_state.client_type())?;
    let now = store.host_timestamp()?;

    with_client!(module, client => {
        let client_state = client.downcast_client_state(client_state)?;
        client_status(client, store, client_id, &client_state, now)
    })
}

/// Returns the stored client state of `client_id`.
/// # Errors
/// Returns an error if the client does not exist or the store fails.
pub fn client_state(store: &impl ClientStore, client_id: &str) -> Result<AnyClientState, HostError> {
    store
        .client_state(client_id)?
        .ok_or_else(|| HostError::ClientNotFound {
            client_id: client_id.to_string(),
        })
}

/// Returns the consensus state of `client_id` stored at `height`.
/// # Errors
/// Returns an error if no consensus state is stored at `height` or the store fails.
pub fn consensus_state(
    store: &impl ClientStore,
    client_id: &str,
    height: Height,
) -> Result<AnyConsensusState, HostError> {
    store
        .consensus_state(client_id, height)?
        .ok_or_else(|| HostError::ConsensusStateNotFound {
            client_id: client_id.to_string(),
            height,
        })
}

/// Returns the heights of every stored consensus state of `client_id`, ascending.
/// # Errors
/// Returns an error if the client does not exist or the store fails.
pub fn consensus_state_heights(
    store: &impl ClientStore,
    client_id: &str,
) -> Result<Vec<Height>, HostError> {
    client_state(store, client_id)?;
    Ok(store
        .consensus_states(client_id)?
        .map(|(height, _)| height)
        .collect())
}

/// Returns the latest height of `client_id`.
/// # Errors
/// Returns an error if the client does not exist, its type is not allowed, or the store fails.
pub fn latest_height(
    router: &ClientRouter,
    store: &impl ClientStore,
    client_id: &str,
) -> Result<Height, HostError> {
    let (module, client_state) = load_client(router, store, client_id)?;

    with_client!(module, client => {
        let client_state = client.downcast_client_state(client_state)?;
        Ok(client.latest_height(&client_state))
    })
}

/// Returns the timestamp, in nanoseconds, of the consensus state of `client_id` at `height`.
/// # Errors
/// Returns an error if the client or the consensus state does not exist or the store fails.
pub fn timestamp_at_height(
    router: &ClientRouter,
    store: &impl ClientStore,
    client_id: &str,
    height: Height,
) -> Result<u64, HostError> {
    let (module, _) = load_client(router, store, client_id)?;

    with_client!(module, client => {
        let consensus_state = get_consensus_state(client, store, client_id, height)?;
        Ok(client.consensus_timestamp(&consensus_state))
    })
}

/// Computes the status from the client state and the consensus state at its latest height.
pub(crate) fn client_status<C: RoutedClient>(
    client: &C,
    store: &impl ClientStore,
    client_id: &str,
    client_state: &C::ClientState,
    now: u64,
) -> Result<Status, HostError> {
    let latest_consensus_state =
        find_consensus_state(client, store, client_id, client.latest_height(client_state))?;
    Ok(client.status(client_state, latest_consensus_state.as_ref(), now))
}
