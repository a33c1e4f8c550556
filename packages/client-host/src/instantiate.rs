//! This module contains the client creation entry point.

use light_client_interface::Height;
use light_client_utils::ensure;

use crate::{
    any::{AnyClientState, AnyConsensusState},
    error::HostError,
    router::{with_client, ClientRouter, RoutedClient},
    state::ClientStore,
};

/// Creates `client_id` from its first trusted client and consensus state. The states are
/// validated but not verified, and the consensus state is stored at the client's latest height.
/// # Errors
/// Returns an error if the client exists, its type is not allowed, or either state is invalid.
#[tracing::instrument(skip_all, fields(client_id = %client_id))]
pub fn initialize(
    router: &ClientRouter,
    store: &mut impl ClientStore,
    client_id: &str,
    client_state: AnyClientState,
    consensus_state: AnyConsensusState,
) -> Result<Height, HostError> {
    ensure!(
        store.client_state(client_id)?.is_none(),
        HostError::ClientAlreadyExists {
            client_id: client_id.to_string(),
        }
    );
    let module = router.module(client_state.client_type())?;

    with_client!(module, client => {
        create_client(client, store, client_id, client_state, consensus_state)
    })
}

fn create_client<C: RoutedClient>(
    client: &C,
    store: &mut impl ClientStore,
    client_id: &str,
    client_state: AnyClientState,
    consensus_state: AnyConsensusState,
) -> Result<Height, HostError> {
    let client_state = client.downcast_client_state(client_state)?;
    let consensus_state = client.downcast_consensus_state(consensus_state)?;
    client
        .initialize(&client_state, &consensus_state)
        .map_err(C::wrap_error)?;

    let height = client.latest_height(&client_state);
    store.set_consensus_state(client_id, height, C::wrap_consensus_state(consensus_state))?;
    store.set_client_state(client_id, C::wrap_client_state(client_state))?;

    tracing::info!(client_type = C::CLIENT_TYPE, %height, "client created");
    Ok(height)
}
