//! Pruning of expired consensus states.

use light_client_interface::Height;

use crate::{
    any::AnyClientState,
    error::HostError,
    router::{load_client, with_client, ClientRouter, RoutedClient},
    state::ClientStore,
};

/// Deletes the expired consensus states of `client_id`, oldest first and at most
/// `max_pruned_per_update` of them, and returns how many were deleted.
///
/// Expiry is measured against the timestamp of the newest stored consensus state, which is
/// never deleted.
/// # Errors
/// Returns an error if the client does not exist or the store fails.
#[tracing::instrument(skip_all, fields(client_id = %client_id))]
pub fn prune_expired_consensus_states(
    router: &ClientRouter,
    store: &mut impl ClientStore,
    client_id: &str,
) -> Result<usize, HostError> {
    let (module, client_state) = load_client(router, store, client_id)?;
    let limit = router.config().max_pruned_per_update;

    with_client!(module, client => prune_stored(client, store, client_id, client_state, limit))
}

fn prune_stored<C: RoutedClient>(
    client: &C,
    store: &mut impl ClientStore,
    client_id: &str,
    client_state: AnyClientState,
    limit: usize,
) -> Result<usize, HostError> {
    let client_state = client.downcast_client_state(client_state)?;
    prune_client(client, store, client_id, &client_state, None, limit)
}

/// Deletes up to `limit` expired consensus states of `client_id`.
///
/// `pending` is a consensus state about to be written at the given height with the given
/// timestamp. It takes part in choosing the newest timestamp and is never deleted, so an update
/// can prune before it writes.
pub(crate) fn prune_client<C: RoutedClient>(
    client: &C,
    store: &mut impl ClientStore,
    client_id: &str,
    client_state: &C::ClientState,
    pending: Option<(Height, u64)>,
    limit: usize,
) -> Result<usize, HostError> {
    let mut stored = store
        .consensus_states(client_id)?
        .map(|(height, consensus_state)| {
            let consensus_state = client.downcast_consensus_state(consensus_state)?;
            Ok((height, client.consensus_timestamp(&consensus_state)))
        })
        .collect::<Result<Vec<(Height, u64)>, HostError>>()?;
    if let Some(pending) = pending {
        stored.push(pending);
        stored.sort_unstable_by_key(|(height, _)| *height);
    }

    let Some(&(newest_height, newest_timestamp)) = stored.last() else {
        return Ok(0);
    };
    let latest_height = client.latest_height(client_state);
    let pending_height = pending.map(|(height, _)| height);

    let expired: Vec<Height> = stored
        .iter()
        .filter(|(height, timestamp)| {
            *height != newest_height
                && *height != latest_height
                && Some(*height) != pending_height
                && client.is_expired(client_state, *timestamp, newest_timestamp)
        })
        .map(|(height, _)| *height)
        .take(limit)
        .collect();

    for height in &expired {
        store.delete_consensus_state(client_id, *height)?;
    }
    if !expired.is_empty() {
        tracing::debug!(pruned = expired.len(), newest = %newest_height, "pruned expired consensus states");
    }

    Ok(expired.len())
}
