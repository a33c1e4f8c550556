//! This module provides [`update_consensus_state`] to compute the states produced by a verified
//! header.

use light_client_interface::UpdateOutput;

use crate::{client_state::ClientState, consensus_state::ConsensusState, header::Header};

/// Takes in the current client state and a verified header and returns the new consensus state
/// and the client state with its latest height advanced to the header's height if higher.
#[must_use = "the client state is not updated in place, a new one is returned"]
pub fn update_consensus_state(
    client_state: &ClientState,
    header: &Header,
) -> UpdateOutput<ClientState, ConsensusState> {
    let height = header.height();

    let mut new_client_state = client_state.clone();
    new_client_state.latest_height = new_client_state.latest_height.max(height);

    UpdateOutput {
        height,
        client_state: new_client_state,
        consensus_state: header.consensus_state(),
    }
}
