//! This module defines [`TendermintClient`], the [`LightClient`] implementation of the
//! Tendermint client type.

use light_client_interface::{Height, LightClient, Status, UpdateOutput};

use crate::{
    client_state::ClientState,
    consensus_state::ConsensusState,
    error::TendermintClientError,
    header::Header,
    membership,
    misbehaviour::{verify_misbehaviour, Misbehaviour},
    signature::{Ed25519Verifier, SignatureVerifier},
    update::update_consensus_state,
    upgrade,
    verify::verify_header,
};

/// The Tendermint light client, parameterised over the commit signature verifier.
#[derive(Clone, Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct TendermintClient<V = Ed25519Verifier> {
    verifier: V,
}

impl TendermintClient {
    /// Creates a client that verifies ed25519 commit signatures.
    #[must_use]
    pub const fn ed25519() -> Self {
        Self {
            verifier: Ed25519Verifier,
        }
    }
}

impl<V: SignatureVerifier> TendermintClient<V> {
    /// Creates a client using `verifier` for commit signatures.
    pub const fn new(verifier: V) -> Self {
        Self { verifier }
    }
}

impl<V: SignatureVerifier> LightClient for TendermintClient<V> {
    type ClientState = ClientState;
    type ConsensusState = ConsensusState;
    type Header = Header;
    type Misbehaviour = Misbehaviour;
    type Error = TendermintClientError;

    const CLIENT_TYPE: &'static str = "07-tendermint";

    fn latest_height(&self, client_state: &ClientState) -> Height {
        client_state.latest_height
    }

    fn consensus_timestamp(&self, consensus_state: &ConsensusState) -> u64 {
        consensus_state.timestamp
    }

    fn trusted_height(&self, header: &Header) -> Height {
        header.trusted_height
    }

    fn misbehaviour_trusted_heights(&self, misbehaviour: &Misbehaviour) -> (Height, Height) {
        (
            misbehaviour.header_1.trusted_height,
            misbehaviour.header_2.trusted_height,
        )
    }

    fn initialize(
        &self,
        client_state: &ClientState,
        consensus_state: &ConsensusState,
    ) -> Result<(), TendermintClientError> {
        client_state.validate()?;
        consensus_state.validate()?;
        if client_state.is_frozen() {
            return Err(TendermintClientError::InvalidClientState(
                "client cannot be created frozen".to_string(),
            ));
        }
        Ok(())
    }

    fn verify_header(
        &self,
        client_state: &ClientState,
        trusted_consensus_state: &ConsensusState,
        header: &Header,
        now: u64,
    ) -> Result<UpdateOutput<ClientState, ConsensusState>, TendermintClientError> {
        verify_header(
            client_state,
            trusted_consensus_state,
            header,
            now,
            &self.verifier,
        )?;
        Ok(update_consensus_state(client_state, header))
    }

    fn check_misbehaviour(
        &self,
        client_state: &ClientState,
        trusted_consensus_state_1: &ConsensusState,
        trusted_consensus_state_2: &ConsensusState,
        misbehaviour: &Misbehaviour,
        now: u64,
    ) -> Result<Height, TendermintClientError> {
        verify_misbehaviour(
            client_state,
            trusted_consensus_state_1,
            trusted_consensus_state_2,
            misbehaviour,
            now,
            &self.verifier,
        )
    }

    fn freeze(&self, client_state: &ClientState, height: Height) -> ClientState {
        client_state.freeze(height)
    }

    fn status(
        &self,
        client_state: &ClientState,
        latest_consensus_state: Option<&ConsensusState>,
        now: u64,
    ) -> Status {
        client_state.status(latest_consensus_state, now)
    }

    fn is_expired(&self, client_state: &ClientState, consensus_timestamp: u64, now: u64) -> bool {
        client_state.is_expired(consensus_timestamp, now)
    }

    fn verify_membership(
        &self,
        client_state: &ClientState,
        consensus_state: &ConsensusState,
        proof: &[u8],
        path: &[Vec<u8>],
        value: &[u8],
    ) -> Result<(), TendermintClientError> {
        membership::verify_membership(
            &client_state.proof_specs,
            &consensus_state.root,
            proof,
            path,
            value,
        )
    }

    fn verify_non_membership(
        &self,
        client_state: &ClientState,
        consensus_state: &ConsensusState,
        proof: &[u8],
        path: &[Vec<u8>],
    ) -> Result<(), TendermintClientError> {
        membership::verify_non_membership(
            &client_state.proof_specs,
            &consensus_state.root,
            proof,
            path,
        )
    }

    fn verify_upgrade(
        &self,
        client_state: &ClientState,
        consensus_state: &ConsensusState,
        upgraded_client_state: &ClientState,
        upgraded_consensus_state: &ConsensusState,
        proof_upgrade_client: &[u8],
        proof_upgrade_consensus_state: &[u8],
    ) -> Result<UpdateOutput<ClientState, ConsensusState>, TendermintClientError> {
        upgrade::verify_upgrade(
            client_state,
            consensus_state,
            upgraded_client_state,
            upgraded_consensus_state,
            proof_upgrade_client,
            proof_upgrade_consensus_state,
        )
    }
}
