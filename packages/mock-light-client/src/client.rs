//! This module defines [`MockClient`].

use light_client_interface::{Height, LightClient, Status, UpdateOutput};
use light_client_utils::ensure;

use crate::{
    error::MockClientError,
    types::{ClientState, ConsensusState, Header, Misbehaviour},
};

/// The mock light client
#[derive(Clone, Copy, Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct MockClient;

impl MockClient {
    fn verify_header_against(
        client_state: &ClientState,
        trusted_consensus_state: &ConsensusState,
        header: &Header,
    ) -> Result<(), MockClientError> {
        ensure!(
            !client_state.is_frozen(),
            MockClientError::ClientFrozen {
                frozen_height: client_state.frozen_height,
            }
        );
        ensure!(
            header.height > header.trusted_height,
            MockClientError::InvalidHeaderHeight {
                header_height: header.height,
                trusted_height: header.trusted_height,
            }
        );
        ensure!(
            header.timestamp > trusted_consensus_state.timestamp,
            MockClientError::InvalidHeaderTime {
                header_time: header.timestamp,
                trusted_time: trusted_consensus_state.timestamp,
            }
        );
        Ok(())
    }
}

impl LightClient for MockClient {
    type ClientState = ClientState;
    type ConsensusState = ConsensusState;
    type Header = Header;
    type Misbehaviour = Misbehaviour;
    type Error = MockClientError;

    const CLIENT_TYPE: &'static str = "mock";

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
    ) -> Result<(), MockClientError> {
        ensure!(
            !client_state.latest_height.is_zero(),
            MockClientError::InvalidClientState("latest height must be non-zero".to_string())
        );
        ensure!(
            !client_state.is_frozen(),
            MockClientError::InvalidClientState("client cannot be created frozen".to_string())
        );
        ensure!(
            consensus_state.timestamp > 0,
            MockClientError::InvalidConsensusState("timestamp must be non-zero".to_string())
        );
        Ok(())
    }

    fn verify_header(
        &self,
        client_state: &ClientState,
        trusted_consensus_state: &ConsensusState,
        header: &Header,
        _now: u64,
    ) -> Result<UpdateOutput<ClientState, ConsensusState>, MockClientError> {
        Self::verify_header_against(client_state, trusted_consensus_state, header)?;

        let mut new_client_state = client_state.clone();
        new_client_state.latest_height = client_state.latest_height.max(header.height);
        tracing::debug!(height = %header.height, "mock header accepted");

        Ok(UpdateOutput {
            height: header.height,
            client_state: new_client_state,
            consensus_state: header.consensus_state(),
        })
    }

    fn check_misbehaviour(
        &self,
        client_state: &ClientState,
        trusted_consensus_state_1: &ConsensusState,
        trusted_consensus_state_2: &ConsensusState,
        misbehaviour: &Misbehaviour,
        _now: u64,
    ) -> Result<Height, MockClientError> {
        Self::verify_header_against(
            client_state,
            trusted_consensus_state_1,
            &misbehaviour.header_1,
        )?;
        Self::verify_header_against(
            client_state,
            trusted_consensus_state_2,
            &misbehaviour.header_2,
        )?;
        ensure!(
            misbehaviour.is_conflicting(),
            MockClientError::NoMisbehaviour
        );

        Ok(misbehaviour
            .header_1
            .height
            .min(misbehaviour.header_2.height))
    }

    fn freeze(&self, client_state: &ClientState, height: Height) -> ClientState {
        let mut frozen = client_state.clone();
        if !client_state.is_frozen() {
            frozen.frozen_height = height;
        }
        frozen
    }

    fn status(
        &self,
        client_state: &ClientState,
        latest_consensus_state: Option<&ConsensusState>,
        _now: u64,
    ) -> Status {
        match (client_state.is_frozen(), latest_consensus_state) {
            (true, _) => Status::Frozen,
            (false, None) => Status::Unknown,
            (false, Some(_)) => Status::Active,
        }
    }

    fn is_expired(&self, _client_state: &ClientState, _consensus_timestamp: u64, _now: u64) -> bool {
        false
    }

    fn verify_membership(
        &self,
        _client_state: &ClientState,
        _consensus_state: &ConsensusState,
        _proof: &[u8],
        _path: &[Vec<u8>],
        _value: &[u8],
    ) -> Result<(), MockClientError> {
        Ok(())
    }

    fn verify_non_membership(
        &self,
        _client_state: &ClientState,
        _consensus_state: &ConsensusState,
        _proof: &[u8],
        _path: &[Vec<u8>],
    ) -> Result<(), MockClientError> {
        Ok(())
    }

    fn verify_upgrade(
        &self,
        _client_state: &ClientState,
        _consensus_state: &ConsensusState,
        _upgraded_client_state: &ClientState,
        _upgraded_consensus_state: &ConsensusState,
        _proof_upgrade_client: &[u8],
        _proof_upgrade_consensus_state: &[u8],
    ) -> Result<UpdateOutput<ClientState, ConsensusState>, MockClientError> {
        Err(MockClientError::UpgradeNotSupported)
    }
}
