//! Common test utilities and fixtures

#![allow(dead_code)]

use ics07_tendermint_light_client::{
    error::TendermintClientError,
    test_utils::{
        fixtures::{self, after_trusted, CHAIN_ID, TRUSTED_TIME},
        HeaderBuilder, TestValidators,
    },
    ClientState, ConsensusState, Header, TendermintClient,
};
use light_client_interface::{Height, LightClient, UpdateOutput};

/// Height of the trusted consensus state
pub const TRUSTED_HEIGHT: Height = Height::new(1, 10);

/// A client trusting three equal validators at height 10
pub struct TestContext {
    pub client: TendermintClient,
    pub client_state: ClientState,
    pub trusted_consensus_state: ConsensusState,
    pub validators: TestValidators,
    pub now: u64,
}

impl TestContext {
    /// Starts a header at `height`, `seconds` after the trusted time, verified against the
    /// trusted height.
    pub fn header(&self, height: u64, seconds: u64) -> HeaderBuilder {
        HeaderBuilder::new(CHAIN_ID, height, after_trusted(seconds), &self.validators)
            .trusted(TRUSTED_HEIGHT, &self.validators)
    }

    pub fn verify(
        &self,
        header: &Header,
    ) -> Result<UpdateOutput<ClientState, ConsensusState>, TendermintClientError> {
        self.client.verify_header(
            &self.client_state,
            &self.trusted_consensus_state,
            header,
            self.now,
        )
    }
}

pub fn setup_test_context() -> TestContext {
    setup_test_context_with_powers(&[10, 10, 10])
}

pub fn setup_test_context_with_powers(powers: &[u64]) -> TestContext {
    let validators = TestValidators::new(powers);
    TestContext {
        client: TendermintClient::ed25519(),
        client_state: fixtures::client_state(CHAIN_ID, TRUSTED_HEIGHT),
        trusted_consensus_state: fixtures::consensus_state(
            TRUSTED_TIME,
            validators.validator_set().hash(),
        ),
        validators,
        now: after_trusted(60),
    }
}
