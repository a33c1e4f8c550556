//! Common test utilities and fixtures

#![allow(dead_code)]

use ibc_client_host::{
    any::{AnyClientState, AnyConsensusState},
    instantiate::initialize,
    query, sudo, ClientRouter, HostConfig, HostError, MemoryStore,
};
use ics07_tendermint_light_client::{
    test_utils::{
        fixtures::{self, after_trusted, CHAIN_ID, TRUSTED_TIME},
        HeaderBuilder, TestValidators,
    },
    ClientState, ConsensusState, Header,
};
use light_client_interface::Height;

pub const CLIENT_ID: &str = "07-tendermint-0";
pub const MOCK_CLIENT_ID: &str = "mock-0";

/// Height of the consensus state the client is created with
pub const TRUSTED_HEIGHT: Height = Height::new(1, 10);

pub const DAY: u64 = 24 * 60 * 60;

/// A host with one Tendermint client trusting three equal validators at height 10
pub struct TestHost {
    pub router: ClientRouter,
    pub store: MemoryStore,
    pub validators: TestValidators,
}

impl TestHost {
    /// Starts a header at `height`, `seconds` after the trusted time, verified against the
    /// creation height.
    pub fn header(&self, height: u64, seconds: u64) -> HeaderBuilder {
        HeaderBuilder::new(CHAIN_ID, height, after_trusted(seconds), &self.validators)
            .trusted(TRUSTED_HEIGHT, &self.validators)
    }

    pub fn update(&mut self, header: Header) -> Result<Height, HostError> {
        sudo::update_client(&self.router, &mut self.store, CLIENT_ID, header.into())
    }

    /// Moves the host clock to `seconds` after the trusted time.
    pub fn set_now(&mut self, seconds: u64) {
        self.store.set_timestamp(after_trusted(seconds));
    }

    pub fn heights(&self) -> Vec<Height> {
        query::consensus_state_heights(&self.store, CLIENT_ID).unwrap()
    }

    pub fn client_state(&self) -> ClientState {
        match query::client_state(&self.store, CLIENT_ID).unwrap() {
            AnyClientState::Tendermint(client_state) => client_state,
            other => panic!("unexpected client state {other:?}"),
        }
    }

    pub fn consensus_state(&self, height: Height) -> ConsensusState {
        match query::consensus_state(&self.store, CLIENT_ID, height).unwrap() {
            AnyConsensusState::Tendermint(consensus_state) => consensus_state,
            other => panic!("unexpected consensus state {other:?}"),
        }
    }
}

pub fn host_config() -> HostConfig {
    HostConfig {
        allowed_clients: vec!["07-tendermint".to_string(), "mock".to_string()],
        ..HostConfig::default()
    }
}

pub fn setup_test_host() -> TestHost {
    setup_test_host_with(host_config(), fixtures::APP_HASH)
}

/// A host whose Tendermint client is created with `root` as the trusted commitment root
pub fn setup_test_host_with(config: HostConfig, root: [u8; 32]) -> TestHost {
    let validators = TestValidators::new(&[10, 10, 10]);
    let router = ClientRouter::from_config(config).unwrap();
    let mut store = MemoryStore::new(after_trusted(60));

    let mut consensus_state =
        fixtures::consensus_state(TRUSTED_TIME, validators.validator_set().hash());
    consensus_state.root = root;
    initialize(
        &router,
        &mut store,
        CLIENT_ID,
        fixtures::client_state(CHAIN_ID, TRUSTED_HEIGHT).into(),
        consensus_state.into(),
    )
    .unwrap();

    TestHost {
        router,
        store,
        validators,
    }
}
