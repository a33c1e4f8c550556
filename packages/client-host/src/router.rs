//! Dispatch from a stored client type tag to its light client implementation.

use std::collections::BTreeMap;

use ics07_tendermint_light_client::TendermintClient;
use light_client_interface::{Height, LightClient};
use mock_light_client::MockClient;

use crate::{
    any::{AnyClientState, AnyConsensusState, AnyHeader, AnyMisbehaviour},
    config::HostConfig,
    error::HostError,
    state::ClientStore,
};

/// A light client the host can route to, with conversions from and to the host's tagged types.
pub trait RoutedClient: LightClient {
    /// Unwraps a client state of this client type.
    fn unwrap_client_state(client_state: AnyClientState) -> Option<Self::ClientState>;
    /// Unwraps a consensus state of this client type.
    fn unwrap_consensus_state(consensus_state: AnyConsensusState) -> Option<Self::ConsensusState>;
    /// Unwraps a header of this client type.
    fn unwrap_header(header: AnyHeader) -> Option<Self::Header>;
    /// Unwraps misbehaviour of this client type.
    fn unwrap_misbehaviour(misbehaviour: AnyMisbehaviour) -> Option<Self::Misbehaviour>;
    /// Wraps a client state of this client type.
    fn wrap_client_state(client_state: Self::ClientState) -> AnyClientState;
    /// Wraps a consensus state of this client type.
    fn wrap_consensus_state(consensus_state: Self::ConsensusState) -> AnyConsensusState;
    /// Wraps an error of this client type.
    fn wrap_error(error: Self::Error) -> HostError;

    /// Unwraps a client state, failing if it belongs to another client type.
    /// # Errors
    /// Returns [`HostError::ClientTypeMismatch`] for another client type.
    fn downcast_client_state(
        &self,
        client_state: AnyClientState,
    ) -> Result<Self::ClientState, HostError> {
        let found = client_state.client_type();
        Self::unwrap_client_state(client_state).ok_or(HostError::ClientTypeMismatch {
            expected: Self::CLIENT_TYPE,
            found,
        })
    }

    /// Unwraps a consensus state, failing if it belongs to another client type.
    /// # Errors
    /// Returns [`HostError::ClientTypeMismatch`] for another client type.
    fn downcast_consensus_state(
        &self,
        consensus_state: AnyConsensusState,
    ) -> Result<Self::ConsensusState, HostError> {
        let found = consensus_state.client_type();
        Self::unwrap_consensus_state(consensus_state).ok_or(HostError::ClientTypeMismatch {
            expected: Self::CLIENT_TYPE,
            found,
        })
    }

    /// Unwraps a header, failing if it belongs to another client type.
    /// # Errors
    /// Returns [`HostError::ClientTypeMismatch`] for another client type.
    fn downcast_header(&self, header: AnyHeader) -> Result<Self::Header, HostError> {
        let found = header.client_type();
        Self::unwrap_header(header).ok_or(HostError::ClientTypeMismatch {
            expected: Self::CLIENT_TYPE,
            found,
        })
    }

    /// Unwraps misbehaviour, failing if it belongs to another client type.
    /// # Errors
    /// Returns [`HostError::ClientTypeMismatch`] for another client type.
    fn downcast_misbehaviour(
        &self,
        misbehaviour: AnyMisbehaviour,
    ) -> Result<Self::Misbehaviour, HostError> {
        let found = misbehaviour.client_type();
        Self::unwrap_misbehaviour(misbehaviour).ok_or(HostError::ClientTypeMismatch {
            expected: Self::CLIENT_TYPE,
            found,
        })
    }
}

macro_rules! routed_client {
    ($client:ty, $variant:ident) => {
        impl RoutedClient for $client {
            fn unwrap_client_state(client_state: AnyClientState) -> Option<Self::ClientState> {
                match client_state {
                    AnyClientState::$variant(client_state) => Some(client_state),
                    _ => None,
                }
            }

            fn unwrap_consensus_state(
                consensus_state: AnyConsensusState,
            ) -> Option<Self::ConsensusState> {
                match consensus_state {
                    AnyConsensusState::$variant(consensus_state) => Some(consensus_state),
                    _ => None,
                }
            }

            fn unwrap_header(header: AnyHeader) -> Option<Self::Header> {
                match header {
                    AnyHeader::$variant(header) => Some(header),
                    _ => None,
                }
            }

            fn unwrap_misbehaviour(misbehaviour: AnyMisbehaviour) -> Option<Self::Misbehaviour> {
                match misbehaviour {
                    AnyMisbehaviour::$variant(misbehaviour) => Some(misbehaviour),
                    _ => None,
                }
            }

            fn wrap_client_state(client_state: Self::ClientState) -> AnyClientState {
                AnyClientState::$variant(client_state)
            }

            fn wrap_consensus_state(consensus_state: Self::ConsensusState) -> AnyConsensusState {
                AnyConsensusState::$variant(consensus_state)
            }

            fn wrap_error(error: Self::Error) -> HostError {
                HostError::$variant(error)
            }
        }
    };
}

routed_client!(TendermintClient, Tendermint);
routed_client!(MockClient, Mock);

/// A registered light client implementation
#[derive(Clone, Debug)]
pub enum ClientModule {
    /// The Tendermint client
    Tendermint(TendermintClient),
    /// The mock client
    Mock(MockClient),
}

impl ClientModule {
    /// Every client type the host can route to.
    #[must_use]
    pub fn registered() -> Vec<Self> {
        vec![
            Self::Tendermint(TendermintClient::ed25519()),
            Self::Mock(MockClient),
        ]
    }

    /// Returns the client type tag.
    #[must_use]
    pub const fn client_type(&self) -> &'static str {
        match self {
            Self::Tendermint(_) => <TendermintClient as LightClient>::CLIENT_TYPE,
            Self::Mock(_) => MockClient::CLIENT_TYPE,
        }
    }
}

/// Runs `$body` with `$client` bound to the concrete light client of `$module`.
macro_rules! with_client {
    ($module:expr, $client:ident => $body:expr) => {
        match $module {
            $crate::router::ClientModule::Tendermint($client) => $body,
            $crate::router::ClientModule::Mock($client) => $body,
        }
    };
}
pub(crate) use with_client;

/// The dispatch table from client type tag to light client, built once from the host
/// configuration
#[derive(Clone, Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct ClientRouter {
    modules: BTreeMap<&'static str, ClientModule>,
    config: HostConfig,
}

impl ClientRouter {
    /// Registers every allowed client type.
    /// # Errors
    /// Returns an error if an allowed client type is not registered.
    pub fn from_config(config: HostConfig) -> Result<Self, HostError> {
        let modules: BTreeMap<_, _> = ClientModule::registered()
            .into_iter()
            .filter(|module| config.is_allowed(module.client_type()))
            .map(|module| (module.client_type(), module))
            .collect();

        if let Some(unknown) = config.allowed_clients.iter().find(|client_type| {
            client_type.as_str() != crate::config::ALLOW_ALL_CLIENTS
                && !modules.contains_key(client_type.as_str())
        }) {
            return Err(HostError::ClientTypeNotRegistered {
                client_type: unknown.clone(),
            });
        }

        tracing::debug!(client_types = ?modules.keys().collect::<Vec<_>>(), "client router built");
        Ok(Self { modules, config })
    }

    /// The configuration the router was built from.
    #[must_use]
    pub const fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Returns the light client of `client_type`.
    /// # Errors
    /// Returns an error if the client type is not allowed on this host.
    pub fn module(&self, client_type: &str) -> Result<&ClientModule, HostError> {
        self.modules
            .get(client_type)
            .ok_or_else(|| HostError::ClientTypeNotAllowed {
                client_type: client_type.to_string(),
            })
    }
}

/// Loads the client state of `client_id` and the light client it routes to.
pub(crate) fn load_client<'r>(
    router: &'r ClientRouter,
    store: &impl ClientStore,
    client_id: &str,
) -> Result<(&'r ClientModule, AnyClientState), HostError> {
    let client_state =
        store
            .client_state(client_id)?
            .ok_or_else(|| HostError::ClientNotFound {
                client_id: client_id.to_string(),
            })?;
    let module = router.module(client_state.client_type())?;
    Ok((module, client_state))
}

/// Loads the consensus state of `client_id` at `height`, if any.
pub(crate) fn find_consensus_state<C: RoutedClient>(
    client: &C,
    store: &impl ClientStore,
    client_id: &str,
    height: Height,
) -> Result<Option<C::ConsensusState>, HostError> {
    store
        .consensus_state(client_id, height)?
        .map(|consensus_state| client.downcast_consensus_state(consensus_state))
        .transpose()
}

/// Loads the consensus state of `client_id` at `height`.
pub(crate) fn get_consensus_state<C: RoutedClient>(
    client: &C,
    store: &impl ClientStore,
    client_id: &str,
    height: Height,
) -> Result<C::ConsensusState, HostError> {
    find_consensus_state(client, store, client_id, height)?.ok_or_else(|| {
        HostError::ConsensusStateNotFound {
            client_id: client_id.to_string(),
            height,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_registers_allowed_clients() {
        let router = ClientRouter::from_config(HostConfig::default()).unwrap();
        assert_eq!(
            router.module("07-tendermint").unwrap().client_type(),
            "07-tendermint"
        );
        assert_eq!(
            router.module("mock").unwrap_err(),
            HostError::ClientTypeNotAllowed {
                client_type: "mock".to_string()
            }
        );
    }

    #[test]
    fn test_router_allow_all() {
        let router = ClientRouter::from_config(HostConfig {
            allowed_clients: vec!["*".to_string()],
            ..HostConfig::default()
        })
        .unwrap();
        assert!(router.module("07-tendermint").is_ok());
        assert!(router.module("mock").is_ok());
    }

    #[test]
    fn test_router_rejects_unregistered_client_type() {
        let err = ClientRouter::from_config(HostConfig {
            allowed_clients: vec!["07-tendermint".to_string(), "08-wasm".to_string()],
            ..HostConfig::default()
        })
        .unwrap_err();
        assert_eq!(
            err,
            HostError::ClientTypeNotRegistered {
                client_type: "08-wasm".to_string()
            }
        );
    }
}
