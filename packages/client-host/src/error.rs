//! Defines the host error type.

use ics07_tendermint_light_client::TendermintClientError;
use light_client_interface::{Height, Status};
use mock_light_client::MockClientError;

use crate::state::StoreError;

/// The error type of the host entry points
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs, clippy::module_name_repetitions)]
pub enum HostError {
    #[error("client {client_id} not found")]
    ClientNotFound { client_id: String },

    #[error("client {client_id} already exists")]
    ClientAlreadyExists { client_id: String },

    #[error("client type {client_type} is not allowed on this host")]
    ClientTypeNotAllowed { client_type: String },

    #[error("client type {client_type} is not registered")]
    ClientTypeNotRegistered { client_type: String },

    #[error("expected {expected} client message, found {found}")]
    ClientTypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("client {client_id} is frozen")]
    ClientFrozen { client_id: String },

    #[error("client {client_id} is not active: {status}")]
    ClientNotActive { client_id: String, status: Status },

    #[error("consensus state of client {client_id} at height {height} not found")]
    ConsensusStateNotFound { client_id: String, height: Height },

    #[error("a different consensus state of client {client_id} is already stored at height {height}")]
    ConsensusStateConflict { client_id: String, height: Height },

    #[error("consensus state timestamp at height {height} is not between its neighbours")]
    NonMonotonicTimestamp { height: Height },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("tendermint client error: {0}")]
    Tendermint(#[from] TendermintClientError),

    #[error("mock client error: {0}")]
    Mock(#[from] MockClientError),
}
