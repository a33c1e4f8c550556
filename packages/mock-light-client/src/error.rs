//! Defines the mock client error type.

use light_client_interface::Height;

/// The error type of the mock client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs, clippy::module_name_repetitions)]
pub enum MockClientError {
    #[error("client is frozen at height {frozen_height}")]
    ClientFrozen { frozen_height: Height },

    #[error("header height {header_height} must be greater than trusted height {trusted_height}")]
    InvalidHeaderHeight {
        header_height: Height,
        trusted_height: Height,
    },

    #[error("header timestamp {header_time} must be greater than trusted timestamp {trusted_time}")]
    InvalidHeaderTime { header_time: u64, trusted_time: u64 },

    #[error("invalid client state: {0}")]
    InvalidClientState(String),

    #[error("invalid consensus state: {0}")]
    InvalidConsensusState(String),

    #[error("headers do not show misbehaviour")]
    NoMisbehaviour,

    #[error("mock clients cannot be upgraded")]
    UpgradeNotSupported,
}
