//! The ICS-07 Tendermint light client verification engine.

#![doc = include_str!("../README.md")]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]
#![cfg_attr(test, allow(unused_crate_dependencies))]

pub mod chain_id;
pub mod client;
pub mod client_state;
pub mod commit;
pub mod consensus_state;
pub mod error;
pub mod header;
pub mod membership;
pub mod misbehaviour;
pub mod signature;
pub mod trust_threshold;
pub mod update;
pub mod upgrade;
pub mod validators;
pub mod verify;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::TendermintClient;
pub use client_state::ClientState;
pub use consensus_state::ConsensusState;
pub use error::TendermintClientError;
pub use header::Header;
pub use misbehaviour::Misbehaviour;
