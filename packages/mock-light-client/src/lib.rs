#![doc = include_str!("../README.md")]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

// rstest is only used by the integration tests
#[cfg(test)]
use rstest as _;

pub mod client;
pub mod error;
pub mod types;

pub use client::MockClient;
pub use error::MockClientError;
pub use types::{ClientState, ConsensusState, Header, Misbehaviour};
