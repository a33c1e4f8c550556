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

pub mod any;
pub mod config;
pub mod error;
pub mod instantiate;
pub mod prune;
pub mod query;
pub mod router;
pub mod state;
pub mod sudo;

pub use config::HostConfig;
pub use error::HostError;
pub use router::ClientRouter;
pub use state::{ClientStore, MemoryStore};
