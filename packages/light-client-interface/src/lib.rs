//! Shared types and the capability interface for light clients.

#![doc = include_str!("../README.md")]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod client;
pub mod height;
pub mod status;

pub use client::{LightClient, UpdateOutput};
pub use height::Height;
pub use status::Status;
