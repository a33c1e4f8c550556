//! This module defines [`Status`].

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The client status types
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Copy, Debug)]
pub enum Status {
    /// The client is active and accepts updates and proofs
    Active,
    /// The latest consensus state is older than the trusting period
    Expired,
    /// Misbehaviour was detected, the client is permanently frozen
    Frozen,
    /// The client or its latest consensus state could not be found
    Unknown,
}

impl Status {
    /// Returns true if the client is [`Status::Active`].
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Expired => write!(f, "Expired"),
            Self::Frozen => write!(f, "Frozen"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}
