//! State, header and misbehaviour types of the mock client.

use light_client_interface::Height;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The mock client state
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug, Default)]
pub struct ClientState {
    /// The latest height the client was updated to
    pub latest_height: Height,
    /// The height misbehaviour was detected at, zero if not frozen
    #[serde(default)]
    pub frozen_height: Height,
}

impl ClientState {
    /// Returns true if misbehaviour froze the client.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        !self.frozen_height.is_zero()
    }
}

/// The mock consensus state
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
pub struct ConsensusState {
    /// Nanoseconds since the unix epoch
    #[serde(with = "light_client_utils::serde::number_as_string")]
    #[schemars(with = "String")]
    pub timestamp: u64,
    /// The commitment root
    #[serde(with = "light_client_utils::serde::hex_bytes")]
    #[schemars(with = "String")]
    pub root: [u8; 32],
}

/// A mock header, trusted as is
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
pub struct Header {
    /// The new height
    pub height: Height,
    /// The height of the consensus state the header builds on
    pub trusted_height: Height,
    /// Nanoseconds since the unix epoch
    #[serde(with = "light_client_utils::serde::number_as_string")]
    #[schemars(with = "String")]
    pub timestamp: u64,
    /// The commitment root at the new height
    #[serde(with = "light_client_utils::serde::hex_bytes")]
    #[schemars(with = "String")]
    pub root: [u8; 32],
}

impl Header {
    /// The consensus state the header commits to.
    #[must_use]
    pub const fn consensus_state(&self) -> ConsensusState {
        ConsensusState {
            timestamp: self.timestamp,
            root: self.root,
        }
    }
}

/// Two mock headers claimed to conflict
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
pub struct Misbehaviour {
    /// The first header
    pub header_1: Header,
    /// The second header
    pub header_2: Header,
}

impl Misbehaviour {
    /// Returns true if the headers fork at one height or break time monotonicity.
    #[must_use]
    pub fn is_conflicting(&self) -> bool {
        let (h1, h2) = (&self.header_1, &self.header_2);
        if h1.height == h2.height {
            return h1.root != h2.root || h1.timestamp != h2.timestamp;
        }

        let (lower, higher) = if h1.height < h2.height {
            (h1, h2)
        } else {
            (h2, h1)
        };
        higher.timestamp <= lower.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(height: u64, timestamp: u64, root: u8) -> Header {
        Header {
            height: Height::new(0, height),
            trusted_height: Height::new(0, 1),
            timestamp,
            root: [root; 32],
        }
    }

    #[test]
    fn test_conflicting_headers() {
        let fork = Misbehaviour {
            header_1: header(5, 100, 1),
            header_2: header(5, 100, 2),
        };
        assert!(fork.is_conflicting());

        let time_violation = Misbehaviour {
            header_1: header(5, 100, 1),
            header_2: header(6, 100, 1),
        };
        assert!(time_violation.is_conflicting());

        let consistent = Misbehaviour {
            header_1: header(6, 200, 2),
            header_2: header(5, 100, 1),
        };
        assert!(!consistent.is_conflicting());
    }

    #[test]
    fn test_consensus_state_json() {
        let consensus_state = ConsensusState {
            timestamp: 42,
            root: [0xAB; 32],
        };
        let json = serde_json::to_value(&consensus_state).unwrap();
        assert_eq!(json["timestamp"], "42");
        assert_eq!(json["root"], "ab".repeat(32));

        let decoded: ConsensusState = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, consensus_state);
    }
}
