//! Client storage.

use std::collections::BTreeMap;

use light_client_interface::Height;

use crate::any::{AnyClientState, AnyConsensusState};

/// An error of the storage backend, passed through the host unchanged
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum StoreError {
    /// The backend failed to read or write
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Stored consensus states of one client, in ascending height order
pub type ConsensusStates<'a> = Box<dyn Iterator<Item = (Height, AnyConsensusState)> + 'a>;

/// Storage of client and consensus states, keyed by client id
#[allow(clippy::module_name_repetitions)]
pub trait ClientStore {
    /// Returns the client state of `client_id`, if any.
    /// # Errors
    /// Returns an error if the backend fails.
    fn client_state(&self, client_id: &str) -> Result<Option<AnyClientState>, StoreError>;

    /// Stores the client state of `client_id`.
    /// # Errors
    /// Returns an error if the backend fails.
    fn set_client_state(
        &mut self,
        client_id: &str,
        client_state: AnyClientState,
    ) -> Result<(), StoreError>;

    /// Returns the consensus state of `client_id` at `height`, if any.
    /// # Errors
    /// Returns an error if the backend fails.
    fn consensus_state(
        &self,
        client_id: &str,
        height: Height,
    ) -> Result<Option<AnyConsensusState>, StoreError>;

    /// Stores the consensus state of `client_id` at `height`.
    /// # Errors
    /// Returns an error if the backend fails.
    fn set_consensus_state(
        &mut self,
        client_id: &str,
        height: Height,
        consensus_state: AnyConsensusState,
    ) -> Result<(), StoreError>;

    /// Deletes the consensus state of `client_id` at `height`.
    /// # Errors
    /// Returns an error if the backend fails.
    fn delete_consensus_state(&mut self, client_id: &str, height: Height) -> Result<(), StoreError>;

    /// Iterates the consensus states of `client_id` from the lowest height. Every call starts
    /// a new iteration.
    /// # Errors
    /// Returns an error if the backend fails.
    fn consensus_states(&self, client_id: &str) -> Result<ConsensusStates<'_>, StoreError>;

    /// The host time in nanoseconds since the unix epoch.
    /// # Errors
    /// Returns an error if the backend fails.
    fn host_timestamp(&self) -> Result<u64, StoreError>;
}

/// An in-memory [`ClientStore`] with a settable host time
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    client_states: BTreeMap<String, AnyClientState>,
    consensus_states: BTreeMap<(String, Height), AnyConsensusState>,
    timestamp: u64,
}

impl MemoryStore {
    /// Creates an empty store whose host time is `timestamp`.
    #[must_use]
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    /// Sets the host time.
    pub const fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }
}

impl ClientStore for MemoryStore {
    fn client_state(&self, client_id: &str) -> Result<Option<AnyClientState>, StoreError> {
        Ok(self.client_states.get(client_id).cloned())
    }

    fn set_client_state(
        &mut self,
        client_id: &str,
        client_state: AnyClientState,
    ) -> Result<(), StoreError> {
        self.client_states
            .insert(client_id.to_string(), client_state);
        Ok(())
    }

    fn consensus_state(
        &self,
        client_id: &str,
        height: Height,
    ) -> Result<Option<AnyConsensusState>, StoreError> {
        Ok(self
            .consensus_states
            .get(&(client_id.to_string(), height))
            .cloned())
    }

    fn set_consensus_state(
        &mut self,
        client_id: &str,
        height: Height,
        consensus_state: AnyConsensusState,
    ) -> Result<(), StoreError> {
        self.consensus_states
            .insert((client_id.to_string(), height), consensus_state);
        Ok(())
    }

    fn delete_consensus_state(&mut self, client_id: &str, height: Height) -> Result<(), StoreError> {
        self.consensus_states
            .remove(&(client_id.to_string(), height));
        Ok(())
    }

    fn consensus_states(&self, client_id: &str) -> Result<ConsensusStates<'_>, StoreError> {
        let client_id = client_id.to_string();
        Ok(Box::new(
            self.consensus_states
                .range((client_id.clone(), Height::zero())..)
                .take_while(move |((id, _), _)| *id == client_id)
                .map(|((_, height), consensus_state)| (*height, consensus_state.clone())),
        ))
    }

    fn host_timestamp(&self) -> Result<u64, StoreError> {
        Ok(self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consensus_state(timestamp: u64) -> AnyConsensusState {
        mock_light_client::ConsensusState {
            timestamp,
            root: [0; 32],
        }
        .into()
    }

    #[test]
    fn test_consensus_states_are_scoped_and_ordered() {
        let mut store = MemoryStore::new(0);
        store
            .set_consensus_state("mock-1", Height::new(1, 2), consensus_state(3))
            .unwrap();
        store
            .set_consensus_state("mock-0", Height::new(0, 7), consensus_state(2))
            .unwrap();
        store
            .set_consensus_state("mock-0", Height::new(0, 3), consensus_state(1))
            .unwrap();
        store
            .set_consensus_state("mock-00", Height::new(0, 1), consensus_state(4))
            .unwrap();

        let heights: Vec<Height> = store
            .consensus_states("mock-0")
            .unwrap()
            .map(|(height, _)| height)
            .collect();
        assert_eq!(heights, vec![Height::new(0, 3), Height::new(0, 7)]);

        store
            .delete_consensus_state("mock-0", Height::new(0, 3))
            .unwrap();
        assert_eq!(store.consensus_states("mock-0").unwrap().count(), 1);
        assert_eq!(
            store.consensus_state("mock-0", Height::new(0, 3)).unwrap(),
            None
        );
    }
}
