//! This module defines the [`LightClient`] capability interface.
//!
//! A light client type is a set of stateless algorithms over its own client state, consensus
//! state, header and misbehaviour types. The host owns persistence and routes each call to the
//! client type recorded with the client state.

use crate::{Height, Status};

/// The result of a successful header verification or client upgrade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateOutput<C, S> {
    /// The height at which `consensus_state` must be stored
    pub height: Height,
    /// The client state to store, with its latest height advanced where applicable
    pub client_state: C,
    /// The new consensus state
    pub consensus_state: S,
}

/// The capability interface implemented by every light client type.
///
/// All methods are pure: they never read or write storage, and time is passed in by the caller
/// as nanoseconds since the unix epoch.
pub trait LightClient {
    /// The client state of this client type
    type ClientState: Clone;
    /// The consensus state of this client type
    type ConsensusState: Clone + PartialEq;
    /// The header used to update the client
    type Header;
    /// The misbehaviour evidence used to freeze the client
    type Misbehaviour;
    /// The error returned by the client's algorithms
    type Error: std::error::Error + Send + Sync + 'static;

    /// The client type tag stored alongside the client state, e.g. `07-tendermint`.
    const CLIENT_TYPE: &'static str;

    /// Returns the latest height tracked by the client.
    fn latest_height(&self, client_state: &Self::ClientState) -> Height;

    /// Returns the consensus timestamp in nanoseconds.
    fn consensus_timestamp(&self, consensus_state: &Self::ConsensusState) -> u64;

    /// Returns the height of the consensus state the header is verified against.
    fn trusted_height(&self, header: &Self::Header) -> Height;

    /// Returns the trusted heights of the two headers of the misbehaviour.
    fn misbehaviour_trusted_heights(&self, misbehaviour: &Self::Misbehaviour) -> (Height, Height);

    /// Validates the initial client and consensus state. The anchor itself is trusted.
    /// # Errors
    /// Returns an error if either state is malformed.
    fn initialize(
        &self,
        client_state: &Self::ClientState,
        consensus_state: &Self::ConsensusState,
    ) -> Result<(), Self::Error>;

    /// Verifies a header against a trusted consensus state and returns the resulting states.
    /// # Errors
    /// Returns an error if the header is not valid.
    fn verify_header(
        &self,
        client_state: &Self::ClientState,
        trusted_consensus_state: &Self::ConsensusState,
        header: &Self::Header,
        now: u64,
    ) -> Result<UpdateOutput<Self::ClientState, Self::ConsensusState>, Self::Error>;

    /// Verifies misbehaviour evidence and returns the height at which to freeze the client.
    /// # Errors
    /// Returns an error if the evidence is invalid or shows no misbehaviour.
    fn check_misbehaviour(
        &self,
        client_state: &Self::ClientState,
        trusted_consensus_state_1: &Self::ConsensusState,
        trusted_consensus_state_2: &Self::ConsensusState,
        misbehaviour: &Self::Misbehaviour,
        now: u64,
    ) -> Result<Height, Self::Error>;

    /// Returns the client state frozen at `height`. An already frozen client keeps its height.
    fn freeze(&self, client_state: &Self::ClientState, height: Height) -> Self::ClientState;

    /// Computes the status from the client state and its latest consensus state, if any.
    fn status(
        &self,
        client_state: &Self::ClientState,
        latest_consensus_state: Option<&Self::ConsensusState>,
        now: u64,
    ) -> Status;

    /// Returns true if a consensus state with `consensus_timestamp` is outside the trusting
    /// period at `now`.
    fn is_expired(&self, client_state: &Self::ClientState, consensus_timestamp: u64, now: u64)
        -> bool;

    /// Verifies that `value` is stored at `path` under the consensus state's root.
    /// # Errors
    /// Returns an error if the proof does not verify.
    fn verify_membership(
        &self,
        client_state: &Self::ClientState,
        consensus_state: &Self::ConsensusState,
        proof: &[u8],
        path: &[Vec<u8>],
        value: &[u8],
    ) -> Result<(), Self::Error>;

    /// Verifies that nothing is stored at `path` under the consensus state's root.
    /// # Errors
    /// Returns an error if the proof does not verify.
    fn verify_non_membership(
        &self,
        client_state: &Self::ClientState,
        consensus_state: &Self::ConsensusState,
        proof: &[u8],
        path: &[Vec<u8>],
    ) -> Result<(), Self::Error>;

    /// Verifies an upgraded client and consensus state committed by the remote chain and
    /// returns the states the client continues from.
    /// # Errors
    /// Returns an error if the upgrade is not valid or not supported by the client type.
    fn verify_upgrade(
        &self,
        client_state: &Self::ClientState,
        consensus_state: &Self::ConsensusState,
        upgraded_client_state: &Self::ClientState,
        upgraded_consensus_state: &Self::ConsensusState,
        proof_upgrade_client: &[u8],
        proof_upgrade_consensus_state: &[u8],
    ) -> Result<UpdateOutput<Self::ClientState, Self::ConsensusState>, Self::Error>;
}
