//! Misbehaviour detection for forks and time violations.

use std::cmp::Ordering;

use light_client_interface::Height;
use light_client_utils::ensure;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    chain_id,
    client_state::ClientState,
    consensus_state::ConsensusState,
    error::TendermintClientError,
    header::Header,
    signature::SignatureVerifier,
    verify::{
        check_chain_id, check_time, check_trusting_period, verify_commit, verify_validator_sets,
    },
};

/// Two conflicting headers signed by the remote chain's validators
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
pub struct Misbehaviour {
    /// The first header
    pub header_1: Header,
    /// The second header
    pub header_2: Header,
}

impl Misbehaviour {
    /// Returns true if the headers form a fork or a time violation.
    ///
    /// A fork is two different blocks at the same height. A time violation is a higher block
    /// whose time is not after the lower block's time. The check is symmetric in the headers.
    #[must_use]
    pub fn is_conflicting(&self) -> bool {
        let (header_1, header_2) = (&self.header_1, &self.header_2);
        match header_1.height().cmp(&header_2.height()) {
            Ordering::Equal => header_1.hash() != header_2.hash(),
            Ordering::Greater => header_1.time() <= header_2.time(),
            Ordering::Less => header_2.time() <= header_1.time(),
        }
    }
}

/// Verifies the misbehaviour and returns the height to freeze the client at.
///
/// Each header is verified against its own trusted consensus state. The trusting period is
/// checked against the older of the two trusted states.
/// # Errors
/// Returns [`TendermintClientError::InvalidMisbehaviour`] if a header is not valid,
/// [`TendermintClientError::NoMisbehaviour`] if the headers do not conflict, and the trusting
/// period or frozen client error otherwise.
pub fn verify_misbehaviour<V: SignatureVerifier>(
    client_state: &ClientState,
    trusted_consensus_state_1: &ConsensusState,
    trusted_consensus_state_2: &ConsensusState,
    misbehaviour: &Misbehaviour,
    now: u64,
    verifier: &V,
) -> Result<Height, TendermintClientError> {
    ensure!(
        !client_state.is_frozen(),
        TendermintClientError::ClientFrozen {
            frozen_height: client_state.frozen_height,
        }
    );

    for (header, trusted_consensus_state) in [
        (&misbehaviour.header_1, trusted_consensus_state_1),
        (&misbehaviour.header_2, trusted_consensus_state_2),
    ] {
        verify_misbehaviour_header(client_state, trusted_consensus_state, header, now, verifier)
            .map_err(|e| TendermintClientError::InvalidMisbehaviour(Box::new(e)))?;
    }

    let earliest_trusted_time = trusted_consensus_state_1
        .timestamp
        .min(trusted_consensus_state_2.timestamp);
    check_trusting_period(client_state, earliest_trusted_time, now)?;

    ensure!(
        misbehaviour.is_conflicting(),
        TendermintClientError::NoMisbehaviour
    );

    let freeze_height = misbehaviour
        .header_1
        .height()
        .min(misbehaviour.header_2.height());
    tracing::debug!(%freeze_height, "misbehaviour verified");
    Ok(freeze_height)
}

/// Evidence may come from a later revision than the client's, so the expected chain id takes
/// the header's revision and the header only needs to be above its trusted height.
fn verify_misbehaviour_header<V: SignatureVerifier>(
    client_state: &ClientState,
    trusted_consensus_state: &ConsensusState,
    header: &Header,
    now: u64,
    verifier: &V,
) -> Result<(), TendermintClientError> {
    let expected_chain_id =
        chain_id::with_revision(&client_state.chain_id, header.height().revision_number);
    check_chain_id(&expected_chain_id, header)?;
    ensure!(
        header.height() > header.trusted_height,
        TendermintClientError::InvalidHeaderHeight {
            header_height: header.height(),
            trusted_height: header.trusted_height,
        }
    );
    check_time(client_state, trusted_consensus_state, header, now)?;
    verify_validator_sets(client_state, trusted_consensus_state, header, verifier)?;
    verify_commit(header, verifier)
}
