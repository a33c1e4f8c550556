//! Header verification against a trusted consensus state.

use light_client_utils::ensure;

use crate::{
    client_state::ClientState,
    consensus_state::ConsensusState,
    error::{CommitError, TendermintClientError, ValidatorSetError},
    header::Header,
    signature::SignatureVerifier,
    trust_threshold::TrustThreshold,
};

/// Verifies `header` against the trusted consensus state at `header.trusted_height`.
///
/// The checks run in order: frozen client, chain id, height, time, trusting period, validator
/// set continuity and commit.
/// # Errors
/// Returns the error of the first failing check.
pub fn verify_header<V: SignatureVerifier>(
    client_state: &ClientState,
    trusted_consensus_state: &ConsensusState,
    header: &Header,
    now: u64,
    verifier: &V,
) -> Result<(), TendermintClientError> {
    ensure!(
        !client_state.is_frozen(),
        TendermintClientError::ClientFrozen {
            frozen_height: client_state.frozen_height,
        }
    );
    check_chain_id(&client_state.chain_id, header)?;
    check_height(header)?;
    check_time(client_state, trusted_consensus_state, header, now)?;
    check_trusting_period(client_state, trusted_consensus_state.timestamp, now)?;
    verify_validator_sets(client_state, trusted_consensus_state, header, verifier)?;
    verify_commit(header, verifier)?;

    tracing::debug!(
        height = %header.height(),
        trusted_height = %header.trusted_height,
        "header verified"
    );
    Ok(())
}

pub(crate) fn check_chain_id(expected: &str, header: &Header) -> Result<(), TendermintClientError> {
    ensure!(
        header.chain_id() == expected,
        TendermintClientError::InvalidChainId {
            expected: expected.to_string(),
            found: header.chain_id().to_string(),
        }
    );
    Ok(())
}

/// The header must be above the trusted height within the same revision.
pub(crate) fn check_height(header: &Header) -> Result<(), TendermintClientError> {
    let header_height = header.height();
    let trusted_height = header.trusted_height;
    ensure!(
        header_height.revision_number == trusted_height.revision_number
            && header_height.revision_height > trusted_height.revision_height,
        TendermintClientError::InvalidHeaderHeight {
            header_height,
            trusted_height,
        }
    );
    Ok(())
}

/// The header must be newer than the trusted state and not from the future.
pub(crate) fn check_time(
    client_state: &ClientState,
    trusted_consensus_state: &ConsensusState,
    header: &Header,
    now: u64,
) -> Result<(), TendermintClientError> {
    let max_time = now.saturating_add(client_state.max_clock_drift_nanos());
    ensure!(
        header.time() > trusted_consensus_state.timestamp && header.time() < max_time,
        TendermintClientError::InvalidHeaderTime {
            header_time: header.time(),
            trusted_time: trusted_consensus_state.timestamp,
            max_time,
        }
    );
    Ok(())
}

pub(crate) fn check_trusting_period(
    client_state: &ClientState,
    trusted_time: u64,
    now: u64,
) -> Result<(), TendermintClientError> {
    ensure!(
        !client_state.is_expired(trusted_time, now),
        TendermintClientError::TrustingPeriodExpired {
            trusted_time,
            now,
            trusting_period_seconds: client_state.trusting_period_seconds,
        }
    );
    Ok(())
}

/// Checks that the header's validator sets are the ones its block commits to, and that they
/// follow from the trusted validator set.
pub(crate) fn verify_validator_sets<V: SignatureVerifier>(
    client_state: &ClientState,
    trusted_consensus_state: &ConsensusState,
    header: &Header,
    verifier: &V,
) -> Result<(), TendermintClientError> {
    let block = &header.signed_header.header;

    header.validator_set.validate()?;
    header.next_validator_set.validate()?;
    header.trusted_validator_set.validate()?;

    check_hash("header", block.validators_hash, header.validator_set.hash())?;
    check_hash(
        "next",
        block.next_validators_hash,
        header.next_validator_set.hash(),
    )?;
    check_hash(
        "trusted",
        trusted_consensus_state.next_validators_hash,
        header.trusted_validator_set.hash(),
    )?;

    if header.height() == header.trusted_height.increment() {
        tracing::debug!("adjacent update, checking validator set continuity");
        check_hash(
            "adjacent",
            trusted_consensus_state.next_validators_hash,
            block.validators_hash,
        )?;
    } else {
        tracing::debug!("non-adjacent update, checking trusted voting power");
        verify_trusted_power(&client_state.trust_level, header, verifier)?;
    }

    Ok(())
}

/// The trusted validators that signed the commit must hold at least `trust_level` of the
/// trusted voting power.
fn verify_trusted_power<V: SignatureVerifier>(
    trust_level: &TrustThreshold,
    header: &Header,
    verifier: &V,
) -> Result<(), TendermintClientError> {
    let commit = &header.signed_header.commit;
    let signed = commit.signed_voting_power(
        header.chain_id(),
        &header.trusted_validator_set,
        verifier,
    )?;
    let total = header.trusted_validator_set.total_voting_power();

    ensure!(
        trust_level.is_reached_by(signed, total),
        ValidatorSetError::InsufficientTrustedPower {
            signed,
            total,
            trust_level: trust_level.to_string(),
        }
        .into()
    );
    Ok(())
}

/// The commit must sign this header and carry more than two thirds of the header's validator
/// set voting power.
pub(crate) fn verify_commit<V: SignatureVerifier>(
    header: &Header,
    verifier: &V,
) -> Result<(), TendermintClientError> {
    let commit = &header.signed_header.commit;
    let block = &header.signed_header.header;

    ensure!(
        commit.height == block.height,
        CommitError::HeightMismatch {
            header_height: block.height,
            commit_height: commit.height,
        }
        .into()
    );
    let block_id = block.hash();
    ensure!(
        commit.block_id == block_id,
        CommitError::BlockIdMismatch {
            expected: hex::encode(block_id),
            found: hex::encode(commit.block_id),
        }
        .into()
    );

    let signed = commit.signed_voting_power(header.chain_id(), &header.validator_set, verifier)?;
    let total = header.validator_set.total_voting_power();
    ensure!(
        TrustThreshold::TWO_THIRDS.is_exceeded_by(signed, total),
        CommitError::InsufficientVotingPower { signed, total }.into()
    );

    Ok(())
}

fn check_hash(
    set: &'static str,
    expected: [u8; 32],
    found: [u8; 32],
) -> Result<(), ValidatorSetError> {
    ensure!(
        expected == found,
        ValidatorSetError::HashMismatch {
            set,
            expected: hex::encode(expected),
            found: hex::encode(found),
        }
    );
    Ok(())
}
