//! This module defines [`TendermintClientError`] and the validator set and commit errors it
//! wraps.

use light_client_interface::Height;

/// Error types for the Tendermint light client
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum TendermintClientError {
    /// The client is frozen
    #[error("client is frozen at height {frozen_height}")]
    ClientFrozen {
        /// Height at which the client was frozen
        frozen_height: Height,
    },

    /// Chain id of the header does not match the client
    #[error("invalid chain id, expected {expected} but found {found}")]
    InvalidChainId {
        /// Expected chain id
        expected: String,
        /// Found chain id
        found: String,
    },

    /// Header height is not above the trusted height within the same revision
    #[error("invalid header height {header_height}, must be greater than trusted height {trusted_height} in the same revision")]
    InvalidHeaderHeight {
        /// Height of the header
        header_height: Height,
        /// Trusted height the header is verified against
        trusted_height: Height,
    },

    /// Header time is not after the trusted time or is too far in the future
    #[error("invalid header time {header_time}, must be after trusted time {trusted_time} and before {max_time}")]
    InvalidHeaderTime {
        /// Header time in nanoseconds
        header_time: u64,
        /// Trusted consensus timestamp in nanoseconds
        trusted_time: u64,
        /// Current time plus the maximum clock drift in nanoseconds
        max_time: u64,
    },

    /// The trusted consensus state is older than the trusting period
    #[error("trusting period expired, trusted time {trusted_time} is older than {trusting_period_seconds}s at {now}")]
    TrustingPeriodExpired {
        /// Trusted consensus timestamp in nanoseconds
        trusted_time: u64,
        /// Current time in nanoseconds
        now: u64,
        /// Trusting period in seconds
        trusting_period_seconds: u64,
    },

    /// Validator set verification failed
    #[error("invalid validator set: {0}")]
    InvalidValidatorSet(#[from] ValidatorSetError),

    /// Commit verification failed
    #[error("invalid commit: {0}")]
    InvalidCommit(#[from] CommitError),

    /// One of the headers of the misbehaviour is not valid
    #[error("invalid misbehaviour: {0}")]
    InvalidMisbehaviour(Box<TendermintClientError>), // boxed to break the recursion

    /// The two headers of the misbehaviour do not conflict
    #[error("headers do not constitute misbehaviour")]
    NoMisbehaviour,

    /// Trust level outside of [1/3, 1]
    #[error("invalid trust threshold {numerator}/{denominator}, must be within [1/3, 1]")]
    InvalidTrustThreshold {
        /// Numerator
        numerator: u64,
        /// Denominator
        denominator: u64,
    },

    /// Trusting period must be shorter than the unbonding period
    #[error("trusting period ({trusting_period_seconds}s) must be smaller than unbonding period ({unbonding_period_seconds}s)")]
    TrustingPeriodNotBelowUnbonding {
        /// Trusting period in seconds
        trusting_period_seconds: u64,
        /// Unbonding period in seconds
        unbonding_period_seconds: u64,
    },

    /// Client state failed validation
    #[error("invalid client state: {0}")]
    InvalidClientState(String),

    /// Consensus state failed validation
    #[error("invalid consensus state: {0}")]
    InvalidConsensusState(String),

    /// Unable to decode the merkle proof
    #[error("unable to decode merkle proof: {0}")]
    MerkleProofDecode(String),

    /// Number of proofs, proof specs and path elements differ
    #[error("invalid merkle path length, expected {expected} but found {found}")]
    InvalidPathLength {
        /// Expected length
        expected: usize,
        /// Found length
        found: usize,
    },

    /// Membership proof did not verify
    #[error("membership verification failed")]
    MembershipVerificationFailed,

    /// Non-membership proof did not verify
    #[error("non-membership verification failed")]
    NonMembershipVerificationFailed,

    /// A commitment proof is malformed
    #[error("invalid commitment proof: {0}")]
    InvalidCommitmentProof(String),

    /// The client state has no upgrade path
    #[error("client state has an empty upgrade path")]
    EmptyUpgradePath,

    /// The upgraded client must be at a later height
    #[error("upgraded height {upgraded_height} must be greater than current height {current_height}")]
    UpgradeHeightNotIncreasing {
        /// Latest height of the current client
        current_height: Height,
        /// Latest height of the upgraded client
        upgraded_height: Height,
    },

    /// Verifying the committed upgrade failed
    #[error("invalid upgrade proof for {kind}: {source}")]
    InvalidUpgradeProof {
        /// Which committed state failed to verify
        kind: &'static str,
        /// The underlying proof error
        source: Box<TendermintClientError>,
    },
}

/// Error types for validator set verification
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidatorSetError {
    /// The validator set is empty
    #[error("validator set is empty")]
    Empty,

    /// A validator appears twice
    #[error("duplicate validator {address}")]
    DuplicateValidator {
        /// Hex encoded address
        address: String,
    },

    /// A validator has no voting power
    #[error("validator {address} has zero voting power")]
    ZeroVotingPower {
        /// Hex encoded address
        address: String,
    },

    /// The total voting power exceeds the maximum
    #[error("total voting power {total} exceeds maximum {max}")]
    TotalVotingPowerTooLarge {
        /// Total voting power
        total: u128,
        /// Maximum total voting power
        max: u64,
    },

    /// The validator set does not hash to the expected value
    #[error("{set} validator set hash mismatch, expected {expected} but found {found}")]
    HashMismatch {
        /// Which validator set was checked
        set: &'static str,
        /// Expected hash in hex
        expected: String,
        /// Found hash in hex
        found: String,
    },

    /// The trusted validators that signed do not reach the trust level
    #[error("insufficient trusted voting power {signed} of {total}, trust level is {trust_level}")]
    InsufficientTrustedPower {
        /// Power of trusted validators that signed
        signed: u64,
        /// Total power of the trusted validator set
        total: u64,
        /// Trust level as `numerator/denominator`
        trust_level: String,
    },
}

/// Error types for commit verification
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    /// Commit is for another height
    #[error("commit height {commit_height} does not match header height {header_height}")]
    HeightMismatch {
        /// Height of the header
        header_height: u64,
        /// Height of the commit
        commit_height: u64,
    },

    /// Commit is for another block
    #[error("commit block id {found} does not match header hash {expected}")]
    BlockIdMismatch {
        /// Header hash in hex
        expected: String,
        /// Commit block id in hex
        found: String,
    },

    /// A validator signed twice
    #[error("duplicate signature from validator {address}")]
    DuplicateSignature {
        /// Hex encoded address
        address: String,
    },

    /// A signature does not verify
    #[error("invalid signature from validator {address}")]
    InvalidSignature {
        /// Hex encoded address
        address: String,
    },

    /// The signers do not hold more than two thirds of the voting power
    #[error("insufficient voting power {signed} of {total}, need more than 2/3")]
    InsufficientVotingPower {
        /// Power that signed
        signed: u64,
        /// Total power of the validator set
        total: u64,
    },
}
