//! Integration tests for header verification

mod helpers;

use helpers::*;
use ics07_tendermint_light_client::{
    error::{CommitError, TendermintClientError, ValidatorSetError},
    test_utils::{
        fixtures::{after_trusted, CHAIN_ID, MAX_CLOCK_DRIFT_SECONDS, TRUSTED_TIME},
        HeaderBuilder, TestValidators,
    },
};
use light_client_interface::Height;
use rstest::rstest;

#[test]
fn test_adjacent_update() {
    let ctx = setup_test_context();
    let header = ctx.header(11, 1).build();

    let output = ctx.verify(&header).expect("header should verify");

    assert_eq!(output.height, Height::new(1, 11));
    assert_eq!(output.client_state.latest_height, Height::new(1, 11));
    assert_eq!(output.consensus_state.timestamp, after_trusted(1));
    assert_eq!(output.consensus_state.root, header.signed_header.header.app_hash);
    assert_eq!(
        output.consensus_state.next_validators_hash,
        header.next_validator_set.hash()
    );
}

#[test]
fn test_latest_height_never_decreases() {
    let mut ctx = setup_test_context();
    ctx.client_state.latest_height = Height::new(1, 20);
    let header = ctx.header(11, 1).build();

    let output = ctx.verify(&header).unwrap();

    assert_eq!(output.height, Height::new(1, 11));
    assert_eq!(output.client_state.latest_height, Height::new(1, 20));
}

#[test]
fn test_non_adjacent_update() {
    let ctx = setup_test_context();
    let header = ctx.header(15, 5).build();

    let output = ctx.verify(&header).unwrap();
    assert_eq!(output.height, Height::new(1, 15));
}

#[test]
fn test_non_adjacent_update_with_validator_set_change() {
    let ctx = setup_test_context();
    let new_validators = ctx
        .validators
        .concat(&TestValidators::with_seed(7, &[20, 20, 20]));
    let header = HeaderBuilder::new(CHAIN_ID, 15, after_trusted(5), &new_validators)
        .trusted(TRUSTED_HEIGHT, &ctx.validators)
        .next_validators(&TestValidators::with_seed(7, &[20, 20, 20]))
        .build();

    assert!(ctx.verify(&header).is_ok());
}

/// Header signed by one of three equal trusted validators plus new validators holding enough
/// power for the commit itself.
#[rstest]
#[case::exactly_one_third(&[10, 10, 10], true)]
#[case::below_one_third(&[10, 10, 11], false)]
fn test_trust_level_boundary(#[case] trusted_powers: &[u64], #[case] accepted: bool) {
    let ctx = setup_test_context_with_powers(trusted_powers);
    let header_validators = ctx
        .validators
        .concat(&TestValidators::with_seed(7, &[20, 20, 20]));
    let header = HeaderBuilder::new(CHAIN_ID, 15, after_trusted(5), &header_validators)
        .trusted(TRUSTED_HEIGHT, &ctx.validators)
        .signers(&[0, 3, 4, 5])
        .build();

    let result = ctx.verify(&header);
    if accepted {
        assert!(result.is_ok(), "{result:?}");
    } else {
        assert!(matches!(
            result,
            Err(TendermintClientError::InvalidValidatorSet(
                ValidatorSetError::InsufficientTrustedPower { signed: 10, total: 31, .. }
            ))
        ));
    }
}

#[test]
fn test_frozen_client() {
    let mut ctx = setup_test_context();
    ctx.client_state.frozen_height = Height::new(1, 5);
    let header = ctx.header(11, 1).build();

    assert_eq!(
        ctx.verify(&header),
        Err(TendermintClientError::ClientFrozen {
            frozen_height: Height::new(1, 5)
        })
    );
}

#[test]
fn test_wrong_chain_id() {
    let ctx = setup_test_context();
    let header = HeaderBuilder::new("otherchain-1", 11, after_trusted(1), &ctx.validators)
        .trusted(TRUSTED_HEIGHT, &ctx.validators)
        .build();

    assert!(matches!(
        ctx.verify(&header),
        Err(TendermintClientError::InvalidChainId { .. })
    ));
}

#[rstest]
#[case::same_height(10)]
#[case::lower_height(9)]
fn test_header_not_above_trusted_height(#[case] height: u64) {
    let ctx = setup_test_context();
    let header = ctx.header(height, 1).build();

    assert!(matches!(
        ctx.verify(&header),
        Err(TendermintClientError::InvalidHeaderHeight { .. })
    ));
}

#[test]
fn test_revision_bump_is_rejected() {
    let ctx = setup_test_context();
    let header = HeaderBuilder::new("testchain-2", 1, after_trusted(1), &ctx.validators)
        .trusted(TRUSTED_HEIGHT, &ctx.validators)
        .build();
    let mut ctx = ctx;
    ctx.client_state.chain_id = "testchain-2".to_string();

    assert!(matches!(
        ctx.verify(&header),
        Err(TendermintClientError::InvalidHeaderHeight { .. })
    ));
}

#[rstest]
#[case::equal_to_trusted_time(TRUSTED_TIME)]
#[case::before_trusted_time(TRUSTED_TIME - 1)]
#[case::at_max_clock_drift(after_trusted(60 + MAX_CLOCK_DRIFT_SECONDS))]
fn test_invalid_header_time(#[case] time: u64) {
    let ctx = setup_test_context();
    let header = HeaderBuilder::new(CHAIN_ID, 11, time, &ctx.validators)
        .trusted(TRUSTED_HEIGHT, &ctx.validators)
        .build();

    assert!(matches!(
        ctx.verify(&header),
        Err(TendermintClientError::InvalidHeaderTime { .. })
    ));
}

#[test]
fn test_header_within_clock_drift() {
    let ctx = setup_test_context();
    let header = ctx.header(11, 60 + MAX_CLOCK_DRIFT_SECONDS - 1).build();

    assert!(ctx.verify(&header).is_ok());
}

#[test]
fn test_trusting_period_expired() {
    let mut ctx = setup_test_context();
    ctx.now = TRUSTED_TIME + ctx.client_state.trusting_period_nanos();
    let header = ctx.header(11, 1).build();

    assert!(matches!(
        ctx.verify(&header),
        Err(TendermintClientError::TrustingPeriodExpired { .. })
    ));
}

#[test]
fn test_adjacent_update_with_unexpected_validators() {
    let ctx = setup_test_context();
    let other_validators = TestValidators::with_seed(9, &[10, 10, 10]);
    let header = HeaderBuilder::new(CHAIN_ID, 11, after_trusted(1), &other_validators)
        .trusted(TRUSTED_HEIGHT, &ctx.validators)
        .build();

    assert!(matches!(
        ctx.verify(&header),
        Err(TendermintClientError::InvalidValidatorSet(
            ValidatorSetError::HashMismatch { set: "adjacent", .. }
        ))
    ));
}

#[test]
fn test_trusted_validators_do_not_match_consensus_state() {
    let ctx = setup_test_context();
    let other_validators = TestValidators::with_seed(9, &[10, 10, 10]);
    let header = ctx.header(15, 1).trusted(TRUSTED_HEIGHT, &other_validators).build();

    assert!(matches!(
        ctx.verify(&header),
        Err(TendermintClientError::InvalidValidatorSet(
            ValidatorSetError::HashMismatch { set: "trusted", .. }
        ))
    ));
}

#[test]
fn test_validator_set_not_committed_by_header() {
    let ctx = setup_test_context();
    let mut header = ctx.header(11, 1).build();
    header.validator_set = TestValidators::with_seed(9, &[10, 10, 10]).validator_set();

    assert!(matches!(
        ctx.verify(&header),
        Err(TendermintClientError::InvalidValidatorSet(
            ValidatorSetError::HashMismatch { set: "header", .. }
        ))
    ));
}

#[test]
fn test_empty_validator_set() {
    let ctx = setup_test_context();
    let mut header = ctx.header(11, 1).build();
    header.next_validator_set.validators.clear();

    assert_eq!(
        ctx.verify(&header),
        Err(TendermintClientError::InvalidValidatorSet(
            ValidatorSetError::Empty
        ))
    );
}

#[test]
fn test_two_of_three_equal_validators_is_not_enough() {
    let ctx = setup_test_context();
    let header = ctx.header(11, 1).signers(&[0, 1]).build();

    assert_eq!(
        ctx.verify(&header),
        Err(TendermintClientError::InvalidCommit(
            CommitError::InsufficientVotingPower {
                signed: 20,
                total: 30
            }
        ))
    );
}

#[test]
fn test_two_thirds_is_not_enough() {
    let ctx = setup_test_context_with_powers(&[10, 10, 10, 30]);
    let header = ctx.header(11, 1).signers(&[0, 3]).build();

    assert_eq!(
        ctx.verify(&header),
        Err(TendermintClientError::InvalidCommit(
            CommitError::InsufficientVotingPower {
                signed: 40,
                total: 60
            }
        ))
    );
}

#[test]
fn test_commit_for_other_block() {
    let ctx = setup_test_context();
    let mut header = ctx.header(11, 1).build();
    header.signed_header.commit.block_id = [1; 32];

    assert!(matches!(
        ctx.verify(&header),
        Err(TendermintClientError::InvalidCommit(
            CommitError::BlockIdMismatch { .. }
        ))
    ));
}

#[test]
fn test_commit_for_other_height() {
    let ctx = setup_test_context();
    let mut header = ctx.header(11, 1).build();
    header.signed_header.commit.height = 12;

    assert_eq!(
        ctx.verify(&header),
        Err(TendermintClientError::InvalidCommit(
            CommitError::HeightMismatch {
                header_height: 11,
                commit_height: 12
            }
        ))
    );
}

#[test]
fn test_tampered_signature() {
    let ctx = setup_test_context();
    let mut header = ctx.header(11, 1).build();
    header.signed_header.commit.signatures[1].signature[0] ^= 0xFF;

    assert!(matches!(
        ctx.verify(&header),
        Err(TendermintClientError::InvalidCommit(
            CommitError::InvalidSignature { .. }
        ))
    ));
}
