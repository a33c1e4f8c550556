//! Integration tests for misbehaviour detection

mod helpers;

use helpers::*;
use ics07_tendermint_light_client::{
    error::{CommitError, TendermintClientError, ValidatorSetError},
    test_utils::{
        fixtures::{self, after_trusted, CHAIN_ID, TRUSTED_TIME},
        HeaderBuilder, TestValidators,
    },
    ConsensusState, Header, Misbehaviour,
};
use light_client_interface::{Height, LightClient};

fn check(
    ctx: &TestContext,
    header_1: &Header,
    trusted_1: &ConsensusState,
    header_2: &Header,
    trusted_2: &ConsensusState,
) -> Result<Height, TendermintClientError> {
    let forward = ctx.client.check_misbehaviour(
        &ctx.client_state,
        trusted_1,
        trusted_2,
        &Misbehaviour {
            header_1: header_1.clone(),
            header_2: header_2.clone(),
        },
        ctx.now,
    );
    let backward = ctx.client.check_misbehaviour(
        &ctx.client_state,
        trusted_2,
        trusted_1,
        &Misbehaviour {
            header_1: header_2.clone(),
            header_2: header_1.clone(),
        },
        ctx.now,
    );
    assert_eq!(forward, backward, "misbehaviour must be symmetric");
    forward
}

fn check_same_trusted(
    ctx: &TestContext,
    header_1: &Header,
    header_2: &Header,
) -> Result<Height, TendermintClientError> {
    check(
        ctx,
        header_1,
        &ctx.trusted_consensus_state,
        header_2,
        &ctx.trusted_consensus_state,
    )
}

#[test]
fn test_fork_with_different_app_hash() {
    let ctx = setup_test_context();
    let header_1 = ctx.header(11, 1).app_hash([1; 32]).build();
    let header_2 = ctx.header(11, 1).build();

    assert_eq!(
        check_same_trusted(&ctx, &header_1, &header_2),
        Ok(Height::new(1, 11))
    );
}

#[test]
fn test_fork_with_different_time() {
    let ctx = setup_test_context();
    let header_1 = ctx.header(11, 2).build();
    let header_2 = ctx.header(11, 1).build();

    assert_eq!(
        check_same_trusted(&ctx, &header_1, &header_2),
        Ok(Height::new(1, 11))
    );
}

#[test]
fn test_time_violation() {
    let ctx = setup_test_context();
    let header_1 = ctx.header(12, 1).build();
    let header_2 = ctx.header(11, 2).build();

    assert_eq!(
        check_same_trusted(&ctx, &header_1, &header_2),
        Ok(Height::new(1, 11))
    );
}

#[test]
fn test_time_violation_with_equal_time() {
    let ctx = setup_test_context();
    let header_1 = ctx.header(14, 3).build();
    let header_2 = ctx.header(12, 3).build();

    assert_eq!(
        check_same_trusted(&ctx, &header_1, &header_2),
        Ok(Height::new(1, 12))
    );
}

#[test]
fn test_different_trusted_heights() {
    let ctx = setup_test_context();
    let older_trusted = fixtures::consensus_state(
        TRUSTED_TIME - 10 * 1_000_000_000,
        ctx.validators.validator_set().hash(),
    );
    let header_1 = ctx.header(11, 2).build();
    let header_2 = ctx
        .header(11, 1)
        .trusted(Height::new(1, 8), &ctx.validators)
        .build();

    assert_eq!(
        check(
            &ctx,
            &header_1,
            &ctx.trusted_consensus_state,
            &header_2,
            &older_trusted
        ),
        Ok(Height::new(1, 11))
    );
}

#[test]
fn test_fork_at_future_revision() {
    let ctx = setup_test_context();
    let header_1 = HeaderBuilder::new("testchain-2", 10, after_trusted(2), &ctx.validators)
        .trusted(TRUSTED_HEIGHT, &ctx.validators)
        .build();
    let header_2 = HeaderBuilder::new("testchain-2", 10, after_trusted(1), &ctx.validators)
        .trusted(TRUSTED_HEIGHT, &ctx.validators)
        .build();

    assert_eq!(
        check_same_trusted(&ctx, &header_1, &header_2),
        Ok(Height::new(2, 10))
    );
}

#[test]
fn test_fork_at_previous_revision() {
    let mut ctx = setup_test_context();
    ctx.client_state = fixtures::client_state("testchain-2", Height::new(2, 1));

    let header_1 = ctx.header(11, 2).build();
    let header_2 = ctx.header(11, 1).build();
    assert_eq!(header_1.height(), Height::new(1, 11));

    assert_eq!(
        check_same_trusted(&ctx, &header_1, &header_2),
        Ok(Height::new(1, 11))
    );
}

#[test]
fn test_identical_headers() {
    let ctx = setup_test_context();
    let header = ctx.header(11, 1).build();

    assert_eq!(
        check_same_trusted(&ctx, &header, &header),
        Err(TendermintClientError::NoMisbehaviour)
    );
}

#[test]
fn test_consistent_headers() {
    let ctx = setup_test_context();
    let header_1 = ctx.header(12, 2).build();
    let header_2 = ctx.header(11, 1).build();

    assert_eq!(
        check_same_trusted(&ctx, &header_1, &header_2),
        Err(TendermintClientError::NoMisbehaviour)
    );
}

#[test]
fn test_different_chain() {
    let ctx = setup_test_context();
    let header_1 = HeaderBuilder::new("evmos", 11, after_trusted(2), &ctx.validators)
        .trusted(TRUSTED_HEIGHT, &ctx.validators)
        .build();
    let header_2 = HeaderBuilder::new("evmos", 11, after_trusted(1), &ctx.validators)
        .trusted(TRUSTED_HEIGHT, &ctx.validators)
        .build();

    assert_eq!(
        check_same_trusted(&ctx, &header_1, &header_2),
        Err(TendermintClientError::InvalidMisbehaviour(Box::new(
            TendermintClientError::InvalidChainId {
                expected: "testchain-0".to_string(),
                found: "evmos".to_string(),
            }
        )))
    );
}

#[test]
fn test_trusted_validators_do_not_match_consensus_state() {
    let ctx = setup_test_context();
    let other_validators = TestValidators::with_seed(9, &[10, 10, 10]);
    let header_1 = ctx
        .header(11, 2)
        .trusted(TRUSTED_HEIGHT, &other_validators)
        .build();
    let header_2 = ctx.header(11, 1).build();

    let err = check_same_trusted(&ctx, &header_1, &header_2).unwrap_err();
    let TendermintClientError::InvalidMisbehaviour(cause) = err else {
        panic!("expected invalid misbehaviour");
    };
    assert!(matches!(
        *cause,
        TendermintClientError::InvalidValidatorSet(ValidatorSetError::HashMismatch {
            set: "trusted",
            ..
        })
    ));
}

#[test]
fn test_trusting_period_expired() {
    let mut ctx = setup_test_context();
    ctx.now = TRUSTED_TIME + ctx.client_state.trusting_period_nanos();
    let header_1 = ctx.header(11, 2).build();
    let header_2 = ctx.header(11, 1).build();

    assert!(matches!(
        check_same_trusted(&ctx, &header_1, &header_2),
        Err(TendermintClientError::TrustingPeriodExpired { .. })
    ));
}

#[test]
fn test_trusting_period_uses_older_trusted_state() {
    let mut ctx = setup_test_context();
    let trusting_period = ctx.client_state.trusting_period_nanos();
    let older_trusted = fixtures::consensus_state(
        TRUSTED_TIME - 1_000_000_000,
        ctx.validators.validator_set().hash(),
    );
    ctx.now = TRUSTED_TIME - 1_000_000_000 + trusting_period;

    let header_1 = ctx.header(11, 2).build();
    let header_2 = ctx
        .header(11, 1)
        .trusted(Height::new(1, 8), &ctx.validators)
        .build();

    assert!(matches!(
        check(
            &ctx,
            &header_1,
            &ctx.trusted_consensus_state,
            &header_2,
            &older_trusted
        ),
        Err(TendermintClientError::TrustingPeriodExpired { .. })
    ));
}

#[test]
fn test_validator_set_changed_too_much() {
    let ctx = setup_test_context();
    let new_validators = TestValidators::with_seed(9, &[10, 10, 10]);
    let header_1 = HeaderBuilder::new(CHAIN_ID, 12, after_trusted(2), &new_validators)
        .trusted(TRUSTED_HEIGHT, &ctx.validators)
        .build();
    let header_2 = ctx.header(12, 1).build();

    let err = check_same_trusted(&ctx, &header_1, &header_2).unwrap_err();
    let TendermintClientError::InvalidMisbehaviour(cause) = err else {
        panic!("expected invalid misbehaviour");
    };
    assert!(matches!(
        *cause,
        TendermintClientError::InvalidValidatorSet(
            ValidatorSetError::InsufficientTrustedPower { signed: 0, .. }
        )
    ));
}

#[test]
fn test_insufficient_commit_power() {
    let ctx = setup_test_context();
    let header_1 = ctx.header(11, 2).signers(&[0]).build();
    let header_2 = ctx.header(11, 1).build();

    let err = check_same_trusted(&ctx, &header_1, &header_2).unwrap_err();
    assert_eq!(
        err,
        TendermintClientError::InvalidMisbehaviour(Box::new(
            TendermintClientError::InvalidCommit(CommitError::InsufficientVotingPower {
                signed: 10,
                total: 30
            })
        ))
    );
}

#[test]
fn test_frozen_client() {
    let mut ctx = setup_test_context();
    ctx.client_state.frozen_height = Height::new(1, 3);
    let header_1 = ctx.header(11, 2).build();
    let header_2 = ctx.header(11, 1).build();

    assert_eq!(
        check_same_trusted(&ctx, &header_1, &header_2),
        Err(TendermintClientError::ClientFrozen {
            frozen_height: Height::new(1, 3)
        })
    );
}
