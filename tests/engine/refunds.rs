//! Gas refund settlement: ceiling clamping and best-effort isolation

use alloy::primitives::{Address, U256};

use crate::common::{
    account_address, expiry_in, fee_recipient, pull_definition, relayer, token_call, usdc,
    FixedOracle, Harness, StepMeter,
};
use bundle_rs::{Bundle, ChainSequence, RefundRecipient, Sequence, SmartAccount};

fn refund_harness(price_per_gas: u64, oracle_fails: bool) -> Harness {
    Harness::new(1).with_refund_rig(
        Box::new(FixedOracle {
            price_per_gas: U256::from(price_per_gas),
            fail: oracle_fails,
        }),
        // Two readings per execution: 1_000_000 at record, 900_000 at
        // settlement, so gas_used is always 100_000
        Box::new(StepMeter::new(1_000_000, 100_000)),
    )
}

fn funded_bundle(harness: &Harness, ceiling: u64, recipient: RefundRecipient) -> Bundle {
    let sequence = Sequence::builder("refunded")
        .add(
            pull_definition(),
            harness.ids.pull,
            token_call(usdc(), U256::from(500_000)),
        )
        .build();
    Bundle::new(
        expiry_in(3600),
        vec![
            ChainSequence::new(1, 0, sequence).with_gas_refund(
                usdc(),
                U256::from(ceiling),
                recipient,
            ),
        ],
    )
}

#[tokio::test]
async fn test_refund_clamped_to_signer_ceiling() {
    // Quote: 100_000 gas * 2 = 200_000, ceiling 150_000
    let mut harness = refund_harness(2, false);
    let bundle = funded_bundle(&harness, 150_000, RefundRecipient::Executor);
    let signature = harness.sign(&bundle).await;

    let receipt = harness.execute(&bundle, &signature).unwrap();

    let payment = receipt.refund.unwrap();
    assert_eq!(payment.amount, U256::from(150_000));
    assert_eq!(payment.recipient, relayer());
    assert_eq!(payment.token, usdc());
    assert_eq!(
        harness.account.balance_of(usdc()),
        U256::from(500_000 - 150_000)
    );
}

#[tokio::test]
async fn test_refund_below_ceiling_pays_quote() {
    let mut harness = refund_harness(2, false);
    let bundle = funded_bundle(&harness, 400_000, RefundRecipient::Executor);
    let signature = harness.sign(&bundle).await;

    let receipt = harness.execute(&bundle, &signature).unwrap();
    assert_eq!(receipt.refund.unwrap().amount, U256::from(200_000));
}

#[tokio::test]
async fn test_refund_to_fee_recipient() {
    let mut harness = refund_harness(1, false);
    let bundle = funded_bundle(&harness, 150_000, RefundRecipient::FeeRecipient);
    let signature = harness.sign(&bundle).await;

    let receipt = harness.execute(&bundle, &signature).unwrap();
    assert_eq!(receipt.refund.unwrap().recipient, fee_recipient());
}

#[tokio::test]
async fn test_missing_oracle_skips_refund_but_commits_sequence() {
    // No refund rig at all
    let mut harness = Harness::new(1);
    let bundle = funded_bundle(&harness, 150_000, RefundRecipient::Executor);
    let signature = harness.sign(&bundle).await;

    let receipt = harness.execute(&bundle, &signature).unwrap();

    assert!(receipt.refund.is_none());
    assert_eq!(harness.account.balance_of(usdc()), U256::from(500_000));
    assert_eq!(harness.module.sequence_nonce(account_address()), 1);
}

#[tokio::test]
async fn test_oracle_failure_is_best_effort() {
    let mut harness = refund_harness(2, true);
    let bundle = funded_bundle(&harness, 150_000, RefundRecipient::Executor);
    let signature = harness.sign(&bundle).await;

    let receipt = harness.execute(&bundle, &signature).unwrap();

    // Main sequence committed, refund silently skipped
    assert!(receipt.refund.is_none());
    assert_eq!(harness.account.balance_of(usdc()), U256::from(500_000));
    assert_eq!(harness.module.sequence_nonce(account_address()), 1);
}

#[tokio::test]
async fn test_zero_refund_token_skips_settlement() {
    let mut harness = refund_harness(2, false);

    let sequence = Sequence::builder("zero token")
        .add(
            pull_definition(),
            harness.ids.pull,
            token_call(usdc(), U256::from(500_000)),
        )
        .build();
    let chain_sequence = ChainSequence::new(1, 0, sequence).with_gas_refund(
        Address::ZERO,
        U256::from(150_000),
        RefundRecipient::Executor,
    );
    let bundle = Bundle::new(expiry_in(3600), vec![chain_sequence]);
    let signature = harness.sign(&bundle).await;

    let receipt = harness.execute(&bundle, &signature).unwrap();
    assert!(receipt.refund.is_none());
    assert_eq!(harness.account.balance_of(usdc()), U256::from(500_000));
}

#[tokio::test]
async fn test_insufficient_refund_balance_skips_settlement() {
    let mut harness = refund_harness(2, false);

    // Refund token the account never held
    let other_token = Address::repeat_byte(0xc3);
    let sequence = Sequence::builder("short")
        .add(
            pull_definition(),
            harness.ids.pull,
            token_call(usdc(), U256::from(500_000)),
        )
        .build();
    let bundle = Bundle::new(
        expiry_in(3600),
        vec![ChainSequence::new(1, 0, sequence).with_gas_refund(
            other_token,
            U256::from(150_000),
            RefundRecipient::Executor,
        )],
    );
    let signature = harness.sign(&bundle).await;

    let receipt = harness.execute(&bundle, &signature).unwrap();
    assert!(receipt.refund.is_none());
    assert_eq!(harness.account.balance_of(usdc()), U256::from(500_000));
    assert_eq!(harness.account.balance_of(other_token), U256::ZERO);
}

#[tokio::test]
async fn test_refund_parameters_are_signed() {
    let mut harness = refund_harness(2, false);
    let bundle = funded_bundle(&harness, 150_000, RefundRecipient::Executor);
    let signature = harness.sign(&bundle).await;

    // Relayer raises the ceiling after signing
    let mut tampered = bundle.clone();
    tampered.sequences[0].max_refund_amount = U256::from(10_000_000);

    let err = harness.execute(&tampered, &signature).unwrap_err();
    assert!(matches!(err, bundle_rs::Error::NotOwner { .. }));
}
