//! Replay protection: nonces, expiry, owner changes, cross-chain scope

use alloy::primitives::{Bytes, U256};
use alloy::signers::local::PrivateKeySigner;

use crate::common::{
    account_address, expiry_in, pull_definition, token_call, usdc, Harness,
};
use bundle_rs::{Bundle, ChainSequence, Error, Sequence, SmartAccount};

fn pull_sequence(harness: &Harness, name: &str, amount: u64) -> Sequence {
    Sequence::builder(name)
        .add(
            pull_definition(),
            harness.ids.pull,
            token_call(usdc(), U256::from(amount)),
        )
        .build()
}

#[tokio::test]
async fn test_nonce_monotonicity() {
    let mut harness = Harness::new(1);

    for expected in 0..3u64 {
        let sequence = pull_sequence(&harness, "step", 10);
        let bundle = Bundle::new(
            expiry_in(3600),
            vec![ChainSequence::new(1, expected, sequence)],
        );
        let signature = harness.sign(&bundle).await;

        let receipt = harness.execute(&bundle, &signature).unwrap();
        assert_eq!(receipt.sequence_nonce, expected);
        assert_eq!(
            harness.module.sequence_nonce(account_address()),
            expected + 1
        );
    }

    assert_eq!(harness.account.balance_of(usdc()), U256::from(30));
}

#[tokio::test]
async fn test_replay_of_consumed_nonce_is_rejected() {
    let mut harness = Harness::new(1);

    let bundle = Bundle::new(
        expiry_in(3600),
        vec![ChainSequence::new(1, 0, pull_sequence(&harness, "once", 100))],
    );
    let signature = harness.sign(&bundle).await;

    harness.execute(&bundle, &signature).unwrap();
    assert_eq!(harness.account.balance_of(usdc()), U256::from(100));

    // Same (bundle, signature) pair again: lookup failure, no state change
    let err = harness.execute(&bundle, &signature).unwrap_err();
    assert!(matches!(
        err,
        Error::SequenceNotFound {
            chain_id: 1,
            expected_nonce: 1,
        }
    ));
    assert_eq!(harness.account.balance_of(usdc()), U256::from(100));
    assert_eq!(harness.module.sequence_nonce(account_address()), 1);
}

#[tokio::test]
async fn test_expired_bundle_is_rejected_despite_valid_signature() {
    let mut harness = Harness::new(1);

    let bundle = Bundle::new(
        1_000, // long past
        vec![ChainSequence::new(1, 0, pull_sequence(&harness, "stale", 100))],
    );
    let signature = harness.sign(&bundle).await;

    let err = harness.execute(&bundle, &signature).unwrap_err();
    match err {
        Error::Expired { expiry, now } => {
            assert_eq!(expiry, 1_000);
            assert!(now > expiry);
        }
        other => panic!("expected Expired, got {:?}", other),
    }
    assert_eq!(harness.module.sequence_nonce(account_address()), 0);
}

#[tokio::test]
async fn test_owner_change_invalidates_pending_bundle() {
    let mut harness = Harness::new(1);
    let signer_address = harness.signer.address();

    let bundle = Bundle::new(
        expiry_in(3600),
        vec![ChainSequence::new(1, 0, pull_sequence(&harness, "pending", 100))],
    );
    let signature = harness.sign(&bundle).await;

    // Owner removed after signing: the bundle dies with the ownership
    harness.account.remove_owner(signer_address);
    let err = harness.execute(&bundle, &signature).unwrap_err();
    match err {
        Error::NotOwner { signer, account } => {
            assert_eq!(signer, signer_address);
            assert_eq!(account, account_address());
        }
        other => panic!("expected NotOwner, got {:?}", other),
    }

    // Restoring ownership revives it; bundles are stateless until consumed
    harness.account.add_owner(signer_address);
    harness.execute(&bundle, &signature).unwrap();
    assert_eq!(harness.account.balance_of(usdc()), U256::from(100));
}

#[tokio::test]
async fn test_cross_chain_independence_with_one_signature() {
    let signer = PrivateKeySigner::random();
    let mut chain_one = Harness::with_signer(1, signer.clone());
    let mut chain_two = Harness::with_signer(2, signer);

    // One bundle covering both chains at nonce 0
    let bundle = Bundle::new(
        expiry_in(3600),
        vec![
            ChainSequence::new(1, 0, pull_sequence(&chain_one, "on one", 100)),
            ChainSequence::new(2, 0, pull_sequence(&chain_two, "on two", 50)),
        ],
    );

    // Signed once: the domain chain id is fixed, so the digest is identical
    // on both chains
    let signature = chain_one.sign(&bundle).await;
    assert_eq!(
        chain_one.module.bundle_hash(account_address(), &bundle),
        chain_two.module.bundle_hash(account_address(), &bundle)
    );

    let receipt_one = chain_one.execute(&bundle, &signature).unwrap();
    assert_eq!(receipt_one.chain_id, 1);
    assert_eq!(chain_one.account.balance_of(usdc()), U256::from(100));

    // Chain 1's consumption neither advanced nor blocked chain 2
    assert_eq!(chain_two.module.sequence_nonce(account_address()), 0);
    let receipt_two = chain_two.execute(&bundle, &signature).unwrap();
    assert_eq!(receipt_two.chain_id, 2);
    assert_eq!(chain_two.account.balance_of(usdc()), U256::from(50));

    // Each chain scope is consumed exactly once
    assert!(chain_one.execute(&bundle, &signature).is_err());
    assert!(chain_two.execute(&bundle, &signature).is_err());
}

#[tokio::test]
async fn test_bundle_for_another_chain_leaves_state_unchanged() {
    let mut harness = Harness::new(1);

    let bundle = Bundle::new(
        expiry_in(3600),
        vec![ChainSequence::new(2, 0, pull_sequence(&harness, "elsewhere", 100))],
    );
    let signature = harness.sign(&bundle).await;

    let err = harness.execute(&bundle, &signature).unwrap_err();
    assert!(matches!(
        err,
        Error::SequenceNotFound {
            chain_id: 1,
            expected_nonce: 0,
        }
    ));
    assert_eq!(harness.account.balance_of(usdc()), U256::ZERO);
    assert_eq!(harness.module.sequence_nonce(account_address()), 0);
}

#[tokio::test]
async fn test_malformed_signatures_are_rejected() {
    let mut harness = Harness::new(1);

    let bundle = Bundle::new(
        expiry_in(3600),
        vec![ChainSequence::new(1, 0, pull_sequence(&harness, "sig", 100))],
    );

    // Wrong length
    let err = harness
        .execute(&bundle, &Bytes::from(vec![0u8; 64]))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidSignature(_)));

    // Unusable v value
    let mut sig = vec![0u8; 65];
    sig[64] = 29;
    let err = harness.execute(&bundle, &Bytes::from(sig)).unwrap_err();
    assert!(matches!(err, Error::InvalidSignature(_)));

    // Well-formed shape but cryptographic garbage
    let mut sig = vec![0xffu8; 65];
    sig[64] = 27;
    let err = harness.execute(&bundle, &Bytes::from(sig)).unwrap_err();
    assert!(matches!(err, Error::InvalidSignature(_)));
}

#[tokio::test]
async fn test_duplicate_chain_nonce_pair_first_wins() {
    let mut harness = Harness::new(1);

    // Callers must not rely on this; the engine's behavior is first-match
    let bundle = Bundle::new(
        expiry_in(3600),
        vec![
            ChainSequence::new(1, 0, pull_sequence(&harness, "first", 100)),
            ChainSequence::new(1, 0, pull_sequence(&harness, "shadowed", 999)),
        ],
    );
    let signature = harness.sign(&bundle).await;

    harness.execute(&bundle, &signature).unwrap();
    assert_eq!(harness.account.balance_of(usdc()), U256::from(100));
}
