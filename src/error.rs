//! Error types for bundle-rs

use alloy::primitives::{Address, Bytes, U256};
use thiserror::Error;

use crate::types::{ActionDefinition, ActionId};

/// Result type alias for bundle-rs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while verifying or executing a bundle.
///
/// Every failure aborts the enclosing execution; variants carry enough
/// structured context for off-chain tooling to diagnose a rejection
/// without replaying it.
#[derive(Debug, Error)]
pub enum Error {
    /// The bundle's expiry has passed
    #[error("Bundle expired at {expiry}, current time is {now}")]
    Expired { expiry: u64, now: u64 },

    /// The signature is malformed or does not recover to a usable address
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// The recovered signer is not a current owner of the target account
    #[error("Signer {signer} is not an owner of account {account}")]
    NotOwner { signer: Address, account: Address },

    /// The bundle carries no sequences at all
    #[error("Bundle contains no sequences")]
    EmptyBundle,

    /// No chain sequence matches the executing chain and expected nonce
    #[error("No sequence for chain {chain_id} at nonce {expected_nonce}")]
    SequenceNotFound { chain_id: u64, expected_nonce: u64 },

    /// The sequence's parallel arrays disagree in length
    #[error(
        "Sequence arrays disagree: {actions} definitions, {action_ids} ids, {call_data} payloads"
    )]
    LengthMismatch {
        actions: usize,
        action_ids: usize,
        call_data: usize,
    },

    /// The selected sequence has no steps
    #[error("Sequence '{name}' contains no actions")]
    EmptySequence { name: String },

    /// An action id did not resolve through the registry
    #[error("Action {action_id} at index {index} is not registered")]
    ActionNotFound { index: usize, action_id: ActionId },

    /// The resolved action's live identity differs from what was signed
    #[error("Action at index {index} declares {expected} but resolves to {actual}")]
    ActionMismatch {
        index: usize,
        expected: ActionDefinition,
        actual: ActionDefinition,
    },

    /// A dispatched action failed; `revert_data` is the action's original
    /// payload, forwarded unmodified
    #[error("Action {action} at index {index} failed: {reason}")]
    ActionFailed {
        index: usize,
        action: Address,
        reason: String,
        revert_data: Option<Bytes>,
    },

    /// An account debit exceeded the available balance
    #[error("Insufficient balance of {token}: have {balance}, need {required}")]
    InsufficientBalance {
        token: Address,
        balance: U256,
        required: U256,
    },

    /// The refund price oracle failed
    #[error("Price oracle error: {0}")]
    Oracle(String),

    /// Signature generation failed
    #[error("Failed to sign: {0}")]
    Signing(String),
}

impl From<alloy::signers::Error> for Error {
    fn from(err: alloy::signers::Error) -> Self {
        Error::Signing(err.to_string())
    }
}
