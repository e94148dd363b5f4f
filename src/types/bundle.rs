//! Bundle data model: what the user signs and what the executor receives

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use super::{ActionDefinition, ActionId, RefundRecipient};
use crate::error::{Error, Result};

/// Ordered list of actions plus their call data, in signer-facing form.
///
/// The three arrays are parallel and must have equal length:
/// `action_ids[i]`/`call_data[i]` are what actually executes, while
/// `actions[i]` is the identity the signer believed would execute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    /// Human-readable label, carried through to the executor
    pub name: String,
    /// Signer-declared identity per step
    pub actions: Vec<ActionDefinition>,
    /// Registry id per step
    pub action_ids: Vec<ActionId>,
    /// Opaque call payload per step
    pub call_data: Vec<Bytes>,
}

impl Sequence {
    /// Starts a builder that keeps the parallel arrays in sync
    pub fn builder(name: impl Into<String>) -> SequenceBuilder {
        SequenceBuilder::new(name)
    }

    /// Number of steps in the sequence
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the sequence has no steps
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Validates that the three parallel arrays agree in length
    pub fn check_lengths(&self) -> Result<()> {
        if self.actions.len() != self.action_ids.len()
            || self.action_ids.len() != self.call_data.len()
        {
            return Err(Error::LengthMismatch {
                actions: self.actions.len(),
                action_ids: self.action_ids.len(),
                call_data: self.call_data.len(),
            });
        }
        Ok(())
    }

    /// Returns the executor-facing form, stripped of the signer-facing
    /// definitions
    pub fn stripped(&self) -> ExecutorSequence {
        ExecutorSequence {
            name: self.name.clone(),
            action_ids: self.action_ids.clone(),
            call_data: self.call_data.clone(),
        }
    }
}

/// Builder for [`Sequence`] that appends to all three parallel arrays at
/// once, so a length mismatch cannot be constructed
#[derive(Debug, Clone, Default)]
pub struct SequenceBuilder {
    sequence: Sequence,
}

impl SequenceBuilder {
    /// Creates a new builder for a named sequence
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            sequence: Sequence {
                name: name.into(),
                ..Sequence::default()
            },
        }
    }

    /// Appends one step: declared identity, registry id, and call payload
    pub fn add(
        mut self,
        definition: ActionDefinition,
        action_id: ActionId,
        call_data: impl Into<Bytes>,
    ) -> Self {
        self.sequence.actions.push(definition);
        self.sequence.action_ids.push(action_id);
        self.sequence.call_data.push(call_data.into());
        self
    }

    /// Finishes the sequence
    pub fn build(self) -> Sequence {
        self.sequence
    }
}

/// One chain's slice of a multi-chain bundle, tagged with the nonce it
/// expects to consume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSequence {
    /// Chain this slice is intended for
    pub chain_id: u64,
    /// Nonce this slice consumes on that chain
    pub sequence_nonce: u64,
    /// The actions to run
    pub sequence: Sequence,
    /// Whether the module should settle a gas refund after dispatch
    #[serde(default)]
    pub enable_gas_refund: bool,
    /// Token the refund is paid in; zero disables settlement
    #[serde(default)]
    pub refund_token: Address,
    /// Signer-specified ceiling the refund can never exceed
    #[serde(default)]
    pub max_refund_amount: U256,
    /// Who the refund is paid to
    #[serde(default)]
    pub refund_recipient: RefundRecipient,
}

impl ChainSequence {
    /// Creates a chain sequence with the refund path disabled
    pub fn new(chain_id: u64, sequence_nonce: u64, sequence: Sequence) -> Self {
        Self {
            chain_id,
            sequence_nonce,
            sequence,
            enable_gas_refund: false,
            refund_token: Address::ZERO,
            max_refund_amount: U256::ZERO,
            refund_recipient: RefundRecipient::default(),
        }
    }

    /// Enables the gas refund side path
    pub fn with_gas_refund(
        mut self,
        refund_token: Address,
        max_refund_amount: U256,
        refund_recipient: RefundRecipient,
    ) -> Self {
        self.enable_gas_refund = true;
        self.refund_token = refund_token;
        self.max_refund_amount = max_refund_amount;
        self.refund_recipient = refund_recipient;
        self
    }
}

/// The single object the user signs once, covering potentially many chains
/// and nonce positions.
///
/// A bundle has no on-chain identity beyond what its signature attests to:
/// it is constructed and signed off-chain, and discarded once the matched
/// chain sequence's nonce is consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    /// Unix timestamp after which the bundle is unusable
    pub expiry: u64,
    /// Per-chain slices
    pub sequences: Vec<ChainSequence>,
}

impl Bundle {
    /// Creates a new Bundle
    pub fn new(expiry: u64, sequences: Vec<ChainSequence>) -> Self {
        Self { expiry, sequences }
    }

    /// First sequence matching the executing chain and expected nonce, in
    /// array order.
    ///
    /// Bundles should not contain duplicate `(chain_id, nonce)` pairs; if
    /// one does, the first entry wins and callers must treat the choice as
    /// unspecified.
    pub fn find_sequence(&self, chain_id: u64, sequence_nonce: u64) -> Option<&ChainSequence> {
        self.sequences
            .iter()
            .find(|cs| cs.chain_id == chain_id && cs.sequence_nonce == sequence_nonce)
    }
}

/// Executor-facing sequence: the validated ids and payloads, stripped of
/// signer-facing metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorSequence {
    /// Label carried over from the signed sequence
    pub name: String,
    /// Registry id per step
    pub action_ids: Vec<ActionId>,
    /// Opaque call payload per step
    pub call_data: Vec<Bytes>,
}

impl ExecutorSequence {
    /// Validates that the two parallel arrays agree in length
    pub fn check_lengths(&self) -> Result<()> {
        if self.action_ids.len() != self.call_data.len() {
            return Err(Error::LengthMismatch {
                actions: self.action_ids.len(),
                action_ids: self.action_ids.len(),
                call_data: self.call_data.len(),
            });
        }
        Ok(())
    }
}
