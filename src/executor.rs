//! Sequence executor: ordered dispatch of validated actions
//!
//! The executor trusts the shape of what it receives but not the ids: it
//! re-resolves every action through the registry itself, since it may be
//! invoked directly by callers other than the verification module (a
//! fee-sweep module, for instance).

use alloy::primitives::Bytes;
use alloy::sol_types::SolValue;
use tracing::debug;

use crate::account::SmartAccount;
use crate::error::{Error, Result};
use crate::registry::ActionRegistry;
use crate::types::{Bundle, ExecutorSequence};

/// Bundle payload forwarded to bundle-aware actions so they can carry
/// bundle data in their own bookkeeping
#[derive(Debug, Clone, Copy)]
pub struct BundleContext<'a> {
    /// The original signed bundle
    pub bundle: &'a Bundle,
    /// The original signature
    pub signature: &'a [u8],
}

/// Executes validated sequences against a smart account, stopping on the
/// first failure.
///
/// All-or-nothing semantics are split between the executor and its
/// caller: the executor never retries and aborts on the first failed
/// action; rolling back the effects of earlier actions is the caller's
/// checkpoint to revert.
pub struct SequenceExecutor<R> {
    registry: R,
}

impl<R: ActionRegistry> SequenceExecutor<R> {
    /// Creates an executor resolving through `registry`
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Executes each action of `sequence` in order, acting as `account`.
    ///
    /// Per step: resolve the id, unwrap the call payload, then dispatch
    /// via the bundle-context entry point when the action advertises it
    /// and a context was supplied, the plain entry point otherwise.
    ///
    /// # Errors
    /// - [`Error::ActionNotFound`] when an id does not resolve; fatal for
    ///   the whole batch.
    /// - [`Error::ActionFailed`] when an action fails, carrying the
    ///   action's original revert payload unmodified.
    pub fn execute_sequence(
        &self,
        account: &mut dyn SmartAccount,
        sequence: &ExecutorSequence,
        context: Option<BundleContext<'_>>,
    ) -> Result<()> {
        sequence.check_lengths()?;

        for (index, (action_id, call_data)) in sequence
            .action_ids
            .iter()
            .zip(&sequence.call_data)
            .enumerate()
        {
            let action = self.registry.resolve(*action_id).ok_or(Error::ActionNotFound {
                index,
                action_id: *action_id,
            })?;

            let (data, strategy_id) = unwrap_call_payload(call_data);
            debug!(
                sequence = %sequence.name,
                index,
                action = %action.address(),
                strategy_id,
                "dispatching action"
            );

            let outcome = match context {
                Some(ctx) if action.bundle_aware() => {
                    action.execute_in_bundle(account, &data, ctx.bundle, ctx.signature, strategy_id)
                }
                _ => action.execute(account, &data, strategy_id),
            };

            if let Err(err) = outcome {
                return Err(Error::ActionFailed {
                    index,
                    action: action.address(),
                    reason: err.reason().to_string(),
                    revert_data: err.revert_data().cloned(),
                });
            }
        }

        Ok(())
    }
}

/// Unwraps a call payload encoded as the ABI tuple
/// `(bytes innerData, uint16 strategyId)`.
///
/// Payloads that do not decode as the tuple pass through raw with
/// strategy id 0, for callers still emitting bare calldata.
fn unwrap_call_payload(call_data: &Bytes) -> (Bytes, u16) {
    match <(Bytes, u16)>::abi_decode(call_data) {
        Ok((inner, strategy_id)) => (inner, strategy_id),
        Err(_) => (call_data.clone(), 0),
    }
}
