//! Bundle verification module: the relayer-facing entry point
//!
//! Verification runs as a fixed pipeline with no persistent state beyond
//! the nonce counters: expiry check, signer recovery, live owner check,
//! chain-sequence selection, per-action identity validation, nonce
//! advance, then dispatch through the sequence executor. Any failure
//! after entry rolls everything back, nonce advance included.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::{Address, B256, U256};
use tracing::{debug, info, warn};

use crate::account::SmartAccount;
use crate::config::EngineConfig;
use crate::encoding::{bundle_digest, domain_separator};
use crate::error::{Error, Result};
use crate::executor::{BundleContext, SequenceExecutor};
use crate::nonce::NonceStore;
use crate::refund::{
    clamp_refund, GasMeter, NoopGasMeter, PriceOracle, RefundLedger, RefundPayment, RefundRecord,
};
use crate::registry::ActionRegistry;
use crate::signing::recover_signer;
use crate::types::{Bundle, ChainSequence, RefundRecipient};

/// Audit record returned by a successful [`BundleModule::execute_bundle`],
/// mirrored as a structured `tracing` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReceipt {
    /// Account the sequence ran against
    pub account: Address,
    /// Chain the module executed on
    pub chain_id: u64,
    /// Nonce consumed by this execution
    pub sequence_nonce: u64,
    /// Expiry of the bundle that was executed
    pub expiry: u64,
    /// Digest the signature was verified against
    pub bundle_hash: B256,
    /// Number of actions dispatched
    pub actions: usize,
    /// Gas refund paid, when the side path settled one
    pub refund: Option<RefundPayment>,
}

/// Verifies signed bundles and dispatches their chain-local sequence.
///
/// One module instance corresponds to one module deployment on one chain:
/// it owns the nonce counters for every account it serves and is the only
/// writer to them.
pub struct BundleModule<R> {
    config: EngineConfig,
    registry: R,
    executor: SequenceExecutor<R>,
    nonces: NonceStore,
    refunds: RefundLedger,
    oracle: Option<Box<dyn PriceOracle + Send + Sync>>,
    meter: Box<dyn GasMeter + Send + Sync>,
}

impl<R: ActionRegistry + Clone> BundleModule<R> {
    /// Creates a module for `config.chain_id`, resolving actions through
    /// `registry`
    pub fn new(config: EngineConfig, registry: R) -> Self {
        let executor = SequenceExecutor::new(registry.clone());
        Self {
            config,
            registry,
            executor,
            nonces: NonceStore::new(),
            refunds: RefundLedger::default(),
            oracle: None,
            meter: Box::new(NoopGasMeter),
        }
    }
}

impl<R: ActionRegistry> BundleModule<R> {
    /// Wires in a price oracle for refund settlement
    pub fn with_price_oracle(mut self, oracle: Box<dyn PriceOracle + Send + Sync>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Wires in a gas meter for refund settlement
    pub fn with_gas_meter(mut self, meter: Box<dyn GasMeter + Send + Sync>) -> Self {
        self.meter = meter;
        self
    }

    /// Returns the module configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Nonce the next valid sequence for `account` must carry on this
    /// module's chain
    pub fn sequence_nonce(&self, account: Address) -> u64 {
        self.nonces.current(account, self.config.chain_id)
    }

    /// Nonce bookkeeping for an arbitrary chain scope
    pub fn sequence_nonce_on(&self, account: Address, chain_id: u64) -> u64 {
        self.nonces.current(account, chain_id)
    }

    /// Digest `bundle` must be signed over to target `account`; what
    /// off-chain tooling feeds a signer
    pub fn bundle_hash(&self, account: Address, bundle: &Bundle) -> B256 {
        bundle_digest(&self.config.domain, account, bundle)
    }

    /// Domain separator for `account` under this module's domain
    pub fn domain_separator(&self, account: Address) -> B256 {
        domain_separator(&self.config.domain, account)
    }

    /// Verifies `signature` over `bundle` and executes the chain sequence
    /// matching this module's chain at the account's expected nonce.
    ///
    /// `relayer` is the submitting party (a refund recipient candidate);
    /// `value` is credited to the account's native balance before dispatch
    /// and rolled back with everything else on failure.
    ///
    /// The nonce advances strictly before dispatch, so a reentrant
    /// submission during dispatch cannot re-match the same `(chain,
    /// nonce)` pair; a failed dispatch rolls the advance back along with
    /// all account state.
    pub fn execute_bundle(
        &mut self,
        account: &mut dyn SmartAccount,
        bundle: &Bundle,
        signature: &[u8],
        relayer: Address,
        value: U256,
    ) -> Result<BundleReceipt> {
        if bundle.sequences.is_empty() {
            return Err(Error::EmptyBundle);
        }

        let now = unix_now();
        if now >= bundle.expiry {
            return Err(Error::Expired {
                expiry: bundle.expiry,
                now,
            });
        }

        let target = account.address();
        let digest = bundle_digest(&self.config.domain, target, bundle);
        let signer = recover_signer(digest, signature)?;

        if !account.is_owner(signer) {
            return Err(Error::NotOwner {
                signer,
                account: target,
            });
        }

        let chain_id = self.config.chain_id;
        let expected_nonce = self.nonces.current(target, chain_id);
        let selected = bundle
            .find_sequence(chain_id, expected_nonce)
            .ok_or(Error::SequenceNotFound {
                chain_id,
                expected_nonce,
            })?;

        self.validate_sequence(selected)?;

        let consumed = self.nonces.advance(target, chain_id);

        let checkpoint = account.checkpoint();
        if value > U256::ZERO {
            account.credit(Address::ZERO, value);
        }

        if selected.enable_gas_refund {
            self.refunds.record(
                target,
                RefundRecord {
                    relayer,
                    gas_start: self.meter.gas_left(),
                },
            );
        }

        let stripped = selected.sequence.stripped();
        let context = BundleContext { bundle, signature };
        if let Err(err) = self
            .executor
            .execute_sequence(account, &stripped, Some(context))
        {
            account.revert_to(checkpoint);
            self.nonces.revert(target, chain_id);
            self.refunds.clear(target);
            return Err(err);
        }
        account.commit(checkpoint);

        let refund = self.settle_refund(account, selected);

        info!(
            account = %target,
            chain_id,
            nonce = consumed,
            expiry = bundle.expiry,
            actions = stripped.action_ids.len(),
            "bundle executed"
        );

        Ok(BundleReceipt {
            account: target,
            chain_id,
            sequence_nonce: consumed,
            expiry: bundle.expiry,
            bundle_hash: digest,
            actions: stripped.action_ids.len(),
            refund,
        })
    }

    /// Shape and identity validation of the selected sequence.
    ///
    /// Each declared definition is compared against the live identity of
    /// the registry-resolved action at the same index; this is what stops
    /// a relayer from substituting a different action after signing.
    fn validate_sequence(&self, selected: &ChainSequence) -> Result<()> {
        let sequence = &selected.sequence;
        sequence.check_lengths()?;
        if sequence.is_empty() {
            return Err(Error::EmptySequence {
                name: sequence.name.clone(),
            });
        }

        for (index, (declared, action_id)) in
            sequence.actions.iter().zip(&sequence.action_ids).enumerate()
        {
            let action = self.registry.resolve(*action_id).ok_or(Error::ActionNotFound {
                index,
                action_id: *action_id,
            })?;
            let actual = action.definition();
            if actual != *declared {
                return Err(Error::ActionMismatch {
                    index,
                    expected: declared.clone(),
                    actual,
                });
            }
        }

        Ok(())
    }

    /// Best-effort refund settlement after a committed dispatch.
    ///
    /// Every early return here is deliberate: nothing on this path may
    /// disturb the already-committed sequence.
    fn settle_refund(
        &mut self,
        account: &mut dyn SmartAccount,
        selected: &ChainSequence,
    ) -> Option<RefundPayment> {
        if !selected.enable_gas_refund {
            return None;
        }
        let record = self.refunds.take(account.address())?;

        if selected.refund_token == Address::ZERO {
            warn!(account = %account.address(), "gas refund skipped: zero refund token");
            return None;
        }

        let Some(oracle) = self.oracle.as_deref() else {
            warn!(account = %account.address(), "gas refund skipped: no price oracle");
            return None;
        };

        let gas_used = record.gas_start.saturating_sub(self.meter.gas_left());
        let quote = match oracle.quote_gas(selected.refund_token, gas_used) {
            Ok(quote) => quote,
            Err(err) => {
                warn!(account = %account.address(), %err, "gas refund skipped: oracle failure");
                return None;
            }
        };

        let amount = clamp_refund(quote, selected.max_refund_amount);
        if amount.is_zero() {
            debug!(account = %account.address(), "gas refund skipped: zero amount");
            return None;
        }

        let recipient = match selected.refund_recipient {
            RefundRecipient::Executor => record.relayer,
            RefundRecipient::FeeRecipient => self.config.fee_recipient,
        };
        if recipient == Address::ZERO {
            warn!(account = %account.address(), "gas refund skipped: zero recipient");
            return None;
        }

        if let Err(err) = account.debit(selected.refund_token, amount) {
            warn!(account = %account.address(), %err, "gas refund skipped");
            return None;
        }

        info!(
            account = %account.address(),
            token = %selected.refund_token,
            %amount,
            %recipient,
            "gas refund paid"
        );

        Some(RefundPayment {
            recipient,
            token: selected.refund_token,
            amount,
        })
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for BundleModule<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleModule")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Seconds since the Unix epoch
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
