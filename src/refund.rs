//! Best-effort gas refund accounting
//!
//! When a chain sequence enables the refund path, the module records the
//! relayer and its remaining computational budget immediately before
//! dispatch, and settles after a successful dispatch. Settlement is
//! best-effort: any failure on this path is logged and swallowed, never
//! disturbing the committed sequence.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};

use crate::error::Result;

/// Remaining computational budget of the executing context.
///
/// The in-process stand-in for the EVM's gas introspection; embedders
/// wire in whatever metering their runtime has.
pub trait GasMeter {
    /// Budget remaining right now, in gas units
    fn gas_left(&self) -> u64;
}

/// Meter that reports no budget, disabling refund payouts
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGasMeter;

impl GasMeter for NoopGasMeter {
    fn gas_left(&self) -> u64 {
        0
    }
}

/// Prices consumed gas in a refund token
pub trait PriceOracle {
    /// Cost of `gas_used` units, denominated in `token`
    fn quote_gas(&self, token: Address, gas_used: u64) -> Result<U256>;
}

/// What the module records ahead of dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RefundRecord {
    /// Relayer that submitted the bundle
    pub relayer: Address,
    /// Gas budget observed before dispatch
    pub gas_start: u64,
}

/// Module-private store of pending refund records, keyed by account.
///
/// A record is written by the module immediately before dispatch and
/// consumed exactly once at settlement; nothing outside the module can
/// read or replay it.
#[derive(Debug, Default)]
pub(crate) struct RefundLedger {
    records: HashMap<Address, RefundRecord>,
}

impl RefundLedger {
    pub fn record(&mut self, account: Address, record: RefundRecord) {
        self.records.insert(account, record);
    }

    /// Removes and returns the pending record for `account`
    pub fn take(&mut self, account: Address) -> Option<RefundRecord> {
        self.records.remove(&account)
    }

    /// Drops the pending record for `account` on the failure path
    pub fn clear(&mut self, account: Address) {
        self.records.remove(&account);
    }
}

/// A refund actually paid out of the account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundPayment {
    /// Who was paid
    pub recipient: Address,
    /// Token the refund was paid in
    pub token: Address,
    /// Amount paid, already clamped to the signer's ceiling
    pub amount: U256,
}

/// Clamps an oracle quote to the signer-specified ceiling.
///
/// The ceiling binds regardless of oracle price movement.
pub(crate) fn clamp_refund(quote: U256, ceiling: U256) -> U256 {
    quote.min(ceiling)
}
