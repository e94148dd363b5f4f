//! Common test fixtures: mock actions, oracle, gas meter, and a harness
//! wiring a module, registry and account together

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::{Address, Bytes, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolValue;

use bundle_rs::{
    sign_bundle, Action, ActionDefinition, ActionError, ActionId, ActionResult, ActionType,
    Bundle, BundleModule, BundleReceipt, EngineConfig, Error, GasMeter, LocalAccount, PriceOracle,
    Result, SmartAccount, StaticRegistry,
};

/// Stable account address shared across harnesses, so one signature can be
/// replayed against modules for different chains
pub fn account_address() -> Address {
    Address::repeat_byte(0x5a)
}

pub fn relayer() -> Address {
    Address::repeat_byte(0x99)
}

pub fn fee_recipient() -> Address {
    Address::repeat_byte(0xfe)
}

pub fn usdc() -> Address {
    Address::repeat_byte(0xa1)
}

pub fn pool_share() -> Address {
    Address::repeat_byte(0xb2)
}

/// Unix timestamp `secs` seconds from now
pub fn expiry_in(secs: u64) -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        + secs
}

/// Wraps inner calldata in the `(bytes, uint16)` envelope the executor
/// unwraps
pub fn wrap_payload(inner: impl Into<Bytes>, strategy_id: u16) -> Bytes {
    Bytes::from((inner.into(), strategy_id).abi_encode())
}

/// Calldata for the mock token actions: `(token, amount)`
pub fn token_call(token: Address, amount: U256) -> Bytes {
    wrap_payload(Bytes::from((token, amount).abi_encode()), 0)
}

pub fn pull_definition() -> ActionDefinition {
    ActionDefinition::new("Token", ActionType::Transfer)
}

pub fn deposit_definition() -> ActionDefinition {
    ActionDefinition::new("Vault", ActionType::Deposit)
}

pub fn bridge_definition() -> ActionDefinition {
    ActionDefinition::new("Bridge", ActionType::Bridge)
}

fn decode_token_call(data: &Bytes) -> std::result::Result<(Address, U256), ActionError> {
    <(Address, U256)>::abi_decode(data)
        .map_err(|e| ActionError::new(format!("bad token calldata: {e}")))
}

/// Credits `amount` of `token` to the account (a transfer-in)
pub struct PullTokenAction;

impl Action for PullTokenAction {
    fn address(&self) -> Address {
        Address::repeat_byte(0x01)
    }

    fn protocol_name(&self) -> &str {
        "Token"
    }

    fn action_type(&self) -> ActionType {
        ActionType::Transfer
    }

    fn execute(
        &self,
        account: &mut dyn SmartAccount,
        data: &Bytes,
        _strategy_id: u16,
    ) -> ActionResult {
        let (token, amount) = decode_token_call(data)?;
        account.credit(token, amount);
        Ok(())
    }
}

/// Moves `amount` of `token` into a pool: debits the token, credits the
/// pool-share token
pub struct DepositAction;

impl Action for DepositAction {
    fn address(&self) -> Address {
        Address::repeat_byte(0x02)
    }

    fn protocol_name(&self) -> &str {
        "Vault"
    }

    fn action_type(&self) -> ActionType {
        ActionType::Deposit
    }

    fn execute(
        &self,
        account: &mut dyn SmartAccount,
        data: &Bytes,
        _strategy_id: u16,
    ) -> ActionResult {
        let (token, amount) = decode_token_call(data)?;
        account.debit(token, amount)?;
        account.credit(pool_share(), amount);
        Ok(())
    }
}

/// Always fails with a fixed revert payload
pub struct FailingAction;

pub const FAIL_REVERT_DATA: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

impl Action for FailingAction {
    fn address(&self) -> Address {
        Address::repeat_byte(0x03)
    }

    fn protocol_name(&self) -> &str {
        "Broken"
    }

    fn action_type(&self) -> ActionType {
        ActionType::Custom
    }

    fn execute(
        &self,
        _account: &mut dyn SmartAccount,
        _data: &Bytes,
        _strategy_id: u16,
    ) -> ActionResult {
        Err(ActionError::new("pool is paused").with_revert_data(FAIL_REVERT_DATA.to_vec()))
    }
}

/// Bundle-aware action recording the expiry of the bundle it was handed
pub struct BridgeAction {
    pub seen_expiry: Arc<Mutex<Option<u64>>>,
    pub seen_signature_len: Arc<Mutex<Option<usize>>>,
}

impl Action for BridgeAction {
    fn address(&self) -> Address {
        Address::repeat_byte(0x04)
    }

    fn protocol_name(&self) -> &str {
        "Bridge"
    }

    fn action_type(&self) -> ActionType {
        ActionType::Bridge
    }

    fn bundle_aware(&self) -> bool {
        true
    }

    fn execute(
        &self,
        _account: &mut dyn SmartAccount,
        _data: &Bytes,
        _strategy_id: u16,
    ) -> ActionResult {
        Err(ActionError::new("bridge requires bundle context"))
    }

    fn execute_in_bundle(
        &self,
        _account: &mut dyn SmartAccount,
        _data: &Bytes,
        bundle: &Bundle,
        signature: &[u8],
        _strategy_id: u16,
    ) -> ActionResult {
        *self.seen_expiry.lock().unwrap() = Some(bundle.expiry);
        *self.seen_signature_len.lock().unwrap() = Some(signature.len());
        Ok(())
    }
}

/// Oracle quoting a fixed price per gas unit, or failing on demand
pub struct FixedOracle {
    pub price_per_gas: U256,
    pub fail: bool,
}

impl PriceOracle for FixedOracle {
    fn quote_gas(&self, _token: Address, gas_used: u64) -> Result<U256> {
        if self.fail {
            return Err(Error::Oracle("feed offline".to_string()));
        }
        Ok(self.price_per_gas * U256::from(gas_used))
    }
}

/// Meter whose budget shrinks by a fixed step per reading
pub struct StepMeter {
    remaining: AtomicU64,
    step: u64,
}

impl StepMeter {
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            remaining: AtomicU64::new(start),
            step,
        }
    }
}

impl GasMeter for StepMeter {
    fn gas_left(&self) -> u64 {
        let current = self.remaining.load(Ordering::SeqCst);
        let next = current.saturating_sub(self.step);
        self.remaining.store(next, Ordering::SeqCst);
        current
    }
}

/// Registered action ids, shared by every harness
pub struct ActionIds {
    pub pull: ActionId,
    pub deposit: ActionId,
    pub fail: ActionId,
    pub bridge: ActionId,
}

/// One module deployment plus the account and signer it serves
pub struct Harness {
    pub module: BundleModule<Arc<StaticRegistry>>,
    pub account: LocalAccount,
    pub signer: PrivateKeySigner,
    pub ids: ActionIds,
    pub bridged_expiry: Arc<Mutex<Option<u64>>>,
    pub bridged_signature_len: Arc<Mutex<Option<usize>>>,
}

impl Harness {
    pub fn new(chain_id: u64) -> Self {
        Self::with_signer(chain_id, PrivateKeySigner::random())
    }

    pub fn with_signer(chain_id: u64, signer: PrivateKeySigner) -> Self {
        let bridged_expiry = Arc::new(Mutex::new(None));
        let bridged_signature_len = Arc::new(Mutex::new(None));

        let mut registry = StaticRegistry::new();
        let ids = ActionIds {
            pull: registry.register_named("PullToken", Box::new(PullTokenAction)),
            deposit: registry.register_named("VaultDeposit", Box::new(DepositAction)),
            fail: registry.register_named("Broken", Box::new(FailingAction)),
            bridge: registry.register_named(
                "Bridge",
                Box::new(BridgeAction {
                    seen_expiry: bridged_expiry.clone(),
                    seen_signature_len: bridged_signature_len.clone(),
                }),
            ),
        };

        let config = EngineConfig::new(chain_id).with_fee_recipient(fee_recipient());
        let module = BundleModule::new(config, Arc::new(registry));
        let account = LocalAccount::new(account_address()).with_owner(signer.address());

        Self {
            module,
            account,
            signer,
            ids,
            bridged_expiry,
            bridged_signature_len,
        }
    }

    /// Signs `bundle` for this harness's account under the module domain
    pub async fn sign(&self, bundle: &Bundle) -> Bytes {
        sign_bundle(
            &self.signer,
            &self.module.config().domain,
            self.account.address(),
            bundle,
        )
        .await
        .expect("signing failed")
    }

    /// Submits `bundle` as the test relayer with no attached value
    pub fn execute(&mut self, bundle: &Bundle, signature: &Bytes) -> Result<BundleReceipt> {
        self.module
            .execute_bundle(&mut self.account, bundle, signature, relayer(), U256::ZERO)
    }

    /// Wires in a refund oracle and gas meter
    pub fn with_refund_rig(
        mut self,
        oracle: Box<dyn PriceOracle + Send + Sync>,
        meter: Box<dyn GasMeter + Send + Sync>,
    ) -> Self {
        self.module = self.module.with_price_oracle(oracle).with_gas_meter(meter);
        self
    }
}
