//! Build, sign and execute a two-action bundle against a local account.
//!
//! Run with: cargo run --example single_chain_bundle

use std::sync::Arc;

use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolValue;
use bundle_rs::{
    sign_bundle, Action, ActionDefinition, ActionError, ActionResult, ActionType, Address,
    Bundle, BundleModule, Bytes, ChainSequence, EngineConfig, LocalAccount, Sequence,
    SmartAccount, StaticRegistry, U256,
};

/// Credits `(token, amount)` decoded from calldata - a transfer-in
struct PullToken;

impl Action for PullToken {
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
        let (token, amount) = <(Address, U256)>::abi_decode(data)
            .map_err(|e| ActionError::new(format!("bad calldata: {e}")))?;
        account.credit(token, amount);
        Ok(())
    }
}

/// Moves `(token, amount)` into a vault: debit the token, credit shares
struct VaultDeposit;

impl Action for VaultDeposit {
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
        let (token, amount) = <(Address, U256)>::abi_decode(data)
            .map_err(|e| ActionError::new(format!("bad calldata: {e}")))?;
        account.debit(token, amount)?;
        account.credit(shares(), amount);
        Ok(())
    }
}

fn shares() -> Address {
    Address::repeat_byte(0xb2)
}

fn token_call(token: Address, amount: U256) -> Bytes {
    // (bytes innerData, uint16 strategyId) envelope over (token, amount)
    Bytes::from((Bytes::from((token, amount).abi_encode()), 0u16).abi_encode())
}

#[tokio::main]
async fn main() -> bundle_rs::Result<()> {
    let usdc = Address::repeat_byte(0xa1);

    // Trusted action set
    let mut registry = StaticRegistry::new();
    let pull = registry.register_named("PullToken", Box::new(PullToken));
    let deposit = registry.register_named("VaultDeposit", Box::new(VaultDeposit));

    // Module deployment for chain 31337
    let mut module = BundleModule::new(EngineConfig::new(31337), Arc::new(registry));

    // The smart account and its owner
    let signer = PrivateKeySigner::random();
    let mut account = LocalAccount::new(Address::repeat_byte(0x5a)).with_owner(signer.address());

    // Sign once: pull 100 USDC in, deposit 100 USDC into the vault
    let amount = U256::from(100);
    let sequence = Sequence::builder("enter position")
        .add(
            ActionDefinition::new("Token", ActionType::Transfer),
            pull,
            token_call(usdc, amount),
        )
        .add(
            ActionDefinition::new("Vault", ActionType::Deposit),
            deposit,
            token_call(usdc, amount),
        )
        .build();
    let expiry = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        + 3600;
    let bundle = Bundle::new(expiry, vec![ChainSequence::new(31337, 0, sequence)]);

    let signature = sign_bundle(&signer, &module.config().domain, account.address(), &bundle).await?;

    // Any relayer submits it
    let relayer = Address::repeat_byte(0x99);
    let receipt = module.execute_bundle(&mut account, &bundle, &signature, relayer, U256::ZERO)?;

    println!("executed sequence at nonce {}", receipt.sequence_nonce);
    println!("vault shares: {}", account.balance_of(shares()));
    println!("next nonce: {}", module.sequence_nonce(account.address()));

    Ok(())
}
