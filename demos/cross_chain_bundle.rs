//! One signature, two chains: the same bundle executes its chain-local
//! slice on each module independently.
//!
//! Run with: cargo run --example cross_chain_bundle

use std::sync::Arc;

use alloy::signers::local::PrivateKeySigner;
use bundle_rs::{
    sign_bundle, Action, ActionDefinition, ActionResult, ActionType, Address, Bundle,
    BundleModule, Bytes, ChainSequence, EngineConfig, LocalAccount, Sequence, SmartAccount,
    StaticRegistry, U256,
};

/// Credits one unit of a marker token per invocation
struct Ping;

impl Action for Ping {
    fn address(&self) -> Address {
        Address::repeat_byte(0x01)
    }

    fn protocol_name(&self) -> &str {
        "Ping"
    }

    fn action_type(&self) -> ActionType {
        ActionType::Custom
    }

    fn execute(
        &self,
        account: &mut dyn SmartAccount,
        _data: &Bytes,
        _strategy_id: u16,
    ) -> ActionResult {
        account.credit(Address::repeat_byte(0xee), U256::from(1));
        Ok(())
    }
}

fn deployment(chain_id: u64) -> (BundleModule<Arc<StaticRegistry>>, bundle_rs::ActionId) {
    let mut registry = StaticRegistry::new();
    let ping = registry.register_named("Ping", Box::new(Ping));
    (
        BundleModule::new(EngineConfig::new(chain_id), Arc::new(registry)),
        ping,
    )
}

#[tokio::main]
async fn main() -> bundle_rs::Result<()> {
    let signer = PrivateKeySigner::random();
    let account_address = Address::repeat_byte(0x5a);

    // Independent module deployments for chains 1 and 10
    let (mut module_one, ping_one) = deployment(1);
    let (mut module_ten, ping_ten) = deployment(10);

    let mut account_one = LocalAccount::new(account_address).with_owner(signer.address());
    let mut account_ten = LocalAccount::new(account_address).with_owner(signer.address());

    let step = |ping| {
        Sequence::builder("ping")
            .add(ActionDefinition::new("Ping", ActionType::Custom), ping, Bytes::new())
            .build()
    };
    let expiry = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        + 3600;
    let bundle = Bundle::new(
        expiry,
        vec![
            ChainSequence::new(1, 0, step(ping_one)),
            ChainSequence::new(10, 0, step(ping_ten)),
        ],
    );

    // The domain chain id is fixed, so one signature covers both chains
    let signature =
        sign_bundle(&signer, &module_one.config().domain, account_address, &bundle).await?;

    let relayer = Address::repeat_byte(0x99);
    let one = module_one.execute_bundle(&mut account_one, &bundle, &signature, relayer, U256::ZERO)?;
    let ten = module_ten.execute_bundle(&mut account_ten, &bundle, &signature, relayer, U256::ZERO)?;

    println!("chain {} consumed nonce {}", one.chain_id, one.sequence_nonce);
    println!("chain {} consumed nonce {}", ten.chain_id, ten.sequence_nonce);

    // Replays fail per chain, independently
    let replay = module_one.execute_bundle(&mut account_one, &bundle, &signature, relayer, U256::ZERO);
    println!("replay on chain 1: {}", replay.unwrap_err());

    Ok(())
}
