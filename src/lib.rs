//! # bundle-rs
//!
//! A verification and execution engine for EIP-712 signed action bundles
//! against Safe-style smart accounts.
//!
//! A user signs, once, a single typed-data bundle describing actions to
//! run on one or more chains. Any relayer can then submit that signature
//! to the module serving each target chain, which authorizes and runs
//! exactly the chain-local slice of the bundle - exactly once per chain,
//! in order, with per-action identity checks against a trusted registry.
//!
//! ## Features
//!
//! - Nested EIP-712 struct hashing with per-account domain binding
//! - Per-(account, chain) sequence nonces as the replay-protection
//!   primitive
//! - Live owner checks: changing the account's owner set invalidates
//!   pending bundles
//! - Capability-dispatched action execution (plain or bundle-context)
//! - All-or-nothing dispatch via an explicit checkpoint/revert protocol
//! - Best-effort gas refund settlement bounded by a signer-set ceiling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bundle_rs::{
//!     sign_bundle, ActionDefinition, ActionId, ActionType, Bundle, BundleModule,
//!     ChainSequence, EngineConfig, LocalAccount, Sequence, StaticRegistry,
//! };
//! use std::sync::Arc;
//!
//! // Wire a module for chain 1 against a registry of trusted actions
//! let mut registry = StaticRegistry::new();
//! let pull = registry.register_named("PullToken", Box::new(pull_token_action));
//! let mut module = BundleModule::new(EngineConfig::new(1), Arc::new(registry));
//!
//! // Build and sign a one-chain bundle
//! let sequence = Sequence::builder("enter position")
//!     .add(ActionDefinition::new("Token", ActionType::Transfer), pull, call_data)
//!     .build();
//! let bundle = Bundle::new(expiry, vec![ChainSequence::new(1, 0, sequence)]);
//! let signature = sign_bundle(&signer, &module.config().domain, safe.address(), &bundle).await?;
//!
//! // Any relayer submits it
//! let receipt = module.execute_bundle(&mut safe, &bundle, &signature, relayer, value)?;
//! assert_eq!(module.sequence_nonce(safe.address()), 1);
//! ```

pub mod account;
pub mod action;
pub mod config;
pub mod encoding;
pub mod error;
pub mod executor;
pub mod module;
pub mod nonce;
pub mod refund;
pub mod registry;
pub mod signing;
pub mod types;

// Re-export main types at crate root
pub use account::{Checkpoint, LocalAccount, SmartAccount};
pub use action::{Action, ActionError, ActionResult};
pub use config::{DomainConfig, EngineConfig};
pub use encoding::{bundle_digest, domain_separator, DOMAIN_CHAIN_ID};
pub use error::{Error, Result};
pub use executor::{BundleContext, SequenceExecutor};
pub use module::{BundleModule, BundleReceipt};
pub use nonce::NonceStore;
pub use refund::{GasMeter, NoopGasMeter, PriceOracle, RefundPayment};
pub use registry::{ActionRegistry, StaticRegistry};
pub use signing::{recover_signer, sign_bundle, sign_digest, validate_signature};
pub use types::{
    ActionDefinition, ActionId, ActionType, Bundle, ChainSequence, ExecutorSequence,
    RefundRecipient, Sequence, SequenceBuilder,
};

// Re-export alloy types that are commonly used
pub use alloy::primitives::{Address, Bytes, B256, U256};
