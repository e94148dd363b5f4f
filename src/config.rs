//! Engine and signing-domain configuration

use alloy::primitives::{keccak256, Address, B256};

/// Default EIP-712 domain name
pub const DEFAULT_DOMAIN_NAME: &str = "BundleModule";

/// Default EIP-712 domain version
pub const DEFAULT_DOMAIN_VERSION: &str = "1";

/// EIP-712 domain parameters shared by signer and verifier.
///
/// The domain binds to the *target smart account* as its verifying
/// contract, so the same module code serves many accounts without
/// signature collisions between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainConfig {
    /// Domain name shown in wallet signing prompts
    pub name: String,
    /// Domain version
    pub version: String,
    /// Domain salt
    pub salt: B256,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DOMAIN_NAME.to_string(),
            version: DEFAULT_DOMAIN_VERSION.to_string(),
            salt: keccak256(b"bundle-rs.domain.salt"),
        }
    }
}

impl DomainConfig {
    /// Creates a domain with a custom name and version
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Sets the domain salt
    pub fn with_salt(mut self, salt: B256) -> Self {
        self.salt = salt;
        self
    }
}

/// Configuration of one bundle module deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Chain this module executes on; the selector the chain-sequence scan
    /// matches against
    pub chain_id: u64,
    /// Signing-domain parameters
    pub domain: DomainConfig,
    /// Recipient for gas refunds directed at the fee sink
    pub fee_recipient: Address,
}

impl EngineConfig {
    /// Creates a configuration for the given chain with default domain
    /// parameters and no fee recipient
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            domain: DomainConfig::default(),
            fee_recipient: Address::ZERO,
        }
    }

    /// Sets the signing-domain parameters
    pub fn with_domain(mut self, domain: DomainConfig) -> Self {
        self.domain = domain;
        self
    }

    /// Sets the fee recipient for refund settlement
    pub fn with_fee_recipient(mut self, fee_recipient: Address) -> Self {
        self.fee_recipient = fee_recipient;
        self
    }
}
