use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bundle")]
#[command(about = "Signer tooling for EIP-712 action bundles", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the signing digest of a bundle for an account
    Hash(HashArgs),

    /// Sign a bundle for an account
    Sign(SignArgs),

    /// Recover the signer of a bundle signature
    Verify(VerifyArgs),

    /// Encode action call data from a function signature
    Encode(EncodeArgs),
}

#[derive(Parser, Clone)]
pub struct HashArgs {
    /// Path to the bundle JSON file
    #[arg(value_name = "BUNDLE")]
    pub bundle: String,

    /// Target smart account address
    #[arg(long, env = "BUNDLE_ACCOUNT")]
    pub account: String,

    #[command(flatten)]
    pub domain: DomainArgs,
}

#[derive(Parser, Clone)]
pub struct SignArgs {
    /// Path to the bundle JSON file
    #[arg(value_name = "BUNDLE")]
    pub bundle: String,

    /// Target smart account address
    #[arg(long, env = "BUNDLE_ACCOUNT")]
    pub account: String,

    #[command(flatten)]
    pub domain: DomainArgs,

    #[command(flatten)]
    pub wallet: WalletArgs,
}

#[derive(Parser, Clone)]
pub struct VerifyArgs {
    /// Path to the bundle JSON file
    #[arg(value_name = "BUNDLE")]
    pub bundle: String,

    /// Signature as hex (65 bytes, r || s || v)
    #[arg(value_name = "SIGNATURE")]
    pub signature: String,

    /// Target smart account address
    #[arg(long, env = "BUNDLE_ACCOUNT")]
    pub account: String,

    #[command(flatten)]
    pub domain: DomainArgs,
}

#[derive(Parser, Clone)]
pub struct EncodeArgs {
    /// Function signature (e.g., "deposit(address,uint256)")
    #[arg(value_name = "SIG")]
    pub sig: String,

    /// Function arguments
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Strategy id folded into the call envelope
    #[arg(long, default_value = "0")]
    pub strategy_id: u16,

    /// Emit the raw calldata without the (bytes,uint16) envelope
    #[arg(long)]
    pub raw: bool,
}

#[derive(Parser, Clone)]
pub struct DomainArgs {
    /// EIP-712 domain name
    #[arg(long, default_value = bundle_rs::config::DEFAULT_DOMAIN_NAME)]
    pub domain_name: String,

    /// EIP-712 domain version
    #[arg(long, default_value = bundle_rs::config::DEFAULT_DOMAIN_VERSION)]
    pub domain_version: String,

    /// EIP-712 domain salt as hex (32 bytes)
    #[arg(long)]
    pub domain_salt: Option<String>,
}

#[derive(Parser, Clone)]
pub struct WalletArgs {
    /// Raw private key
    #[arg(long, env = "PRIVATE_KEY")]
    pub private_key: Option<String>,

    /// Prompt for private key interactively
    #[arg(short, long)]
    pub interactive: bool,
}
