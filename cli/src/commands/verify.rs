use alloy::primitives::Address;
use color_eyre::eyre::{eyre, Result};

use bundle_rs::{bundle_digest, recover_signer};

use crate::bundle::{domain_from_args, load_bundle};
use crate::cli::VerifyArgs;
use crate::output::VerifyOutput;

pub fn run(args: VerifyArgs, json: bool) -> Result<()> {
    let bundle = load_bundle(&args.bundle)?;
    let account: Address = args.account.parse()?;
    let domain = domain_from_args(&args.domain)?;

    let signature = parse_signature(&args.signature)?;
    let digest = bundle_digest(&domain, account, &bundle);
    let recovered_signer =
        recover_signer(digest, &signature).map_err(|e| eyre!("Recovery failed: {}", e))?;

    let output = VerifyOutput {
        digest,
        recovered_signer,
    };

    output.print(json);

    Ok(())
}

fn parse_signature(raw: &str) -> Result<Vec<u8>> {
    let raw = raw.trim();
    let raw = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(raw).map_err(|e| eyre!("Invalid signature hex: {}", e))?;
    if bytes.len() != 65 {
        return Err(eyre!("Signature must be 65 bytes, got {}", bytes.len()));
    }
    Ok(bytes)
}
