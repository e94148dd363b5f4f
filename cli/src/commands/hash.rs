use alloy::primitives::Address;
use color_eyre::eyre::Result;

use bundle_rs::encoding::{bundle_digest, domain_separator, hash_bundle};

use crate::bundle::{domain_from_args, load_bundle};
use crate::cli::HashArgs;
use crate::output::HashOutput;

pub fn run(args: HashArgs, json: bool) -> Result<()> {
    let bundle = load_bundle(&args.bundle)?;
    let account: Address = args.account.parse()?;
    let domain = domain_from_args(&args.domain)?;

    let output = HashOutput {
        account,
        domain_separator: domain_separator(&domain, account),
        bundle_hash: hash_bundle(&bundle),
        digest: bundle_digest(&domain, account, &bundle),
    };

    output.print(json);

    Ok(())
}
