use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use color_eyre::eyre::Result;

use bundle_rs::{bundle_digest, sign_bundle};

use crate::bundle::{domain_from_args, load_bundle};
use crate::cli::SignArgs;
use crate::output::SignOutput;
use crate::wallet::create_signer;

pub async fn run(args: SignArgs, json: bool) -> Result<()> {
    let bundle = load_bundle(&args.bundle)?;
    let account: Address = args.account.parse()?;
    let domain = domain_from_args(&args.domain)?;

    let signer: PrivateKeySigner = create_signer(&args.wallet)?;
    let signature = sign_bundle(&signer, &domain, account, &bundle).await?;

    let output = SignOutput {
        signer: signer.address(),
        digest: bundle_digest(&domain, account, &bundle),
        signature,
    };

    output.print(json);

    Ok(())
}
