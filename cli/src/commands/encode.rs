use alloy::primitives::Bytes;
use alloy::sol_types::SolValue;
use color_eyre::eyre::Result;

use crate::cli::EncodeArgs;
use crate::output::EncodeOutput;
use crate::sig_parser::encode_function_call;

pub fn run(args: EncodeArgs, json: bool) -> Result<()> {
    let call_data = encode_function_call(&args.sig, &args.args)?;

    // The executor unwraps the (bytes, uint16) envelope; --raw skips it
    // for actions still consuming bare calldata
    let output = if args.raw {
        EncodeOutput {
            call_data,
            wrapped: false,
            strategy_id: None,
        }
    } else {
        EncodeOutput {
            call_data: Bytes::from((call_data, args.strategy_id).abi_encode()),
            wrapped: true,
            strategy_id: Some(args.strategy_id),
        }
    };

    output.print(json);

    Ok(())
}
