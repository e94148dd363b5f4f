use alloy::primitives::{keccak256, Bytes};
use alloy_dyn_abi::{DynSolType, DynSolValue};
use color_eyre::eyre::{eyre, Result};

/// Parses a function signature and encodes it with arguments
/// e.g., "deposit(address,uint256)" with args ["0x...", "1000"]
pub fn encode_function_call(sig: &str, args: &[String]) -> Result<Bytes> {
    let selector = compute_selector(sig)?;
    let param_types = parse_param_types(sig)?;

    if param_types.len() != args.len() {
        return Err(eyre!(
            "Expected {} arguments, got {}",
            param_types.len(),
            args.len()
        ));
    }

    let mut values = Vec::with_capacity(args.len());
    for (param, arg) in param_types.iter().zip(args) {
        let sol_type = DynSolType::parse(param)
            .map_err(|e| eyre!("Invalid parameter type '{}': {}", param, e))?;
        let value = sol_type
            .coerce_str(arg)
            .map_err(|e| eyre!("Invalid argument '{}' for {}: {}", arg, param, e))?;
        values.push(value);
    }

    let mut calldata = selector.to_vec();
    calldata.extend(DynSolValue::Tuple(values).abi_encode_params());

    Ok(Bytes::from(calldata))
}

/// Computes the 4-byte function selector from signature
fn compute_selector(sig: &str) -> Result<[u8; 4]> {
    // Normalize the signature (remove spaces)
    let sig = sig.replace(' ', "");
    let hash = keccak256(sig.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    Ok(selector)
}

/// Extracts parameter types from a function signature
/// e.g., "deposit(address,uint256)" -> ["address", "uint256"]
fn parse_param_types(sig: &str) -> Result<Vec<String>> {
    let sig = sig.trim();

    let open_paren = sig
        .find('(')
        .ok_or_else(|| eyre!("Invalid signature: missing '('"))?;
    let close_paren = sig
        .rfind(')')
        .ok_or_else(|| eyre!("Invalid signature: missing ')'"))?;

    if close_paren <= open_paren {
        return Err(eyre!("Invalid signature format"));
    }

    let params_str = &sig[open_paren + 1..close_paren];

    if params_str.is_empty() {
        return Ok(Vec::new());
    }

    split_params(params_str)
}

/// Splits parameter string handling nested parentheses
fn split_params(params_str: &str) -> Result<Vec<String>> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut depth = 0;

    for c in params_str.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => {
                let param = current.trim().to_string();
                if !param.is_empty() {
                    params.push(param);
                }
                current = String::new();
            }
            _ => {
                current.push(c);
            }
        }
    }

    let param = current.trim().to_string();
    if !param.is_empty() {
        params.push(param);
    }

    Ok(params)
}
