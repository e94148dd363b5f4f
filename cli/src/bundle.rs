use std::fs;
use std::path::Path;

use bundle_rs::{Bundle, DomainConfig};
use color_eyre::eyre::{eyre, Result};

use crate::cli::DomainArgs;

/// Loads and validates a bundle JSON file.
///
/// Expected shape (field names match the library's serde derives):
/// ```json
/// {
///   "expiry": 1760000000,
///   "sequences": [{
///     "chain_id": 1,
///     "sequence_nonce": 0,
///     "sequence": {
///       "name": "enter position",
///       "actions": [{"protocol_name": "Token", "action_type": "Transfer"}],
///       "action_ids": ["0xbf4af826"],
///       "call_data": ["0x..."]
///     }
///   }]
/// }
/// ```
pub fn load_bundle(path: &str) -> Result<Bundle> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(eyre!("Bundle file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)?;
    parse_bundle(&content)
}

/// Parses bundle JSON content and checks the parallel arrays
pub fn parse_bundle(content: &str) -> Result<Bundle> {
    let bundle: Bundle =
        serde_json::from_str(content).map_err(|e| eyre!("Invalid bundle JSON: {}", e))?;

    for (i, chain_sequence) in bundle.sequences.iter().enumerate() {
        chain_sequence
            .sequence
            .check_lengths()
            .map_err(|e| eyre!("Sequence {} ({}): {}", i, chain_sequence.sequence.name, e))?;
    }

    Ok(bundle)
}

/// Builds a domain config from CLI arguments
pub fn domain_from_args(args: &DomainArgs) -> Result<DomainConfig> {
    let DomainArgs {
        domain_name,
        domain_version,
        domain_salt,
    } = args;

    let mut domain = DomainConfig::new(domain_name.clone(), domain_version.clone());
    if let Some(salt) = domain_salt {
        let salt = salt.strip_prefix("0x").unwrap_or(salt);
        let bytes = hex::decode(salt).map_err(|e| eyre!("Invalid domain salt: {}", e))?;
        if bytes.len() != 32 {
            return Err(eyre!("Domain salt must be 32 bytes, got {}", bytes.len()));
        }
        domain = domain.with_salt(bundle_rs::B256::from_slice(&bytes));
    }
    Ok(domain)
}
