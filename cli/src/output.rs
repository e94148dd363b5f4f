use alloy::primitives::{Address, Bytes, B256};
use serde::Serialize;

#[derive(Serialize)]
pub struct HashOutput {
    pub account: Address,
    pub domain_separator: B256,
    pub bundle_hash: B256,
    pub digest: B256,
}

impl HashOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Account: {}", self.account);
            println!("Domain Separator: {}", self.domain_separator);
            println!("Bundle Hash: {}", self.bundle_hash);
            println!("Digest: {}", self.digest);
        }
    }
}

#[derive(Serialize)]
pub struct SignOutput {
    pub signer: Address,
    pub digest: B256,
    pub signature: Bytes,
}

impl SignOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Signer: {}", self.signer);
            println!("Digest: {}", self.digest);
            println!("Signature: {}", self.signature);
        }
    }
}

#[derive(Serialize)]
pub struct VerifyOutput {
    pub digest: B256,
    pub recovered_signer: Address,
}

impl VerifyOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Digest: {}", self.digest);
            println!("Recovered Signer: {}", self.recovered_signer);
        }
    }
}

#[derive(Serialize)]
pub struct EncodeOutput {
    pub call_data: Bytes,
    pub wrapped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<u16>,
}

impl EncodeOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Call Data: {}", self.call_data);
            if let Some(strategy_id) = self.strategy_id {
                println!("Strategy Id: {}", strategy_id);
            }
        }
    }
}
