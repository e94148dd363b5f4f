//! ECDSA signature generation and recovery for bundle digests

use alloy::primitives::{Address, Bytes, Signature, B256};
use alloy::signers::Signer;

use crate::config::DomainConfig;
use crate::encoding::bundle_digest;
use crate::error::{Error, Result};
use crate::types::Bundle;

/// Signs a digest and formats the signature as 65 bytes:
/// r (32 bytes) || s (32 bytes) || v (1 byte), with v adjusted to 27 or 28
pub async fn sign_digest<S: Signer>(signer: &S, digest: B256) -> Result<Bytes> {
    let signature = signer.sign_hash(&digest).await?;

    // v is a bool (y_parity) in alloy - true means odd (28), false means even (27)
    let v_byte = if signature.v() { 28u8 } else { 27u8 };

    let mut sig_bytes = Vec::with_capacity(65);
    sig_bytes.extend_from_slice(&signature.r().to_be_bytes::<32>());
    sig_bytes.extend_from_slice(&signature.s().to_be_bytes::<32>());
    sig_bytes.push(v_byte);

    Ok(Bytes::from(sig_bytes))
}

/// Computes the per-account digest of `bundle` and signs it
pub async fn sign_bundle<S: Signer>(
    signer: &S,
    domain: &DomainConfig,
    account: Address,
    bundle: &Bundle,
) -> Result<Bytes> {
    sign_digest(signer, bundle_digest(domain, account, bundle)).await
}

/// Validates that a signature is 65 bytes with a usable v value
pub fn validate_signature(signature: &[u8]) -> Result<()> {
    if signature.len() != 65 {
        return Err(Error::InvalidSignature(format!(
            "expected 65 bytes, got {}",
            signature.len()
        )));
    }

    let v = signature[64];
    if !matches!(v, 0 | 1 | 27 | 28) {
        return Err(Error::InvalidSignature(format!("invalid v value: {}", v)));
    }

    Ok(())
}

/// Recovers the signer address from a digest and a 65-byte signature.
///
/// A malformed signature, a failed recovery, or a recovery producing the
/// zero address all surface as [`Error::InvalidSignature`].
pub fn recover_signer(digest: B256, signature: &[u8]) -> Result<Address> {
    validate_signature(signature)?;

    let parsed = Signature::from_raw(signature)
        .map_err(|e| Error::InvalidSignature(e.to_string()))?;

    let recovered = parsed
        .recover_address_from_prehash(&digest)
        .map_err(|e| Error::InvalidSignature(e.to_string()))?;

    if recovered == Address::ZERO {
        return Err(Error::InvalidSignature("recovered zero address".to_string()));
    }

    Ok(recovered)
}
