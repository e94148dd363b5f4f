//! Signature generation and recovery for bundles

mod ecdsa;

pub use ecdsa::{recover_signer, sign_bundle, sign_digest, validate_signature};
