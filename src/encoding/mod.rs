//! EIP-712 encoding of bundles for signing and verification

mod eip712;

pub use eip712::{
    bundle_digest, domain_separator, hash_action_definition, hash_bundle, hash_chain_sequence,
    hash_sequence, ACTION_DEFINITION_TYPE, BUNDLE_TYPE, CHAIN_SEQUENCE_TYPE, DOMAIN_CHAIN_ID,
    DOMAIN_TYPE, SEQUENCE_TYPE,
};
