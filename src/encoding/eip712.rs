//! EIP-712 hashing for bundles
//!
//! Struct hashes compose bottom-up: ActionDefinition → Sequence →
//! ChainSequence → Bundle, then
//! `digest = keccak256(0x1901 ‖ domainSeparator ‖ bundleHash)`.
//! Array fields are hashed element-wise and the resulting hash array is
//! hashed again, which keeps the typed-data strings bounded and the cost
//! linear in element count.

use std::sync::LazyLock;

use alloy::primitives::{keccak256, Address, B256, U256};

use crate::config::DomainConfig;
use crate::types::{ActionDefinition, Bundle, ChainSequence, Sequence};

/// Chain id folded into every domain separator, irrespective of the chain
/// actually executing.
///
/// One signature must be valid-looking on every chain; the cross-chain
/// safety net is the explicit `chain_id` inside each [`ChainSequence`]
/// plus the nonce check, never the domain. Treating this constant as a
/// security boundary would be a bug.
pub const DOMAIN_CHAIN_ID: u64 = 1;

/// EIP-712 type string for the domain separator
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract,bytes32 salt)";

/// EIP-712 type string for ActionDefinition
pub const ACTION_DEFINITION_TYPE: &str = "ActionDefinition(string protocolName,uint8 actionType)";

/// EIP-712 type string for Sequence, with referenced types appended
pub const SEQUENCE_TYPE: &str = "Sequence(string name,ActionDefinition[] actions,bytes4[] actionIds,bytes[] callData)ActionDefinition(string protocolName,uint8 actionType)";

/// EIP-712 type string for ChainSequence, with referenced types appended
pub const CHAIN_SEQUENCE_TYPE: &str = "ChainSequence(uint256 chainId,uint256 sequenceNonce,Sequence sequence,bool enableGasRefund,address refundToken,uint256 maxRefundAmount,uint8 refundRecipient)ActionDefinition(string protocolName,uint8 actionType)Sequence(string name,ActionDefinition[] actions,bytes4[] actionIds,bytes[] callData)";

/// EIP-712 type string for Bundle, with referenced types appended
pub const BUNDLE_TYPE: &str = "Bundle(uint256 expiry,ChainSequence[] sequences)ActionDefinition(string protocolName,uint8 actionType)ChainSequence(uint256 chainId,uint256 sequenceNonce,Sequence sequence,bool enableGasRefund,address refundToken,uint256 maxRefundAmount,uint8 refundRecipient)Sequence(string name,ActionDefinition[] actions,bytes4[] actionIds,bytes[] callData)";

static DOMAIN_TYPEHASH: LazyLock<B256> = LazyLock::new(|| keccak256(DOMAIN_TYPE));
static ACTION_DEFINITION_TYPEHASH: LazyLock<B256> =
    LazyLock::new(|| keccak256(ACTION_DEFINITION_TYPE));
static SEQUENCE_TYPEHASH: LazyLock<B256> = LazyLock::new(|| keccak256(SEQUENCE_TYPE));
static CHAIN_SEQUENCE_TYPEHASH: LazyLock<B256> = LazyLock::new(|| keccak256(CHAIN_SEQUENCE_TYPE));
static BUNDLE_TYPEHASH: LazyLock<B256> = LazyLock::new(|| keccak256(BUNDLE_TYPE));

/// Encodes an address as a left-padded 32-byte word
fn address_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}

/// Encodes a u64 as a big-endian uint256 word
fn uint_word(value: u64) -> [u8; 32] {
    U256::from(value).to_be_bytes::<32>()
}

/// Encodes a u8 as a left-padded word
fn byte_word(value: u8) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[31] = value;
    word
}

/// Computes the struct hash of one ActionDefinition
pub fn hash_action_definition(definition: &ActionDefinition) -> B256 {
    let mut encoded = Vec::with_capacity(96);
    encoded.extend_from_slice(ACTION_DEFINITION_TYPEHASH.as_slice());
    encoded.extend_from_slice(keccak256(definition.protocol_name.as_bytes()).as_slice());
    encoded.extend_from_slice(&byte_word(definition.action_type.as_u8()));
    keccak256(&encoded)
}

/// Computes the struct hash of a Sequence.
///
/// Each parallel array is reduced to a single word first: struct arrays
/// concatenate element struct hashes, `bytes4[]` right-pads each element
/// to a word, and `bytes[]` hashes each element before concatenation.
pub fn hash_sequence(sequence: &Sequence) -> B256 {
    let mut action_hashes = Vec::with_capacity(32 * sequence.actions.len());
    for definition in &sequence.actions {
        action_hashes.extend_from_slice(hash_action_definition(definition).as_slice());
    }

    let mut id_words = Vec::with_capacity(32 * sequence.action_ids.len());
    for action_id in &sequence.action_ids {
        let mut word = [0u8; 32];
        word[..4].copy_from_slice(action_id.as_slice());
        id_words.extend_from_slice(&word);
    }

    let mut data_hashes = Vec::with_capacity(32 * sequence.call_data.len());
    for data in &sequence.call_data {
        data_hashes.extend_from_slice(keccak256(data).as_slice());
    }

    let mut encoded = Vec::with_capacity(160);
    encoded.extend_from_slice(SEQUENCE_TYPEHASH.as_slice());
    encoded.extend_from_slice(keccak256(sequence.name.as_bytes()).as_slice());
    encoded.extend_from_slice(keccak256(&action_hashes).as_slice());
    encoded.extend_from_slice(keccak256(&id_words).as_slice());
    encoded.extend_from_slice(keccak256(&data_hashes).as_slice());
    keccak256(&encoded)
}

/// Computes the struct hash of a ChainSequence
pub fn hash_chain_sequence(chain_sequence: &ChainSequence) -> B256 {
    let mut encoded = Vec::with_capacity(256);
    encoded.extend_from_slice(CHAIN_SEQUENCE_TYPEHASH.as_slice());
    encoded.extend_from_slice(&uint_word(chain_sequence.chain_id));
    encoded.extend_from_slice(&uint_word(chain_sequence.sequence_nonce));
    encoded.extend_from_slice(hash_sequence(&chain_sequence.sequence).as_slice());
    encoded.extend_from_slice(&byte_word(chain_sequence.enable_gas_refund as u8));
    encoded.extend_from_slice(&address_word(chain_sequence.refund_token));
    encoded.extend_from_slice(&chain_sequence.max_refund_amount.to_be_bytes::<32>());
    encoded.extend_from_slice(&byte_word(chain_sequence.refund_recipient.as_u8()));
    keccak256(&encoded)
}

/// Computes the struct hash of a Bundle
pub fn hash_bundle(bundle: &Bundle) -> B256 {
    let mut sequence_hashes = Vec::with_capacity(32 * bundle.sequences.len());
    for chain_sequence in &bundle.sequences {
        sequence_hashes.extend_from_slice(hash_chain_sequence(chain_sequence).as_slice());
    }

    let mut encoded = Vec::with_capacity(96);
    encoded.extend_from_slice(BUNDLE_TYPEHASH.as_slice());
    encoded.extend_from_slice(&uint_word(bundle.expiry));
    encoded.extend_from_slice(keccak256(&sequence_hashes).as_slice());
    keccak256(&encoded)
}

/// Computes the domain separator for an account.
///
/// The verifying contract is the target smart account itself, and the
/// chain id is the fixed [`DOMAIN_CHAIN_ID`].
pub fn domain_separator(domain: &DomainConfig, account: Address) -> B256 {
    let mut encoded = Vec::with_capacity(192);
    encoded.extend_from_slice(DOMAIN_TYPEHASH.as_slice());
    encoded.extend_from_slice(keccak256(domain.name.as_bytes()).as_slice());
    encoded.extend_from_slice(keccak256(domain.version.as_bytes()).as_slice());
    encoded.extend_from_slice(&uint_word(DOMAIN_CHAIN_ID));
    encoded.extend_from_slice(&address_word(account));
    encoded.extend_from_slice(domain.salt.as_slice());
    keccak256(&encoded)
}

/// Computes the final digest a signer signs and a verifier recovers from
///
/// digest = keccak256("\x19\x01" || domainSeparator || bundleHash)
pub fn bundle_digest(domain: &DomainConfig, account: Address, bundle: &Bundle) -> B256 {
    let mut encoded = Vec::with_capacity(66);
    encoded.extend_from_slice(&[0x19, 0x01]);
    encoded.extend_from_slice(domain_separator(domain, account).as_slice());
    encoded.extend_from_slice(hash_bundle(bundle).as_slice());
    keccak256(&encoded)
}
