//! Action identity types shared by signers, the registry, and the executor

use alloy::primitives::{keccak256, FixedBytes};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of an action, declared by the signer and reported live by the
/// resolved action itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ActionType {
    /// Deposit into a pool or vault
    Deposit = 0,
    /// Withdraw from a pool or vault
    Withdraw = 1,
    /// Token swap
    Swap = 2,
    /// Plain token transfer
    Transfer = 3,
    /// Fee collection
    Fee = 4,
    /// Cross-chain bridge step
    Bridge = 5,
    /// Anything else
    Custom = 6,
}

impl ActionType {
    /// Returns the type as the u8 value folded into the signed digest
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Creates an ActionType from a u8 value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ActionType::Deposit),
            1 => Some(ActionType::Withdraw),
            2 => Some(ActionType::Swap),
            3 => Some(ActionType::Transfer),
            4 => Some(ActionType::Fee),
            5 => Some(ActionType::Bridge),
            6 => Some(ActionType::Custom),
            _ => None,
        }
    }
}

impl From<ActionType> for u8 {
    fn from(action_type: ActionType) -> Self {
        action_type.as_u8()
    }
}

impl TryFrom<u8> for ActionType {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ActionType::from_u8(value).ok_or("Invalid action type value")
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionType::Deposit => "Deposit",
            ActionType::Withdraw => "Withdraw",
            ActionType::Swap => "Swap",
            ActionType::Transfer => "Transfer",
            ActionType::Fee => "Fee",
            ActionType::Bridge => "Bridge",
            ActionType::Custom => "Custom",
        };
        f.write_str(name)
    }
}

/// Four-byte identifier an action is registered under.
///
/// The registry is the only party that gives an id meaning; the id itself
/// carries no trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub FixedBytes<4>);

impl ActionId {
    /// Creates an ActionId from raw bytes
    pub fn new(bytes: [u8; 4]) -> Self {
        Self(FixedBytes(bytes))
    }

    /// Derives an id from a registration name: the first four bytes of
    /// `keccak256(name)`
    pub fn from_name(name: &str) -> Self {
        let hash = keccak256(name.as_bytes());
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&hash[..4]);
        Self::new(bytes)
    }

    /// Returns the id as a byte slice
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl From<[u8; 4]> for ActionId {
    fn from(bytes: [u8; 4]) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The declared identity of one step in a sequence.
///
/// This is what the signer believed would execute at that index; it is
/// checked against the live identity of the registry-resolved action and
/// never trusted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    /// Protocol the action belongs to (e.g. "AaveV3")
    pub protocol_name: String,
    /// Declared action category
    pub action_type: ActionType,
}

impl ActionDefinition {
    /// Creates a new ActionDefinition
    pub fn new(protocol_name: impl Into<String>, action_type: ActionType) -> Self {
        Self {
            protocol_name: protocol_name.into(),
            action_type,
        }
    }
}

impl fmt::Display for ActionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.protocol_name, self.action_type)
    }
}

/// Who receives a gas refund when a chain sequence enables one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum RefundRecipient {
    /// The relayer that submitted the bundle
    #[default]
    Executor = 0,
    /// The module's configured fee recipient
    FeeRecipient = 1,
}

impl RefundRecipient {
    /// Returns the recipient as the u8 value folded into the signed digest
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Creates a RefundRecipient from a u8 value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RefundRecipient::Executor),
            1 => Some(RefundRecipient::FeeRecipient),
            _ => None,
        }
    }
}
