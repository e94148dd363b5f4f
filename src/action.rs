//! Action trait: the capability surface of registry-resolved operations

use std::fmt;

use alloy::primitives::{Address, Bytes};

use crate::account::SmartAccount;
use crate::error::Error;
use crate::types::{ActionDefinition, ActionType, Bundle};

/// Failure raised by an action during execution.
///
/// `revert_data` is the action's original, opaque revert payload; when
/// present it must survive propagation byte-for-byte so callers see the
/// real action-level error instead of a generic wrapper.
#[derive(Debug, Clone)]
pub struct ActionError {
    reason: String,
    revert_data: Option<Bytes>,
}

impl ActionError {
    /// Creates an error with a reason and no revert payload
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            revert_data: None,
        }
    }

    /// Attaches the original revert payload
    pub fn with_revert_data(mut self, data: impl Into<Bytes>) -> Self {
        self.revert_data = Some(data.into());
        self
    }

    /// Returns the failure reason
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the original revert payload, if any
    pub fn revert_data(&self) -> Option<&Bytes> {
        self.revert_data.as_ref()
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.revert_data {
            Some(data) => write!(f, "{} (revert data: {})", self.reason, data),
            None => f.write_str(&self.reason),
        }
    }
}

impl std::error::Error for ActionError {}

impl From<Error> for ActionError {
    fn from(err: Error) -> Self {
        ActionError::new(err.to_string())
    }
}

/// Result type for action execution
pub type ActionResult = std::result::Result<(), ActionError>;

/// A registry-resolved, composable operation executed against a smart
/// account.
///
/// Every execution entry point receives the account handle explicitly;
/// the action acts *as* that account and must not assume any other
/// ambient identity.
pub trait Action {
    /// Address the action is deployed at, used in events and errors
    fn address(&self) -> Address;

    /// Live protocol identity, compared against the signer-declared
    /// definition before dispatch
    fn protocol_name(&self) -> &str;

    /// Live action category
    fn action_type(&self) -> ActionType;

    /// Whether the action understands the bundle-context calling
    /// convention. The executor only forwards bundle data to actions that
    /// advertise it.
    fn bundle_aware(&self) -> bool {
        false
    }

    /// Plain execution entry point
    fn execute(
        &self,
        account: &mut dyn SmartAccount,
        data: &Bytes,
        strategy_id: u16,
    ) -> ActionResult;

    /// Bundle-context entry point, for actions that carry bundle data in
    /// their own bookkeeping (e.g. a bridge step that forwards the bundle
    /// and signature in its outgoing message).
    ///
    /// The default falls back to plain execution.
    fn execute_in_bundle(
        &self,
        account: &mut dyn SmartAccount,
        data: &Bytes,
        _bundle: &Bundle,
        _signature: &[u8],
        strategy_id: u16,
    ) -> ActionResult {
        self.execute(account, data, strategy_id)
    }

    /// The action's live identity as a definition
    fn definition(&self) -> ActionDefinition {
        ActionDefinition::new(self.protocol_name(), self.action_type())
    }
}
