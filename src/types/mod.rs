//! Type definitions for signed bundles and their executor-facing forms

mod bundle;
mod definition;

pub use bundle::{Bundle, ChainSequence, ExecutorSequence, Sequence, SequenceBuilder};
pub use definition::{ActionDefinition, ActionId, ActionType, RefundRecipient};
