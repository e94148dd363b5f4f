//! Action registry: the engine's sole trust anchor for action resolution

use std::collections::HashMap;
use std::sync::Arc;

use crate::action::Action;
use crate::types::ActionId;

/// Resolves 4-byte action ids to trusted actions.
///
/// This is the only party whose word the engine accepts on "is this a
/// legitimate action"; the governance process that decides what gets
/// registered lives outside the engine.
pub trait ActionRegistry {
    /// Returns the action registered under `id`, or `None`
    fn resolve(&self, id: ActionId) -> Option<&dyn Action>;
}

impl<T: ActionRegistry + ?Sized> ActionRegistry for &T {
    fn resolve(&self, id: ActionId) -> Option<&dyn Action> {
        (**self).resolve(id)
    }
}

impl<T: ActionRegistry + ?Sized> ActionRegistry for Arc<T> {
    fn resolve(&self, id: ActionId) -> Option<&dyn Action> {
        (**self).resolve(id)
    }
}

/// Fixed, in-memory registry
#[derive(Default)]
pub struct StaticRegistry {
    actions: HashMap<ActionId, Box<dyn Action + Send + Sync>>,
}

impl StaticRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action under an explicit id, replacing any previous
    /// entry
    pub fn register(&mut self, id: ActionId, action: Box<dyn Action + Send + Sync>) {
        self.actions.insert(id, action);
    }

    /// Registers an action under the id derived from `name`, returning
    /// the id
    pub fn register_named(&mut self, name: &str, action: Box<dyn Action + Send + Sync>) -> ActionId {
        let id = ActionId::from_name(name);
        self.register(id, action);
        id
    }

    /// Whether an id is registered
    pub fn contains(&self, id: ActionId) -> bool {
        self.actions.contains_key(&id)
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl std::fmt::Debug for StaticRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticRegistry")
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ActionRegistry for StaticRegistry {
    fn resolve(&self, id: ActionId) -> Option<&dyn Action> {
        self.actions.get(&id).map(|action| action.as_ref() as &dyn Action)
    }
}
