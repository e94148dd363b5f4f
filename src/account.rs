//! Smart account trait and an in-memory reference implementation

use std::collections::HashMap;

use alloy::primitives::{Address, U256};

use crate::error::{Error, Result};

/// A rollback point in an account's state history, produced by
/// [`SmartAccount::checkpoint`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl Checkpoint {
    /// Creates a checkpoint from a raw journal index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw journal index
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Safe-like smart account the engine acts on.
///
/// Dispatched actions receive the account as an explicit parameter - the
/// "acting-as" replacement for delegated-call identity aliasing - and
/// mutate it through this surface. The native asset is `Address::ZERO` by
/// convention.
///
/// The checkpoint/revert/commit protocol stands in for transaction-level
/// atomicity: the module checkpoints before dispatch and either commits or
/// reverts every mutation the dispatched sequence made.
pub trait SmartAccount {
    /// Returns the account address, the identity actions act as
    fn address(&self) -> Address;

    /// Whether `signer` is currently an owner.
    ///
    /// Queried live on every execution: a signer removed after signing
    /// invalidates any bundle it signed.
    fn is_owner(&self, signer: Address) -> bool;

    /// Balance of `token` held by the account
    fn balance_of(&self, token: Address) -> U256;

    /// Adds `amount` of `token` to the account
    fn credit(&mut self, token: Address, amount: U256);

    /// Removes `amount` of `token` from the account
    ///
    /// # Errors
    /// Returns [`Error::InsufficientBalance`] if the balance is short.
    fn debit(&mut self, token: Address, amount: U256) -> Result<()>;

    /// Marks a rollback point covering all balance state
    fn checkpoint(&mut self) -> Checkpoint;

    /// Restores state to `checkpoint`, discarding everything since
    fn revert_to(&mut self, checkpoint: Checkpoint);

    /// Discards the rollback data for `checkpoint`, keeping state
    fn commit(&mut self, checkpoint: Checkpoint);
}

/// In-memory smart account with snapshot-stack journaling.
///
/// The reference implementation used by tests, demos and embedders that
/// do not bring their own account backend.
#[derive(Debug, Clone, Default)]
pub struct LocalAccount {
    address: Address,
    owners: Vec<Address>,
    balances: HashMap<Address, U256>,
    snapshots: Vec<HashMap<Address, U256>>,
}

impl LocalAccount {
    /// Creates an account with no owners and no balances
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    /// Adds an owner, builder style
    pub fn with_owner(mut self, owner: Address) -> Self {
        self.add_owner(owner);
        self
    }

    /// Adds an owner
    pub fn add_owner(&mut self, owner: Address) {
        if !self.owners.contains(&owner) {
            self.owners.push(owner);
        }
    }

    /// Removes an owner
    pub fn remove_owner(&mut self, owner: Address) {
        self.owners.retain(|o| *o != owner);
    }

    /// Returns the current owner set
    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    /// Sets a token balance directly, outside any checkpoint
    pub fn set_balance(&mut self, token: Address, amount: U256) {
        self.balances.insert(token, amount);
    }
}

impl SmartAccount for LocalAccount {
    fn address(&self) -> Address {
        self.address
    }

    fn is_owner(&self, signer: Address) -> bool {
        self.owners.contains(&signer)
    }

    fn balance_of(&self, token: Address) -> U256 {
        self.balances.get(&token).copied().unwrap_or_default()
    }

    fn credit(&mut self, token: Address, amount: U256) {
        let balance = self.balances.entry(token).or_default();
        *balance = balance.saturating_add(amount);
    }

    fn debit(&mut self, token: Address, amount: U256) -> Result<()> {
        let balance = self.balance_of(token);
        if balance < amount {
            return Err(Error::InsufficientBalance {
                token,
                balance,
                required: amount,
            });
        }
        self.balances.insert(token, balance - amount);
        Ok(())
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.snapshots.push(self.balances.clone());
        Checkpoint::new(self.snapshots.len() - 1)
    }

    fn revert_to(&mut self, checkpoint: Checkpoint) {
        if let Some(snapshot) = self.snapshots.get(checkpoint.index()).cloned() {
            self.balances = snapshot;
            self.snapshots.truncate(checkpoint.index());
        }
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        self.snapshots.truncate(checkpoint.index());
    }
}
