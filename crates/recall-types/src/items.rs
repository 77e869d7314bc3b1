//! Item kinds and stacks.
//!
//! Items are compared by kind only: two stacks of `paper` are the same
//! item regardless of where in the inventory they sit.

use serde::{Deserialize, Serialize};

/// The kind of an item, e.g. `paper`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKind(String);

impl ItemKind {
    /// Create an item kind from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl core::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A number of items of one kind occupying one inventory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// What the stack holds.
    pub kind: ItemKind,
    /// How many units the stack holds.
    pub amount: u32,
}

impl ItemStack {
    /// Create a stack.
    pub const fn new(kind: ItemKind, amount: u32) -> Self {
        Self { kind, amount }
    }

    /// Whether the stack holds at least one unit of `kind`.
    pub fn is_kind(&self, kind: &ItemKind) -> bool {
        self.amount > 0 && self.kind == *kind
    }
}

/// Addresses one stack of an actor's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    /// The stack the actor is actively holding.
    ActiveHand,
    /// A stack by its inventory index.
    Index(usize),
}
