//! Inventory and items.

use serde::{Deserialize, Serialize};

/// A stack of one item kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Free-form category such as "weapon" or "quest_reward".
    #[serde(default)]
    pub kind: String,
    #[serde(default = "default_one")]
    pub value: i32,
    #[serde(default = "default_one")]
    pub quantity: i32,
}

fn default_one() -> i32 {
    1
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            value: 1,
            quantity: 1,
        }
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self
    }

    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// The player's inventory. Stacks are keyed by item id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Inventory {
    pub items: Vec<Item>,
    #[serde(default)]
    pub gold: i32,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item, merging into an existing stack with the same id.
    pub fn add_item(&mut self, item: Item) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.quantity += item.quantity,
            None => self.items.push(item),
        }
    }

    /// Remove `quantity` of an item.
    ///
    /// Returns false and leaves the inventory unchanged if `quantity` is not
    /// positive, the item is missing or the stack is too small. A stack that
    /// reaches zero is dropped.
    pub fn remove_item(&mut self, id: &str, quantity: i32) -> bool {
        if quantity <= 0 {
            return false;
        }
        let Some(pos) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };

        let stack = &mut self.items[pos];
        if stack.quantity < quantity {
            return false;
        }

        stack.quantity -= quantity;
        if stack.quantity == 0 {
            self.items.remove(pos);
        }
        true
    }

    pub fn has_item(&self, id: &str, quantity: i32) -> bool {
        self.quantity(id) >= quantity
    }

    /// Total quantity held of an item (0 if absent).
    pub fn quantity(&self, id: &str) -> i32 {
        self.items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.quantity)
            .unwrap_or(0)
    }
}
