use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vendomat_core::ValueObject;

/// A stocked product: what it costs and how many are left.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    price: u64,
    count: u64,
}

impl Item {
    pub fn new(price: u64, count: u64) -> Self {
        Self { price, count }
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn in_stock(&self) -> bool {
        self.count > 0
    }

    pub(crate) fn take_one(&mut self) {
        self.count = self.count.saturating_sub(1);
    }

    pub(crate) fn add(&mut self, count: u64) {
        self.count = self.count.saturating_add(count);
    }
}

impl ValueObject for Item {}

/// Item name → item. Ordered so listings and snapshots are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<String, Item>);

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.0.iter().map(|(name, item)| (name.as_str(), item))
    }

    /// Units across every item.
    pub fn total_units(&self) -> u64 {
        self.0.values().map(Item::count).sum()
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Item> {
        self.0.get_mut(name)
    }

    pub(crate) fn insert(&mut self, name: String, item: Item) {
        self.0.insert(name, item);
    }
}
