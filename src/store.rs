//! Ordered in-memory item collection.
//!
//! The store owns the canonical item order (it is also the persisted order)
//! and enforces the write-time invariants:
//! - numeric invariants of `Item` (re-checked, since loaded items bypass `Item::new`)
//! - names are non-empty after trimming
//! - names are unique case-insensitively, except an update keeping its own name
//!
//! Every operation either fully succeeds or leaves the collection untouched.

use crate::error::{TrackerError, TrackerResult};
use crate::models::Item;
use std::cmp::Ordering;

/// Opaque stable identity of a stored item.
///
/// Assigned at insertion and kept across updates and sorts, so a presentation
/// layer can re-resolve its selection after the collection reorders instead of
/// trusting a raw position. Ids are never persisted; a reload assigns fresh ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(u64);

/// Sort keys available to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    UnitPrice,
    PricePerStack,
    PricePerKg,
}

impl SortField {
    /// Returns the display label (e.g., "Unit Price")
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::UnitPrice => "Unit Price",
            SortField::PricePerStack => "Price per Stack",
            SortField::PricePerKg => "Price per kg",
        }
    }

    /// Parse a display label back into a sort field
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Returns all sort fields, in combo-box order
    pub fn all() -> &'static [SortField] {
        &[
            SortField::Name,
            SortField::UnitPrice,
            SortField::PricePerStack,
            SortField::PricePerKg,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "Ascending",
            SortOrder::Descending => "Descending",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn all() -> &'static [SortOrder] {
        &[SortOrder::Ascending, SortOrder::Descending]
    }
}

fn compare(a: &Item, b: &Item, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::UnitPrice => a.unit_price.total_cmp(&b.unit_price),
        SortField::PricePerStack => a.price_per_stack().total_cmp(&b.price_per_stack()),
        SortField::PricePerKg => a.price_per_kg().total_cmp(&b.price_per_kg()),
    }
}

/// Ordered collection of items with uniqueness and validity enforcement
#[derive(Debug, Default)]
pub struct ItemStore {
    items: Vec<Item>,
    // Parallel to `items`: ids[i] identifies items[i]
    ids: Vec<ItemId>,
    next_id: u64,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded items, assigning fresh ids in order.
    /// Loaded items are taken as-is; validation applies to writes.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut store = Self::new();
        for item in items {
            let id = store.alloc_id();
            store.ids.push(id);
            store.items.push(item);
        }
        store
    }

    fn alloc_id(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Stable id of the item at `index`
    pub fn id_at(&self, index: usize) -> Option<ItemId> {
        self.ids.get(index).copied()
    }

    /// Current index of the item with the given id, if it still exists
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.ids.iter().position(|&i| i == id)
    }

    /// Append a validated candidate and return its index.
    pub fn add(&mut self, item: Item) -> TrackerResult<usize> {
        self.check_candidate(&item, None)?;
        let id = self.alloc_id();
        self.ids.push(id);
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Replace the item at `index` in place. Position and id are unchanged;
    /// the uniqueness check skips the record being replaced so an item may
    /// keep its own name.
    pub fn update(&mut self, index: usize, item: Item) -> TrackerResult<()> {
        if index >= self.items.len() {
            return Err(TrackerError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.check_candidate(&item, Some(index))?;
        self.items[index] = item;
        Ok(())
    }

    /// Remove and return the item at `index`. Later indices shift down by
    /// one; callers must treat previously held indices as invalidated.
    pub fn delete(&mut self, index: usize) -> TrackerResult<Item> {
        if index >= self.items.len() {
            return Err(TrackerError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.ids.remove(index);
        Ok(self.items.remove(index))
    }

    /// Reorder the collection in place. The sort is stable: equal keys keep
    /// their prior relative order, for ascending and descending alike
    /// (descending reverses the comparator, not the output).
    pub fn sort_by(&mut self, field: SortField, order: SortOrder) {
        let mut pairs: Vec<(ItemId, Item)> =
            self.ids.drain(..).zip(self.items.drain(..)).collect();
        pairs.sort_by(|a, b| {
            let ord = compare(&a.1, &b.1, field);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        for (id, item) in pairs {
            self.ids.push(id);
            self.items.push(item);
        }
    }

    /// Indices (in collection order) of items whose name contains `query`
    /// case-insensitively. A blank query selects everything. Read-only.
    pub fn filter(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return (0..self.items.len()).collect();
        }
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// Case-insensitive exact-name lookup
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        let needle = name.to_lowercase();
        self.items
            .iter()
            .position(|item| item.name.to_lowercase() == needle)
    }

    fn check_candidate(&self, item: &Item, keep: Option<usize>) -> TrackerResult<()> {
        item.validate()?;
        if item.name.trim().is_empty() {
            return Err(TrackerError::Validation(
                "item name must not be empty".to_string(),
            ));
        }
        if let Some(existing) = self.find_by_name(&item.name) {
            if Some(existing) != keep {
                return Err(TrackerError::DuplicateName(item.name.clone()));
            }
        }
        Ok(())
    }
}
