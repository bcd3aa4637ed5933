//! Composition root for a presentation layer.
//!
//! `ItemTracker` wires the store, the persistence gateway and the icon cache,
//! and speaks the UI's language: raw text fields in, typed rows out. Every
//! successful mutation is followed by a save, so the on-disk file stays a
//! recent snapshot. Mutation and persistence are not transactional: a failed
//! save is returned to the caller while the in-memory change stands.

use crate::error::{TrackerError, TrackerResult};
use crate::icon_cache::IconCache;
use crate::models::Item;
use crate::persistence;
use crate::store::{ItemId, ItemStore, SortField, SortOrder};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Raw text field values as typed into an edit form
#[derive(Debug, Clone, Default)]
pub struct ItemFields {
    pub name: String,
    pub unit_price: String,
    pub stack_size: String,
    pub weight_per_item: String,
    pub icon_path: String,
}

/// Whether a form submission creates a new item or replaces the one being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    None,
    Editing(usize),
}

/// One row of the rendered item list
#[derive(Debug, Clone)]
pub struct ItemRow {
    pub index: usize,
    pub name: String,
    pub unit_price: f64,
    pub stack_size: u32,
    pub price_per_stack: f64,
    pub weight_per_item: f64,
    pub price_per_kg: f64,
    pub icon: Option<Arc<RgbaImage>>,
}

/// Parse raw form fields into a validated item. The error names the field
/// that failed so the UI can point at it.
pub fn parse_fields(fields: &ItemFields) -> TrackerResult<Item> {
    let name = fields.name.trim();
    if name.is_empty() {
        return Err(TrackerError::Validation(
            "item name must not be empty".to_string(),
        ));
    }
    let unit_price = parse_number(&fields.unit_price, "unit price")?;
    let stack_size: u32 = fields.stack_size.trim().parse().map_err(|_| {
        TrackerError::Validation(format!(
            "stack size is not a whole number: '{}'",
            fields.stack_size.trim()
        ))
    })?;
    let weight_per_item = parse_number(&fields.weight_per_item, "weight per item")?;
    Item::new(name, unit_price, stack_size, weight_per_item, fields.icon_path.trim())
}

fn parse_number(text: &str, field: &str) -> TrackerResult<f64> {
    text.trim().parse().map_err(|_| {
        TrackerError::Validation(format!("{} is not a number: '{}'", field, text.trim()))
    })
}

/// Facade over store + persistence + icon cache
#[derive(Debug)]
pub struct ItemTracker {
    store: ItemStore,
    icons: IconCache,
    data_path: PathBuf,
    export_dir: Option<PathBuf>,
    query: String,
}

impl ItemTracker {
    /// Open a tracker backed by the given data file. A missing file starts
    /// an empty collection; a malformed one is an error for the caller to
    /// surface (icons are cosmetic, data is not).
    pub fn open(data_path: impl Into<PathBuf>) -> TrackerResult<Self> {
        let data_path = data_path.into();
        let items = persistence::load(&data_path)?;
        Ok(ItemTracker {
            store: ItemStore::from_items(items),
            icons: IconCache::new(),
            data_path,
            export_dir: None,
            query: String::new(),
        })
    }

    /// Open the tracker at the platform-default data location
    pub fn open_default() -> TrackerResult<Self> {
        Self::open(persistence::default_data_path())
    }

    /// Mirror the data file (and newly added icons) into this directory
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Parse the form fields and add a new item or replace the one being
    /// edited, then persist. Returns the item's index.
    pub fn add_or_update(
        &mut self,
        fields: &ItemFields,
        mode: EditMode,
    ) -> TrackerResult<usize> {
        let item = parse_fields(fields)?;
        let name = item.name.clone();
        let index = match mode {
            EditMode::None => {
                let index = self.store.add(item)?;
                log::info!("Added item: {}", name);
                index
            }
            EditMode::Editing(index) => {
                self.store.update(index, item)?;
                log::info!("Updated item: {}", name);
                index
            }
        };
        self.persist()?;
        if mode == EditMode::None {
            self.mirror_new_item(index);
        }
        Ok(index)
    }

    /// Delete the item at `index`, persist, and return its name for the
    /// status line. Previously held indices are invalidated.
    pub fn delete(&mut self, index: usize) -> TrackerResult<String> {
        let removed = self.store.delete(index)?;
        log::info!("Deleted item: {}", removed.name);
        self.persist()?;
        Ok(removed.name)
    }

    /// Reorder the collection and persist the new order
    pub fn apply_sort(&mut self, field: SortField, order: SortOrder) -> TrackerResult<()> {
        self.store.sort_by(field, order);
        log::info!(
            "Sorted by {} ({})",
            field.as_str(),
            order.as_str().to_lowercase()
        );
        self.persist()
    }

    /// Set the active search query and return the matching indices
    pub fn search(&mut self, query: &str) -> Vec<usize> {
        self.query = query.to_string();
        self.store.filter(&self.query)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// (total, showing) under the active query
    pub fn totals(&self) -> (usize, usize) {
        (self.store.len(), self.store.filter(&self.query).len())
    }

    /// Rows for the item list under the active query, thumbnails resolved
    pub fn rows(&mut self) -> Vec<ItemRow> {
        let indices = self.store.filter(&self.query);
        let mut rows = Vec::with_capacity(indices.len());
        for index in indices {
            let Some(item) = self.store.get(index) else {
                continue;
            };
            rows.push(ItemRow {
                index,
                name: item.name.clone(),
                unit_price: item.unit_price,
                stack_size: item.stack_size,
                price_per_stack: item.price_per_stack(),
                weight_per_item: item.weight_per_item,
                price_per_kg: item.price_per_kg(),
                icon: self.icons.resolve(&item.icon_path),
            });
        }
        rows
    }

    /// Snapshot of the item at `index`, for populating an edit form
    pub fn item(&self, index: usize) -> Option<&Item> {
        self.store.get(index)
    }

    /// Thumbnail for the item at `index`, if it has a decodable icon
    pub fn icon_for(&mut self, index: usize) -> Option<Arc<RgbaImage>> {
        let item = self.store.get(index)?;
        self.icons.resolve(&item.icon_path)
    }

    /// Stable id of the item at `index`, for selection tracking across sorts
    pub fn selected_id(&self, index: usize) -> Option<ItemId> {
        self.store.id_at(index)
    }

    /// Re-resolve a tracked selection to its current index
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.store.index_of(id)
    }

    /// Persist the collection; called by the UI shell on window close
    pub fn save(&self) -> TrackerResult<()> {
        self.persist()
    }

    /// Icon files in `icon_dir` that no item references
    pub fn unused_icons(&self, icon_dir: &Path) -> TrackerResult<Vec<String>> {
        persistence::find_unused_icons(self.store.items(), icon_dir)
    }

    fn persist(&self) -> TrackerResult<()> {
        persistence::save(self.store.items(), &self.data_path)
    }

    // Mirror failures are logged and never fail the add that triggered them
    fn mirror_new_item(&self, index: usize) {
        let Some(export_dir) = &self.export_dir else {
            return;
        };
        if let Err(e) = persistence::export_snapshot(&self.data_path, export_dir) {
            log::warn!("Failed to mirror data file: {}", e);
        }
        if let Some(item) = self.store.get(index) {
            if let Err(e) = persistence::export_item_icon(item, export_dir) {
                log::warn!("Failed to mirror icon for '{}': {}", item.name, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, price: &str, stack: &str, weight: &str) -> ItemFields {
        ItemFields {
            name: name.to_string(),
            unit_price: price.to_string(),
            stack_size: stack.to_string(),
            weight_per_item: weight.to_string(),
            icon_path: String::new(),
        }
    }

    #[test]
    fn parse_fields_trims_and_converts() {
        let item = parse_fields(&fields("  Health Potion  ", " 12.5 ", "10", "0.2")).unwrap();
        assert_eq!(item.name, "Health Potion");
        assert_eq!(item.unit_price, 12.5);
        assert_eq!(item.stack_size, 10);
        assert_eq!(item.weight_per_item, 0.2);
    }

    #[test]
    fn parse_fields_rejects_blank_name() {
        let err = parse_fields(&fields("   ", "1", "1", "1")).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn parse_fields_names_the_bad_number_field() {
        let err = parse_fields(&fields("Potion", "abc", "1", "1")).unwrap_err();
        assert!(err.to_string().contains("unit price"));

        let err = parse_fields(&fields("Potion", "1", "four", "1")).unwrap_err();
        assert!(err.to_string().contains("stack size"));

        let err = parse_fields(&fields("Potion", "1", "1", "heavy")).unwrap_err();
        assert!(err.to_string().contains("weight per item"));
    }

    #[test]
    fn parse_fields_rejects_fractional_stack_size() {
        let err = parse_fields(&fields("Potion", "1", "2.5", "1")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[test]
    fn parse_fields_applies_item_invariants() {
        assert!(parse_fields(&fields("Potion", "1", "0", "1")).is_err());
        assert!(parse_fields(&fields("Potion", "1", "1", "0")).is_err());
        assert!(parse_fields(&fields("Potion", "-1", "1", "1")).is_err());
    }
}
