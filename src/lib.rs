pub mod app;
pub mod error;
pub mod formatters;
pub mod icon_cache;
pub mod models;
pub mod persistence;
pub mod store;

// Re-export commonly used items
pub use app::{parse_fields, EditMode, ItemFields, ItemRow, ItemTracker};
pub use error::{TrackerError, TrackerResult};
pub use icon_cache::{IconCache, THUMBNAIL_SIZE};
pub use models::Item;
pub use store::{ItemId, ItemStore, SortField, SortOrder};
