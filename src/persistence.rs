//! JSON persistence for the item collection.
//!
//! The data file is a pretty-printed JSON array, one object per item. A
//! missing file is a normal first run and loads as an empty collection; a
//! malformed file is an error the caller decides how to surface. Saves
//! replace the file atomically (write to a sibling temp file, then rename)
//! so a partial file is never observable.

use crate::error::TrackerResult;
use crate::models::Item;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default location of the item data file, under the platform data directory
pub fn default_data_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("itemtracker")
        .join("items.json")
}

/// Default directory for item icon files
pub fn default_icon_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("itemtracker")
        .join("icons")
}

/// Load the full item collection. A missing file yields an empty collection.
pub fn load(path: &Path) -> TrackerResult<Vec<Item>> {
    if !path.exists() {
        log::info!("No item file at {}, starting empty", path.display());
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)?;
    let items: Vec<Item> = serde_json::from_str(&text)?;
    log::info!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

/// Save the full ordered collection, overwriting the destination atomically.
pub fn save(items: &[Item], path: &Path) -> TrackerResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(items)?;

    // Stage next to the destination so the rename stays on one filesystem
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    log::debug!("Saved {} items to {}", items.len(), path.display());
    Ok(())
}

/// Copy the data file into a mirror directory. No-op until a data file exists.
pub fn export_snapshot(data_path: &Path, export_dir: &Path) -> TrackerResult<()> {
    if !data_path.is_file() {
        return Ok(());
    }
    std::fs::create_dir_all(export_dir)?;
    let file_name = data_path.file_name().unwrap_or_else(|| "items.json".as_ref());
    std::fs::copy(data_path, export_dir.join(file_name))?;
    log::debug!("Mirrored {} to {}", data_path.display(), export_dir.display());
    Ok(())
}

/// Copy an item's icon file into `<export_dir>/icons`. No-op for items
/// without an icon or whose icon file is gone.
pub fn export_item_icon(item: &Item, export_dir: &Path) -> TrackerResult<()> {
    if !item.has_icon() {
        return Ok(());
    }
    let source = Path::new(&item.icon_path);
    if !source.is_file() {
        return Ok(());
    }
    let Some(file_name) = source.file_name() else {
        return Ok(());
    };
    let icon_dir = export_dir.join("icons");
    std::fs::create_dir_all(&icon_dir)?;
    std::fs::copy(source, icon_dir.join(file_name))?;
    Ok(())
}

/// File names (lowercased, sorted) in the icon directory that no item
/// references. Empty when the directory does not exist.
pub fn find_unused_icons(items: &[Item], icon_dir: &Path) -> TrackerResult<Vec<String>> {
    if !icon_dir.is_dir() {
        return Ok(Vec::new());
    }

    let used: HashSet<String> = items
        .iter()
        .filter(|item| item.has_icon())
        .filter_map(|item| Path::new(&item.icon_path).file_name())
        .map(|name| name.to_string_lossy().to_lowercase())
        .collect();

    let mut unused = Vec::new();
    for entry in std::fs::read_dir(icon_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !used.contains(&name) {
            unused.push(name);
        }
    }
    unused.sort();
    Ok(unused)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_item(name: &str, icon_path: &str) -> Item {
        Item::new(name, 1.0, 1, 1.0, icon_path).unwrap()
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let dir = TempDir::new().unwrap();
        let items = load(&dir.path().join("items.json")).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("items.json");
        save(&[make_item("A", "")], &path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn default_paths_share_app_directory() {
        let data = default_data_path();
        let icons = default_icon_dir();
        assert!(data.ends_with("itemtracker/items.json") || data.ends_with("itemtracker\\items.json"));
        assert_eq!(data.parent(), icons.parent());
    }

    #[test]
    fn export_snapshot_noop_without_data_file() {
        let dir = TempDir::new().unwrap();
        let export = dir.path().join("mirror");
        export_snapshot(&dir.path().join("items.json"), &export).unwrap();
        assert!(!export.exists());
    }

    #[test]
    fn export_snapshot_copies_data_file() {
        let dir = TempDir::new().unwrap();
        let data_path = dir.path().join("items.json");
        save(&[make_item("A", "")], &data_path).unwrap();

        let export = dir.path().join("mirror");
        export_snapshot(&data_path, &export).unwrap();
        assert!(export.join("items.json").is_file());
    }

    #[test]
    fn export_item_icon_noop_for_blank_or_missing() {
        let dir = TempDir::new().unwrap();
        let export = dir.path().join("mirror");

        export_item_icon(&make_item("A", ""), &export).unwrap();
        export_item_icon(&make_item("B", "/nope/gone.png"), &export).unwrap();
        assert!(!export.exists());
    }

    #[test]
    fn export_item_icon_copies_into_icons_subdir() {
        let dir = TempDir::new().unwrap();
        let icon = dir.path().join("sword.png");
        std::fs::write(&icon, b"png bytes").unwrap();

        let export = dir.path().join("mirror");
        let item = make_item("Sword", icon.to_str().unwrap());
        export_item_icon(&item, &export).unwrap();
        assert!(export.join("icons").join("sword.png").is_file());
    }

    #[test]
    fn find_unused_icons_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let unused = find_unused_icons(&[], &dir.path().join("nope")).unwrap();
        assert!(unused.is_empty());
    }

    #[test]
    fn find_unused_icons_is_case_insensitive_and_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["Sword.PNG", "potion.png", "axe.png"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        // The item references the sword icon with different casing
        let item = make_item("Sword", dir.path().join("sword.png").to_str().unwrap());
        let unused = find_unused_icons(&[item], dir.path()).unwrap();
        assert_eq!(unused, vec!["axe.png", "potion.png"]);
    }
}
