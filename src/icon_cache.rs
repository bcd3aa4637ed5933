//! In-memory cache of decoded item icons.
//!
//! Icons are cosmetic: a missing file or a failed decode is a normal "no
//! icon" outcome, never an error. Successful decodes are memoized for the
//! process lifetime (icon files are assumed not to change during a session);
//! failures are not memoized, so a file that is still being written can
//! succeed on a later attempt.

use image::RgbaImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maximum thumbnail dimension; decoded icons fit within this square
pub const THUMBNAIL_SIZE: u32 = 32;

/// Memoizing path -> thumbnail resolver. The cache owns the decoded bitmaps;
/// callers receive a shared read-only handle.
#[derive(Debug, Default)]
pub struct IconCache {
    thumbnails: HashMap<PathBuf, Arc<RgbaImage>>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an icon path to a decoded thumbnail bounded to 32x32.
    ///
    /// Returns `None` for a blank path, a missing or unreadable file, or a
    /// decode failure. Entries are keyed by canonicalized absolute path, so
    /// two spellings of the same file share one decoded bitmap.
    pub fn resolve(&mut self, path: &str) -> Option<Arc<RgbaImage>> {
        if path.trim().is_empty() {
            return None;
        }
        // Canonicalization doubles as the existence check
        let key = std::fs::canonicalize(path).ok()?;

        if let Some(thumbnail) = self.thumbnails.get(&key) {
            log::debug!("Icon cache hit for {}", key.display());
            return Some(Arc::clone(thumbnail));
        }

        let thumbnail = Arc::new(decode_thumbnail(&key)?);
        self.thumbnails.insert(key, Arc::clone(&thumbnail));
        Some(thumbnail)
    }

    /// Check whether a path has already been resolved successfully
    pub fn contains(&self, path: &str) -> bool {
        std::fs::canonicalize(path)
            .map(|key| self.thumbnails.contains_key(&key))
            .unwrap_or(false)
    }

    /// Number of decoded thumbnails held
    pub fn len(&self) -> usize {
        self.thumbnails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thumbnails.is_empty()
    }
}

/// Decode an image file and scale it down to fit the thumbnail bounds,
/// preserving aspect ratio. Images already within bounds are kept as-is.
fn decode_thumbnail(path: &Path) -> Option<RgbaImage> {
    let img = match image::open(path) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("Failed to decode icon {}: {}", path.display(), e);
            return None;
        }
    };
    let img = if img.width() > THUMBNAIL_SIZE || img.height() > THUMBNAIL_SIZE {
        img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE)
    } else {
        img
    };
    Some(img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> String {
        let path = dir.path().join(name);
        let img = RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
        img.save(&path).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn blank_path_resolves_to_none() {
        let mut cache = IconCache::new();
        assert!(cache.resolve("").is_none());
        assert!(cache.resolve("   ").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_file_resolves_to_none() {
        let mut cache = IconCache::new();
        assert!(cache.resolve("/this/icon/does/not/exist.png").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn decodes_and_bounds_large_image() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "big.png", 64, 64);

        let mut cache = IconCache::new();
        let thumb = cache.resolve(&path).unwrap();
        assert!(thumb.width() <= THUMBNAIL_SIZE);
        assert!(thumb.height() <= THUMBNAIL_SIZE);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn preserves_aspect_ratio() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "wide.png", 64, 32);

        let mut cache = IconCache::new();
        let thumb = cache.resolve(&path).unwrap();
        assert_eq!(thumb.width(), 32);
        assert_eq!(thumb.height(), 16);
    }

    #[test]
    fn small_image_is_not_upscaled() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "small.png", 8, 8);

        let mut cache = IconCache::new();
        let thumb = cache.resolve(&path).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (8, 8));
    }

    #[test]
    fn repeat_resolve_returns_memoized_bitmap() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "icon.png", 40, 40);

        let mut cache = IconCache::new();
        let first = cache.resolve(&path).unwrap();
        let second = cache.resolve(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&path));
    }

    #[test]
    fn decode_failure_is_absorbed_and_not_memoized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("not_an_image.png");
        std::fs::write(&path, b"this is not image data").unwrap();
        let path = path.to_str().unwrap().to_string();

        let mut cache = IconCache::new();
        assert!(cache.resolve(&path).is_none());
        assert!(!cache.contains(&path));
        assert!(cache.is_empty());

        // A later write of real image data succeeds on retry
        let img = RgbaImage::from_pixel(16, 16, image::Rgba([0, 0, 0, 255]));
        img.save(&path).unwrap();
        assert!(cache.resolve(&path).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_files_cached_separately() {
        let dir = TempDir::new().unwrap();
        let a = write_png(&dir, "a.png", 16, 16);
        let b = write_png(&dir, "b.png", 16, 16);

        let mut cache = IconCache::new();
        cache.resolve(&a).unwrap();
        cache.resolve(&b).unwrap();
        assert_eq!(cache.len(), 2);
    }
}
