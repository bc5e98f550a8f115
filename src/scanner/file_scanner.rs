//! Directory scanner that turns a category folder into media items.
//!
//! - One folder per category under the media root (see `Category::folder`)
//! - Media kind filtered by file extension
//! - Header-only dimension reads
//! - Creation-time descending order, ties broken by file name

use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::task;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::models::{Category, MediaItem, MediaKind};
use crate::scanner::metadata;

/// Scans `<root>/<category folder>` for media of the category's kind.
#[derive(Debug, Clone)]
pub struct FileScanner {
    root: PathBuf,
    url_base: String,
}

impl FileScanner {
    pub fn new(root: impl Into<PathBuf>, url_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_base: url_base.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scans one category on the blocking pool.
    pub async fn scan(&self, category: Category) -> Result<Vec<MediaItem>, ScanError> {
        let scanner = self.clone();
        task::spawn_blocking(move || scanner.scan_sync(category)).await?
    }

    fn scan_sync(&self, category: Category) -> Result<Vec<MediaItem>, ScanError> {
        let dir = self.root.join(category.folder());
        info!(%category, ?dir, "Scanning category folder");

        let mut discovered = discover_files(&dir, category.kind())?;
        sort_newest_first(&mut discovered);

        let items: Vec<MediaItem> = discovered
            .into_iter()
            .map(|entry| self.to_item(category, entry))
            .collect();

        info!(%category, count = items.len(), "Scan complete");
        Ok(items)
    }

    fn to_item(&self, category: Category, entry: DiscoveredEntry) -> MediaItem {
        let (width, height) = metadata::dimensions(&entry.path, category.kind());
        let url = format!(
            "{}/{}/{}",
            self.url_base.trim_end_matches('/'),
            category.folder(),
            entry.file_name
        );
        MediaItem::new(category, &entry.file_name, url, width, height)
            .with_created_at(entry.created_at)
    }
}

/// Information about a discovered media file.
#[derive(Debug, Clone)]
struct DiscoveredEntry {
    path: PathBuf,
    file_name: String,
    created_at: i64,
}

/// Lists the files of `kind` directly inside `dir`. Sub-folders and
/// symlinks are not followed.
fn discover_files(dir: &Path, kind: MediaKind) -> Result<Vec<DiscoveredEntry>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::MissingFolder {
            path: dir.to_path_buf(),
        });
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            // The folder itself failing is fatal; a single bad child is not.
            Err(e) if e.depth() == 0 => {
                return Err(ScanError::Walk {
                    path: dir.to_path_buf(),
                    source: e,
                })
            }
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if MediaKind::from_extension(ext) != Some(kind) {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            debug!(?path, "Skipping non UTF-8 file name");
            continue;
        };

        let created_at = match entry.metadata() {
            Ok(meta) => meta
                .created()
                .or_else(|_| meta.modified())
                .map(unix_seconds)
                .unwrap_or(0),
            Err(e) => {
                warn!(?path, error = %e, "Failed to read metadata");
                continue;
            }
        };

        entries.push(DiscoveredEntry {
            path: path.to_path_buf(),
            file_name: file_name.to_string(),
            created_at,
        });
    }

    debug!(?dir, count = entries.len(), "Discovered media files");
    Ok(entries)
}

fn sort_newest_first(entries: &mut [DiscoveredEntry]) {
    entries.sort_by(|a, b| {
        (Reverse(a.created_at), &a.file_name).cmp(&(Reverse(b.created_at), &b.file_name))
    });
}

fn unix_seconds(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gallery::RevealState;
    use crate::models::RevealRow;
    use std::time::Duration;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    /// A minimal valid 1x1 PNG.
    pub(crate) fn create_test_image(path: &Path) {
        let png_data: [u8; 67] = [
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
            0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
            0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 dimensions
            0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, // bit depth, color type
            0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, // IDAT chunk
            0x08, 0xD7, 0x63, 0xF8, 0x0F, 0x00, 0x00, 0x01, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0xB4,
            0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, // IEND chunk
            0xAE, 0x42, 0x60, 0x82,
        ];
        let mut file = File::create(path).unwrap();
        file.write_all(&png_data).unwrap();
    }

    #[test]
    fn test_missing_folder_is_error() {
        let dir = tempdir().unwrap();
        let result = discover_files(&dir.path().join("images"), MediaKind::Image);
        assert!(matches!(result, Err(ScanError::MissingFolder { .. })));
    }

    #[test]
    fn test_discover_filters_by_kind() {
        let dir = tempdir().unwrap();
        create_test_image(&dir.path().join("one.png"));
        create_test_image(&dir.path().join("two.png"));
        File::create(dir.path().join("clip.mp4")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let images = discover_files(dir.path(), MediaKind::Image).unwrap();
        assert_eq!(images.len(), 2);

        let videos = discover_files(dir.path(), MediaKind::Video).unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].file_name, "clip.mp4");
    }

    #[test]
    fn test_discover_skips_sub_folders() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("2024");
        fs::create_dir(&nested).unwrap();
        create_test_image(&dir.path().join("root.png"));
        create_test_image(&nested.join("nested.png"));

        let found = discover_files(dir.path(), MediaKind::Image).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].file_name, "root.png");
    }

    #[tokio::test]
    async fn test_same_stem_different_extension_gets_distinct_ids() {
        let dir = tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir(&images).unwrap();
        create_test_image(&images.join("cover.png"));
        create_test_image(&images.join("cover.jpg"));

        let items = FileScanner::new(dir.path(), "/media")
            .scan(Category::Photography)
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_ne!(items[0].id, items[1].id);
        assert!(items.iter().all(|item| item.title == "Cover"));

        let mut revealed = RevealState::new();
        let first_row = RevealRow::new(0, Duration::ZERO, vec![items[0].id.clone()]);
        assert_eq!(revealed.reveal(&first_row, &items), 1);
        assert!(!revealed.contains(&items[1].id));
    }

    #[tokio::test]
    async fn test_scan_builds_items() {
        let dir = tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir(&images).unwrap();
        create_test_image(&images.join("studio-portrait.png"));

        let scanner = FileScanner::new(dir.path(), "/media/");
        let items = scanner.scan(Category::Photography).await.unwrap();

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id, "photography-studio-portrait.png");
        assert_eq!(item.url, "/media/images/studio-portrait.png");
        assert_eq!(item.title, "Studio Portrait");
        assert_eq!((item.width, item.height), (1, 1));
    }

    fn entry(name: &str, created_at: i64) -> DiscoveredEntry {
        DiscoveredEntry {
            path: PathBuf::from(name),
            file_name: name.to_string(),
            created_at,
        }
    }

    #[test]
    fn test_sort_newest_first_then_name() {
        let mut entries = vec![
            entry("c.png", 100),
            entry("old.png", 10),
            entry("a.png", 100),
            entry("new.png", 500),
        ];
        sort_newest_first(&mut entries);
        let names: Vec<_> = entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, ["new.png", "a.png", "c.png", "old.png"]);
    }
}
