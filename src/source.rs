//! Media sources: where galleries get their items from.
//!
//! A source never fails from the caller's point of view. Anything that goes
//! wrong is logged and collapsed to an empty list, so a gallery degrades to
//! its empty state instead of erroring.

use std::future::Future;
use std::path::PathBuf;

use tracing::warn;

use crate::config::GalleryConfig;
use crate::models::{Category, MediaItem};
use crate::scanner::FileScanner;

pub trait MediaSource: Send + Sync + 'static {
    /// Items of one category, newest first, truncated to `limit` when given.
    fn fetch_by_category(
        &self,
        category: Category,
        limit: Option<usize>,
    ) -> impl Future<Output = Vec<MediaItem>> + Send;
}

/// Reads `<root>/<category folder>` from disk on every fetch.
#[derive(Debug, Clone)]
pub struct DirectoryMediaSource {
    scanner: FileScanner,
    default_limit: usize,
}

impl DirectoryMediaSource {
    pub fn new(
        root: impl Into<PathBuf>,
        url_base: impl Into<String>,
        default_limit: usize,
    ) -> Self {
        Self {
            scanner: FileScanner::new(root, url_base),
            default_limit: default_limit.max(1),
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(&config.media_root, &config.url_base, config.fetch_limit)
    }
}

impl MediaSource for DirectoryMediaSource {
    async fn fetch_by_category(&self, category: Category, limit: Option<usize>) -> Vec<MediaItem> {
        match self.scanner.scan(category).await {
            Ok(mut items) => {
                items.truncate(limit.unwrap_or(self.default_limit));
                items
            }
            Err(e) => {
                warn!(
                    %category,
                    root = ?self.scanner.root(),
                    error = %e,
                    "Fetch failed, returning no items"
                );
                Vec::new()
            }
        }
    }
}

/// Fixed, in-memory item lists. Optionally answers after a delay, which
/// lets callers exercise requests that outlive their gallery.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StaticMediaSource {
    items: std::collections::HashMap<Category, Vec<MediaItem>>,
    latency: Option<std::time::Duration>,
}

#[cfg(test)]
impl StaticMediaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, category: Category, items: Vec<MediaItem>) -> Self {
        self.items.insert(category, items);
        self
    }

    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[cfg(test)]
impl MediaSource for StaticMediaSource {
    async fn fetch_by_category(&self, category: Category, limit: Option<usize>) -> Vec<MediaItem> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let items = self.items.get(&category).cloned().unwrap_or_default();
        tracing::debug!(%category, count = items.len(), "Serving static items");
        match limit {
            Some(limit) => items.into_iter().take(limit).collect(),
            None => items,
        }
    }
}

/// The first few items of every category, as shown on the landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overview {
    pub photography: Vec<MediaItem>,
    pub web: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
}

impl Overview {
    pub fn get(&self, category: Category) -> &[MediaItem] {
        match category {
            Category::Photography => &self.photography,
            Category::Web => &self.web,
            Category::Videos => &self.videos,
        }
    }
}

/// Fetches all categories concurrently, `limit` items each.
pub async fn fetch_overview<S: MediaSource>(source: &S, limit: usize) -> Overview {
    let (photography, web, videos) = tokio::join!(
        source.fetch_by_category(Category::Photography, Some(limit)),
        source.fetch_by_category(Category::Web, Some(limit)),
        source.fetch_by_category(Category::Videos, Some(limit)),
    );
    Overview {
        photography,
        web,
        videos,
    }
}
