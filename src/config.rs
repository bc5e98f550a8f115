//! Runtime configuration.
//!
//! Every value has a compiled-in default and can be overridden through a
//! `FOLIO_*` environment variable.

use std::path::PathBuf;
use std::time::Duration;

use directories::UserDirs;
use tracing::warn;

/// Viewport width (px) at which the gallery switches from the narrow to the
/// wide grid.
pub const WIDE_BREAKPOINT_PX: u32 = 768;

/// Items per page below / at-or-above the breakpoint.
pub const NARROW_PAGE_SIZE: usize = 3;
pub const WIDE_PAGE_SIZE: usize = 9;

/// Grid columns below / at-or-above the breakpoint.
pub const NARROW_COLUMNS: usize = 1;
pub const WIDE_COLUMNS: usize = 3;

/// Page-change animation length. The transition lock is released after
/// exactly this long, so the two can never drift apart.
const DEFAULT_TRANSITION_MS: u64 = 500;

/// Delay between two revealed rows.
const DEFAULT_REVEAL_ROW_MS: u64 = 300;

/// Maximum items fetched per category when the caller gives no limit.
const DEFAULT_FETCH_LIMIT: usize = 100;

/// Items per category in the overview (home page) listing.
pub const OVERVIEW_LIMIT: usize = 3;

const DEFAULT_URL_BASE: &str = "/media";

#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub media_root: PathBuf,
    pub url_base: String,
    pub fetch_limit: usize,
    pub transition_duration: Duration,
    pub reveal_row_delay: Duration,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            media_root: default_media_root(),
            url_base: DEFAULT_URL_BASE.to_string(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            transition_duration: Duration::from_millis(DEFAULT_TRANSITION_MS),
            reveal_row_delay: Duration::from_millis(DEFAULT_REVEAL_ROW_MS),
        }
    }
}

impl GalleryConfig {
    /// Defaults overridden by any `FOLIO_*` variables present.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(root) = lookup("FOLIO_MEDIA_ROOT").filter(|v| !v.trim().is_empty()) {
            config.media_root = PathBuf::from(root);
        }
        if let Some(base) = lookup("FOLIO_URL_BASE") {
            config.url_base = base.trim_end_matches('/').to_string();
        }
        if let Some(limit) = parse_positive(&lookup, "FOLIO_FETCH_LIMIT") {
            config.fetch_limit = limit as usize;
        }
        if let Some(ms) = parse_positive(&lookup, "FOLIO_TRANSITION_MS") {
            config.transition_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_positive(&lookup, "FOLIO_REVEAL_ROW_MS") {
            config.reveal_row_delay = Duration::from_millis(ms);
        }

        config
    }
}

fn parse_positive<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            warn!(key, value = %raw, "Ignoring invalid config value");
            None
        }
    }
}

fn default_media_root() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| {
            dirs.picture_dir()
                .map(|p| p.to_path_buf())
                .or_else(|| Some(dirs.home_dir().to_path_buf()))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Page size and column count for a viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
}

impl Viewport {
    pub fn new(width: u32) -> Self {
        Self { width }
    }

    pub fn is_wide(&self) -> bool {
        self.width >= WIDE_BREAKPOINT_PX
    }

    pub fn page_size(&self) -> usize {
        if self.is_wide() {
            WIDE_PAGE_SIZE
        } else {
            NARROW_PAGE_SIZE
        }
    }

    pub fn columns(&self) -> usize {
        if self.is_wide() {
            WIDE_COLUMNS
        } else {
            NARROW_COLUMNS
        }
    }
}
