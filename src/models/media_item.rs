use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::UnknownCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "webp" | "gif" => Some(Self::Image),
            "mp4" | "mov" | "avi" | "webm" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Gallery category. Each one maps to a folder under the media root and
/// only carries one kind of media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Photography,
    Web,
    Videos,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Photography, Category::Web, Category::Videos];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photography => "photography",
            Self::Web => "web",
            Self::Videos => "videos",
        }
    }

    /// Folder under the media root holding this category's files.
    pub fn folder(self) -> &'static str {
        match self {
            Self::Photography => "images",
            Self::Web => "web",
            Self::Videos => "videos",
        }
    }

    pub fn kind(self) -> MediaKind {
        match self {
            Self::Photography | Self::Web => MediaKind::Image,
            Self::Videos => MediaKind::Video,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "photography" | "photos" | "images" => Ok(Self::Photography),
            "web" => Ok(Self::Web),
            "videos" | "video" => Ok(Self::Videos),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// One photo or video record. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub id: String,
    pub url: String,
    pub kind: MediaKind,
    pub width: u32,
    pub height: u32,
    pub category: Category,
    pub title: String,
    /// Creation time in unix seconds.
    pub created_at: i64,
}

impl MediaItem {
    /// Create an item from its file name inside the category folder. The
    /// id keeps the extension so `cover.png` and `cover.jpg` stay distinct;
    /// the title is built from the stem alone.
    pub fn new(category: Category, file_name: &str, url: String, width: u32, height: u32) -> Self {
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);
        Self {
            id: format!("{}-{}", category.as_str(), file_name),
            url,
            kind: category.kind(),
            width,
            height,
            category,
            title: title_from_stem(stem),
            created_at: 0,
        }
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}

/// "brand-shoot_02" -> "Brand Shoot 02"
pub fn title_from_stem(stem: &str) -> String {
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
