use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while scanning a media folder.
///
/// These never cross the `MediaSource` boundary: the source logs them and
/// returns an empty list.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("media folder '{path}' does not exist")]
    MissingFolder { path: PathBuf },

    #[error("failed to walk '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("scan task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);
