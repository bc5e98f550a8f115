mod app;
mod config;
mod error;
mod gallery;
mod layout;
mod models;
mod scanner;
mod source;
mod ui;
mod video;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::Session;
use config::GalleryConfig;
use models::Category;
use source::DirectoryMediaSource;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("folio=info".parse().context("Invalid log directive")?),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let mut config = GalleryConfig::from_env();
    if let Some(root) = args.next() {
        config.media_root = PathBuf::from(root);
    }
    let category = match args.next() {
        Some(name) => name.parse::<Category>()?,
        None => Category::Photography,
    };

    ensure!(
        config.media_root.is_dir(),
        "Media root {} is not a directory",
        config.media_root.display()
    );
    info!(root = %config.media_root.display(), %category, "Starting folio");

    let source = Arc::new(DirectoryMediaSource::from_config(&config));
    Session::new(config, source, category).run().await
}
