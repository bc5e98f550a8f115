//! Interactive terminal session.
//!
//! Reads one command per line from stdin and drives a single gallery. Fetch
//! results and timer events are applied as they arrive, between commands.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::config::{GalleryConfig, OVERVIEW_LIMIT};
use crate::gallery::Gallery;
use crate::layout::ScrollWindow;
use crate::models::{Category, MediaItem};
use crate::source::{fetch_overview, MediaSource};
use crate::ui::keybindings::{Action, Keybindings, ViewMode, HELP};
use crate::ui::scroll_lock::ScrollLock;
use crate::ui::viewer::ViewerOutcome;
use crate::video::player::VideoPlayer;

const DEFAULT_WIDTH: u32 = 1280;

/// Height of the simulated feed viewport, in px.
const FEED_VIEWPORT_PX: f64 = 900.0;
/// Height of one feed row, in px.
const FEED_ROW_PX: f64 = 420.0;

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

pub struct Session<S: MediaSource> {
    config: GalleryConfig,
    source: Arc<S>,
    scroll_lock: ScrollLock,
    width: u32,
    gallery: Gallery,
    feed: ScrollWindow,
}

impl<S: MediaSource> Session<S> {
    /// Must be called from within a tokio runtime; the first fetch starts
    /// immediately.
    pub fn new(config: GalleryConfig, source: Arc<S>, category: Category) -> Self {
        let scroll_lock = ScrollLock::new();
        let mut gallery = Gallery::new(&config, category, DEFAULT_WIDTH, scroll_lock.clone())
            .with_fetch_limit(config.fetch_limit);
        gallery.load(Arc::clone(&source));
        Self {
            config,
            source,
            scroll_lock,
            width: DEFAULT_WIDTH,
            gallery,
            feed: ScrollWindow::new(0),
        }
    }

    /// Grid commands only apply while no overlay holds the scroll lock.
    pub fn mode(&self) -> ViewMode {
        if self.scroll_lock.is_locked() {
            ViewMode::Viewer
        } else {
            ViewMode::Grid
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("{HELP}");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read command from stdin")? else {
                        debug!("stdin closed");
                        break;
                    };
                    match self.handle_line(&line).await {
                        Flow::Continue(text) if text.is_empty() => {}
                        Flow::Continue(text) => println!("{text}"),
                        Flow::Quit => break,
                    }
                }
                Some(event) = self.gallery.next_event() => {
                    if self.gallery.apply(event) {
                        self.sync_feed();
                    }
                }
            }
        }

        self.gallery.unmount();
        info!("Session ended");
        Ok(())
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        // Anything already delivered should be visible to this command.
        if self.gallery.drain_pending() > 0 {
            self.sync_feed();
        }

        let Some(action) = Keybindings::resolve(self.mode(), line) else {
            return Flow::Continue(String::new());
        };
        debug!(?action, "Command");

        match action {
            Action::Feed | Action::Overview => self.gallery.set_in_view(false),
            Action::Show | Action::NextPage | Action::PreviousPage | Action::Resize(_) => {
                self.gallery.set_in_view(true)
            }
            _ => {}
        }

        let text = match action {
            Action::Quit => return Flow::Quit,
            Action::Help => HELP.to_string(),
            Action::Invalid(message) => message,
            Action::NextPage => {
                if !self.gallery.next_page() {
                    return Flow::Continue(self.stuck_message());
                }
                render_grid(&self.gallery)
            }
            Action::PreviousPage => {
                if !self.gallery.previous_page() {
                    return Flow::Continue(self.stuck_message());
                }
                render_grid(&self.gallery)
            }
            Action::Open(slot) => {
                if self.gallery.open_on_page(slot) {
                    render_viewer(&self.gallery)
                } else {
                    format!("no item {slot} on this page")
                }
            }
            Action::Resize(width) => {
                self.width = width;
                self.gallery.resize(width);
                render_grid(&self.gallery)
            }
            Action::SwitchCategory(category) => {
                self.switch_category(category);
                format!("loading {category}")
            }
            Action::Reload => {
                self.gallery.load(Arc::clone(&self.source));
                format!("reloading {}", self.gallery.category())
            }
            Action::Show => render_grid(&self.gallery),
            Action::Feed => render_feed(&self.gallery, &self.feed),
            Action::More => {
                if self.feed.is_complete() {
                    return Flow::Continue("end of feed".to_string());
                }
                let rows = self.feed.visible_count().div_ceil(3) as f64;
                let document = rows * FEED_ROW_PX;
                self.feed.on_scroll(FEED_VIEWPORT_PX, document - FEED_VIEWPORT_PX, document);
                render_feed(&self.gallery, &self.feed)
            }
            Action::Overview => {
                let overview = fetch_overview(self.source.as_ref(), OVERVIEW_LIMIT).await;
                let mut out = String::new();
                for category in Category::ALL {
                    let _ = writeln!(out, "{category}:");
                    for item in overview.get(category) {
                        let _ = writeln!(out, "  {}", describe(item));
                    }
                }
                out.trim_end().to_string()
            }
            Action::ViewerKey(key) => {
                let outcome = self.gallery.viewer_key(key);
                self.viewer_reply(outcome)
            }
            Action::ViewerPointer(pointer) => {
                let outcome = self.gallery.viewer_pointer(pointer);
                self.viewer_reply(outcome)
            }
        };
        Flow::Continue(text)
    }

    fn viewer_reply(&self, outcome: ViewerOutcome) -> String {
        match outcome {
            ViewerOutcome::IndexChanged(_) => render_viewer(&self.gallery),
            ViewerOutcome::CloseRequested => render_grid(&self.gallery),
            ViewerOutcome::Ignored => match self.gallery.player().current_source() {
                Some(source) if self.gallery.viewer().is_some() => {
                    format!("{}: {source}", playback_status(self.gallery.player()))
                }
                _ => String::new(),
            },
        }
    }

    fn stuck_message(&self) -> String {
        if self.gallery.is_transitioning() {
            "transition in progress".to_string()
        } else if self.gallery.is_loading() {
            "still loading".to_string()
        } else {
            "no more pages that way".to_string()
        }
    }

    fn switch_category(&mut self, category: Category) {
        self.gallery.unmount();
        let mut gallery = Gallery::new(&self.config, category, self.width, self.scroll_lock.clone())
            .with_fetch_limit(self.config.fetch_limit);
        gallery.load(Arc::clone(&self.source));
        self.gallery = gallery;
        self.feed = ScrollWindow::new(0);
        info!(%category, "Switched category");
    }

    fn sync_feed(&mut self) {
        self.feed.set_total(self.gallery.pager().total());
    }
}

fn describe(item: &MediaItem) -> String {
    let kind = if item.is_video() { "video" } else { "image" };
    format!(
        "{} \"{}\" {kind} {}x{} {}",
        item.id, item.title, item.width, item.height, item.url
    )
}

pub fn render_grid(gallery: &Gallery) -> String {
    let pager = gallery.pager();
    let viewport = gallery.viewport();
    let mut out = String::new();

    if gallery.is_loading() {
        return format!("{}: loading", gallery.category());
    }
    if gallery.is_empty() {
        return format!("{}: nothing here yet", gallery.category());
    }

    let _ = write!(
        out,
        "{}: page {}/{} ({} items, {} per page, {} col)",
        gallery.category(),
        pager.page_index() + 1,
        pager.page_count(),
        pager.total(),
        pager.page_size(),
        viewport.columns(),
    );
    if !gallery.revealed().is_empty() {
        let _ = write!(
            out,
            " revealed {}/{}",
            gallery.revealed().len(),
            gallery.current_page().len()
        );
    }
    if gallery.is_transitioning() {
        let _ = write!(out, " sliding {}ms", gallery.transition_duration().as_millis());
    }
    out.push('\n');
    for (slot, item) in gallery.current_page().iter().enumerate() {
        let mark = if gallery.is_revealed(&item.id) { '*' } else { ' ' };
        let _ = writeln!(out, "{mark}[{slot}] {}", describe(item));
    }
    out.trim_end().to_string()
}

pub fn render_viewer(gallery: &Gallery) -> String {
    let (Some(viewer), Some(index)) = (gallery.viewer(), gallery.open_index()) else {
        return "viewer closed".to_string();
    };
    let item = viewer.current();
    let mut out = format!("viewer {}/{}: {}", index + 1, viewer.len(), describe(item));
    if item.is_video() {
        let _ = write!(out, " [{}]", playback_status(gallery.player()));
    }
    if viewer.has_navigation() {
        out.push_str("\n  < prev | next >");
    }
    out
}

fn playback_status(player: &VideoPlayer) -> String {
    format!(
        "{:?} {:.1}s",
        player.playback_state(),
        player.position().as_secs_f64()
    )
}

fn render_feed(gallery: &Gallery, feed: &ScrollWindow) -> String {
    let items = gallery.pager().items();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} feed: {}/{}",
        gallery.category(),
        feed.visible_count(),
        feed.total()
    );
    for item in feed.visible(items) {
        let _ = writeln!(out, "  {}", describe(item));
    }
    out.trim_end().to_string()
}
