//! One gallery instance: paging, staggered reveal and the viewer.
//!
//! All state is mutated by the task that owns the `Gallery`. Fetches and
//! timers run elsewhere and only post `GalleryEvent`s back; each event
//! carries the mount/request/generation it was issued under and is
//! dropped if that is no longer current.

pub mod pager;
pub mod reveal;
pub mod scheduler;
pub mod transition;

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use flume::{Receiver, Sender};
use tracing::{debug, info, trace, warn};
use xxhash_rust::xxh3::Xxh3;

use crate::config::{GalleryConfig, Viewport};
use crate::models::{Category, MediaItem, RevealRow};
use crate::source::MediaSource;
use crate::ui::keybindings::{Key, Pointer};
use crate::ui::scroll_lock::ScrollLock;
use crate::ui::viewer::{ViewerModal, ViewerOutcome};
use crate::video::player::VideoPlayer;

pub use pager::GalleryPager;
pub use reveal::{IncrementalRevealer, RevealState};
pub use scheduler::{Scheduler, TimerGroup};
pub use transition::TransitionLock;

static NEXT_MOUNT: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
pub enum GalleryEvent {
    ItemsLoaded {
        mount: u64,
        request: u64,
        items: Vec<MediaItem>,
    },
    RevealRow {
        generation: u64,
        row: RevealRow,
    },
    TransitionElapsed {
        token: u64,
    },
}

pub struct Gallery {
    category: Category,
    viewport: Viewport,
    transition_duration: Duration,
    revealer: IncrementalRevealer,
    fetch_limit: Option<usize>,

    pager: GalleryPager,
    revealed: RevealState,
    lock: TransitionLock,
    /// Bumped on every page, page-size or list change.
    generation: u64,
    transition_seq: u64,
    fingerprint: Option<u64>,
    loading: bool,
    in_view: bool,

    mount: u64,
    alive: Arc<AtomicBool>,
    request: u64,

    scheduler: Scheduler,
    tx: Sender<GalleryEvent>,
    rx: Receiver<GalleryEvent>,

    viewer: Option<ViewerModal>,
    open_index: Option<usize>,
    player: VideoPlayer,
    scroll_lock: ScrollLock,
}

impl Gallery {
    pub fn new(
        config: &GalleryConfig,
        category: Category,
        viewport_width: u32,
        scroll_lock: ScrollLock,
    ) -> Self {
        let viewport = Viewport::new(viewport_width);
        let (tx, rx) = flume::unbounded();
        Self {
            category,
            viewport,
            transition_duration: config.transition_duration,
            revealer: IncrementalRevealer::new(config.reveal_row_delay),
            fetch_limit: None,
            pager: GalleryPager::empty(viewport.page_size()),
            revealed: RevealState::new(),
            lock: TransitionLock::new(),
            generation: 0,
            transition_seq: 0,
            fingerprint: None,
            loading: false,
            in_view: true,
            mount: NEXT_MOUNT.fetch_add(1, Ordering::Relaxed),
            alive: Arc::new(AtomicBool::new(true)),
            request: 0,
            scheduler: Scheduler::new(tx.clone()),
            tx,
            rx,
            viewer: None,
            open_index: None,
            player: VideoPlayer::new(),
            scroll_lock,
        }
    }

    /// Caps how many items `load` asks the source for.
    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = Some(limit);
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Length of the page-change animation, also the transition lock time.
    pub fn transition_duration(&self) -> Duration {
        self.transition_duration
    }

    pub fn pager(&self) -> &GalleryPager {
        &self.pager
    }

    pub fn current_page(&self) -> &[MediaItem] {
        self.pager.current_page()
    }

    pub fn revealed(&self) -> &RevealState {
        &self.revealed
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_transitioning(&self) -> bool {
        self.lock.is_locked()
    }

    /// Loaded, but nothing to show.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.pager.is_empty()
    }

    pub fn is_mounted(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn viewer(&self) -> Option<&ViewerModal> {
        self.viewer.as_ref()
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open_index
    }

    pub fn player(&self) -> &VideoPlayer {
        &self.player
    }

    /// Fetches this gallery's category. The result arrives as an
    /// `ItemsLoaded` event; a newer `load` supersedes an older one.
    pub fn load<S: MediaSource>(&mut self, source: Arc<S>) {
        self.request += 1;
        self.loading = true;
        self.restart_reveal();

        let tx = self.tx.clone();
        let alive = Arc::clone(&self.alive);
        let (mount, request, category, limit) =
            (self.mount, self.request, self.category, self.fetch_limit);
        debug!(%category, request, "Fetching gallery items");

        tokio::spawn(async move {
            let items = source.fetch_by_category(category, limit).await;
            if !alive.load(Ordering::Acquire) {
                debug!(%category, request, "Gallery unmounted, dropping fetch result");
                return;
            }
            let event = GalleryEvent::ItemsLoaded {
                mount,
                request,
                items,
            };
            if let Err(e) = tx.send_async(event).await {
                warn!(%category, request, error = ?e, "Gallery gone, dropping fetch result");
            }
        });
    }

    #[cfg(test)]
    pub fn events(&self) -> Receiver<GalleryEvent> {
        self.rx.clone()
    }

    /// Waits for the next fetch or timer event. The future holds its own
    /// receiver, so the gallery stays free to mutate while it is pending.
    pub fn next_event(&self) -> impl Future<Output = Option<GalleryEvent>> + 'static {
        let rx = self.rx.clone();
        async move { rx.recv_async().await.ok() }
    }

    /// Applies every event that is already queued. Returns how many changed
    /// state.
    pub fn drain_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Returns whether the event changed state.
    pub fn apply(&mut self, event: GalleryEvent) -> bool {
        if !self.is_mounted() {
            trace!("Ignoring event for unmounted gallery");
            return false;
        }
        match event {
            GalleryEvent::ItemsLoaded {
                mount,
                request,
                items,
            } => {
                if mount != self.mount || request != self.request {
                    debug!(request, latest = self.request, "Ignoring stale fetch result");
                    return false;
                }
                self.loading = false;
                self.set_items(items);
                true
            }
            GalleryEvent::RevealRow { generation, row } => {
                if generation != self.generation {
                    trace!(generation, current = self.generation, "Ignoring stale reveal");
                    return false;
                }
                self.revealed.reveal(&row, self.pager.current_page()) > 0
            }
            GalleryEvent::TransitionElapsed { token } => self.lock.release(token),
        }
    }

    pub fn next_page(&mut self) -> bool {
        if self.lock.is_locked() {
            trace!("Transition in flight, ignoring next");
            return false;
        }
        if !self.pager.next() {
            return false;
        }
        self.begin_transition();
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if self.lock.is_locked() {
            trace!("Transition in flight, ignoring previous");
            return false;
        }
        if !self.pager.previous() {
            return false;
        }
        self.begin_transition();
        true
    }

    /// Returns whether the grid changed shape.
    pub fn resize(&mut self, width: u32) -> bool {
        let viewport = Viewport::new(width);
        let changed = viewport.page_size() != self.viewport.page_size()
            || viewport.columns() != self.viewport.columns();
        self.viewport = viewport;
        if !changed {
            return false;
        }
        self.pager.set_page_size(viewport.page_size());
        debug!(
            width,
            page_size = self.pager.page_size(),
            page = self.pager.page_index(),
            "Viewport breakpoint crossed"
        );
        self.restart_reveal();
        true
    }

    /// The reveal only runs while the gallery is on screen. Leaving the
    /// screen drops the reveal; coming back plays it again.
    pub fn set_in_view(&mut self, in_view: bool) {
        if in_view == self.in_view {
            return;
        }
        self.in_view = in_view;
        self.restart_reveal();
    }

    /// Opens the viewer at `index` in the full list.
    pub fn open_viewer(&mut self, index: usize) -> bool {
        self.close_viewer();
        let items = Arc::clone(self.pager.items());
        match ViewerModal::open(items, index, self.player.clone(), &self.scroll_lock) {
            Some(viewer) => {
                self.open_index = Some(viewer.index());
                self.viewer = Some(viewer);
                true
            }
            None => false,
        }
    }

    /// Opens the viewer at position `slot` of the current page.
    pub fn open_on_page(&mut self, slot: usize) -> bool {
        let range = self.pager.page_range();
        if slot >= range.len() {
            return false;
        }
        self.open_viewer(range.start + slot)
    }

    pub fn viewer_key(&mut self, key: Key) -> ViewerOutcome {
        let outcome = match self.viewer.as_mut() {
            Some(viewer) => viewer.handle_key(key),
            None => return ViewerOutcome::Ignored,
        };
        self.on_viewer_outcome(outcome);
        outcome
    }

    pub fn viewer_pointer(&mut self, pointer: Pointer) -> ViewerOutcome {
        let outcome = match self.viewer.as_mut() {
            Some(viewer) => viewer.handle_pointer(pointer),
            None => return ViewerOutcome::Ignored,
        };
        self.on_viewer_outcome(outcome);
        outcome
    }

    pub fn close_viewer(&mut self) {
        if let Some(viewer) = self.viewer.take() {
            let mut closed = false;
            viewer.close(|| closed = true);
            if closed {
                self.open_index = None;
            }
        }
    }

    /// Tears the gallery down: pending timers are cancelled and any fetch
    /// still in flight will be discarded.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.alive.store(false, Ordering::Release);
        self.generation += 1;
        self.scheduler.cancel_all();
        self.lock.force_release();
        self.close_viewer();
        info!(category = %self.category, mount = self.mount, "Gallery unmounted");
    }

    fn on_viewer_outcome(&mut self, outcome: ViewerOutcome) {
        match outcome {
            ViewerOutcome::IndexChanged(index) => self.open_index = Some(index),
            ViewerOutcome::CloseRequested => self.close_viewer(),
            ViewerOutcome::Ignored => {}
        }
    }

    fn set_items(&mut self, items: Vec<MediaItem>) {
        let fingerprint = list_fingerprint(&items);
        if self.fingerprint == Some(fingerprint) {
            debug!(category = %self.category, "Fetched list unchanged");
            // Loading paused the reveal; pick it back up.
            self.restart_reveal();
            return;
        }
        self.fingerprint = Some(fingerprint);
        info!(category = %self.category, count = items.len(), "Gallery items loaded");
        self.pager.set_items(items.into());
        self.restart_reveal();
    }

    fn begin_transition(&mut self) {
        self.transition_seq += 1;
        let token = self.transition_seq;
        self.lock.try_acquire(token);
        self.scheduler.schedule(
            TimerGroup::Transition,
            self.transition_duration,
            GalleryEvent::TransitionElapsed { token },
        );
        debug!(
            page = self.pager.page_index(),
            pages = self.pager.page_count(),
            "Page transition"
        );
        self.restart_reveal();
    }

    /// Drops the current reveal and, when the gallery can show something,
    /// schedules the current page's rows under a fresh generation.
    fn restart_reveal(&mut self) {
        self.generation += 1;
        self.scheduler.cancel(TimerGroup::Reveal);
        self.revealed.clear();

        if !self.in_view || self.loading || self.pager.is_empty() {
            return;
        }
        let rows = self
            .revealer
            .plan(self.pager.current_page(), self.viewport.columns());
        trace!(generation = self.generation, rows = rows.len(), "Scheduling reveal");
        for row in rows {
            let delay = row.delay;
            self.scheduler.schedule(
                TimerGroup::Reveal,
                delay,
                GalleryEvent::RevealRow {
                    generation: self.generation,
                    row,
                },
            );
        }
    }
}

impl Drop for Gallery {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

/// Order-sensitive hash of the item ids.
pub fn list_fingerprint(items: &[MediaItem]) -> u64 {
    let mut hasher = Xxh3::new();
    for item in items {
        hasher.update(item.id.as_bytes());
        hasher.update(&[0]);
        hasher.update(item.url.as_bytes());
        hasher.update(&[0]);
    }
    hasher.digest()
}
