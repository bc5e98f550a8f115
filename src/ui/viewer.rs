//! Full-screen single item viewer.
//!
//! Navigation wraps around the entire list, independent of the gallery's
//! paging. Video items autoplay when shown; playback is stopped before the
//! viewer reports itself closed, and again if it is dropped without a
//! proper close.

use std::sync::Arc;

use tracing::debug;

use crate::models::MediaItem;
use crate::ui::keybindings::{Key, Pointer};
use crate::ui::scroll_lock::{ScrollLock, ScrollLockGuard};
use crate::video::player::VideoPlayer;

/// What the owner should do after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerOutcome {
    /// The shown item changed to this index.
    IndexChanged(usize),
    CloseRequested,
    Ignored,
}

#[derive(Debug)]
pub struct ViewerModal {
    items: Arc<[MediaItem]>,
    index: usize,
    player: VideoPlayer,
    _scroll: ScrollLockGuard,
}

impl ViewerModal {
    /// Opens at `index` (clamped). Returns `None` for an empty list.
    pub fn open(
        items: Arc<[MediaItem]>,
        index: usize,
        player: VideoPlayer,
        scroll_lock: &ScrollLock,
    ) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        let index = index.min(items.len() - 1);
        let viewer = Self {
            items,
            index,
            player,
            _scroll: scroll_lock.acquire(),
        };
        viewer.show_current();
        Some(viewer)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn current(&self) -> &MediaItem {
        &self.items[self.index]
    }

    pub fn player(&self) -> &VideoPlayer {
        &self.player
    }

    /// Whether prev/next arrows are worth showing.
    pub fn has_navigation(&self) -> bool {
        self.items.len() > 1
    }

    pub fn next(&mut self) -> usize {
        self.go_to((self.index + 1) % self.items.len())
    }

    pub fn previous(&mut self) -> usize {
        let last = self.items.len() - 1;
        self.go_to(if self.index == 0 { last } else { self.index - 1 })
    }

    pub fn handle_key(&mut self, key: Key) -> ViewerOutcome {
        match key {
            Key::Left => ViewerOutcome::IndexChanged(self.previous()),
            Key::Right => ViewerOutcome::IndexChanged(self.next()),
            Key::Escape => ViewerOutcome::CloseRequested,
            Key::Space => {
                if self.current().is_video() {
                    self.player.toggle_pause();
                }
                ViewerOutcome::Ignored
            }
        }
    }

    pub fn handle_pointer(&mut self, pointer: Pointer) -> ViewerOutcome {
        match pointer {
            Pointer::PreviousArrow => ViewerOutcome::IndexChanged(self.previous()),
            Pointer::NextArrow => ViewerOutcome::IndexChanged(self.next()),
            Pointer::CloseButton | Pointer::Backdrop => ViewerOutcome::CloseRequested,
            Pointer::Content => ViewerOutcome::Ignored,
        }
    }

    /// Stops playback, then calls `on_close`. The scroll lock is released
    /// when the viewer drops at the end of this call.
    pub fn close<F: FnOnce()>(self, on_close: F) {
        debug!(index = self.index, "Closing viewer");
        self.player.stop();
        on_close();
    }

    fn go_to(&mut self, index: usize) -> usize {
        if index != self.index {
            self.index = index;
            self.show_current();
        }
        self.index
    }

    fn show_current(&self) {
        let item = self.current();
        if item.is_video() {
            self.player.play(&item.url);
        } else {
            self.player.stop();
        }
    }
}

impl Drop for ViewerModal {
    fn drop(&mut self) {
        self.player.stop();
    }
}
