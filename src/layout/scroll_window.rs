//! "Load more on scroll" window for long, unpaged feeds.
//!
//! The feed starts with a fixed number of items and grows by a step each
//! time the reader scrolls close to the bottom of the document.

/// Items shown before any scrolling.
pub const INITIAL_VISIBLE: usize = 12;

/// Items added per load-more.
pub const LOAD_STEP: usize = 6;

/// Distance from the bottom (px) that triggers a load-more.
pub const LOAD_THRESHOLD_PX: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollWindow {
    total: usize,
    visible: usize,
}

impl ScrollWindow {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            visible: INITIAL_VISIBLE.min(total),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// The visible prefix of `items`.
    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible.min(items.len())]
    }

    pub fn is_complete(&self) -> bool {
        self.visible >= self.total
    }

    /// Keeps what is already visible when the list grows; never shows more
    /// than the list holds.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.visible = self.visible.max(INITIAL_VISIBLE).min(total);
    }

    /// Returns whether more items became visible.
    pub fn on_scroll(&mut self, viewport_height: f64, scroll_y: f64, document_height: f64) -> bool {
        if viewport_height + scroll_y < document_height - LOAD_THRESHOLD_PX {
            return false;
        }
        let before = self.visible;
        self.visible = (self.visible + LOAD_STEP).min(self.total);
        self.visible != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_window() {
        assert_eq!(ScrollWindow::new(40).visible_count(), 12);
        assert_eq!(ScrollWindow::new(5).visible_count(), 5);
        assert!(ScrollWindow::new(0).is_complete());
    }

    #[test]
    fn test_far_from_bottom_does_nothing() {
        let mut window = ScrollWindow::new(40);
        assert!(!window.on_scroll(900.0, 0.0, 5000.0));
        assert_eq!(window.visible_count(), 12);
    }

    #[test]
    fn test_near_bottom_grows_until_total() {
        let mut window = ScrollWindow::new(20);
        assert!(window.on_scroll(900.0, 3200.0, 5000.0));
        assert_eq!(window.visible_count(), 18);
        assert!(window.on_scroll(900.0, 3200.0, 5000.0));
        assert_eq!(window.visible_count(), 20);
        assert!(!window.on_scroll(900.0, 3200.0, 5000.0));
        assert!(window.is_complete());
        let items: Vec<u32> = (0..20).collect();
        assert_eq!(window.visible(&items[..15]).len(), 15);
    }

    #[test]
    fn test_set_total_clamps() {
        let mut window = ScrollWindow::new(30);
        window.on_scroll(1.0, 0.0, 0.0);
        assert_eq!(window.visible_count(), 18);
        window.set_total(10);
        assert_eq!(window.visible_count(), 10);
        window.set_total(50);
        assert_eq!(window.visible_count(), 12);
    }
}
