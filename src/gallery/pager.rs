//! Windowed paging over a shared item list.

use std::ops::Range;
use std::sync::Arc;

use crate::models::MediaItem;

/// A bounded window over a larger item list.
///
/// Invariant: `page_index < page_count()`, where an empty list still has one
/// (empty) page. Navigation saturates at both ends.
#[derive(Debug, Clone)]
pub struct GalleryPager {
    items: Arc<[MediaItem]>,
    page_size: usize,
    page_index: usize,
}

impl GalleryPager {
    /// `page_size` of 0 is treated as 1.
    pub fn new(items: Arc<[MediaItem]>, page_size: usize) -> Self {
        Self {
            items,
            page_size: page_size.max(1),
            page_index: 0,
        }
    }

    pub fn empty(page_size: usize) -> Self {
        Self::new(Arc::from(Vec::new()), page_size)
    }

    pub fn items(&self) -> &Arc<[MediaItem]> {
        &self.items
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.total().div_ceil(self.page_size).max(1)
    }

    /// Index range of the current page within the full list.
    pub fn page_range(&self) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(self.total());
        let end = (start + self.page_size).min(self.total());
        start..end
    }

    pub fn current_page(&self) -> &[MediaItem] {
        &self.items[self.page_range()]
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    /// Returns whether the page changed.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page_index += 1;
        true
    }

    /// Returns whether the page changed.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Returns whether the page size changed. The page index is clamped to
    /// the new last page.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        if page_size == self.page_size {
            return false;
        }
        self.page_size = page_size;
        self.clamp();
        true
    }

    pub fn set_items(&mut self, items: Arc<[MediaItem]>) {
        self.items = items;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.page_index = self.page_index.min(self.page_count() - 1);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Category;

    pub(crate) fn make_items(count: usize) -> Arc<[MediaItem]> {
        (0..count)
            .map(|i| {
                MediaItem::new(
                    Category::Photography,
                    &i.to_string(),
                    format!("/media/images/{i}.jpg"),
                    1600,
                    1200,
                )
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn page_ids(pager: &GalleryPager) -> Vec<String> {
        pager
            .current_page()
            .iter()
            .map(|item| item.id.trim_start_matches("photography-").to_string())
            .collect()
    }

    #[test]
    fn test_ten_items_page_size_three() {
        let mut pager = GalleryPager::new(make_items(10), 3);
        assert_eq!(pager.page_count(), 4);
        assert_eq!(page_ids(&pager), ["0", "1", "2"]);

        assert!(pager.next());
        assert_eq!(page_ids(&pager), ["3", "4", "5"]);
        assert!(pager.next());
        assert_eq!(page_ids(&pager), ["6", "7", "8"]);
        assert!(pager.next());
        assert_eq!(pager.page_index(), 3);
        assert_eq!(page_ids(&pager), ["9"]);

        assert!(!pager.next());
        assert_eq!(pager.page_index(), 3);
    }

    #[test]
    fn test_previous_saturates_at_zero() {
        let mut pager = GalleryPager::new(make_items(5), 2);
        assert!(!pager.previous());
        assert_eq!(pager.page_index(), 0);
        pager.next();
        assert!(pager.previous());
        assert!(!pager.previous());
    }

    #[test]
    fn test_empty_list_has_one_empty_page() {
        let mut pager = GalleryPager::empty(9);
        assert_eq!(pager.page_count(), 1);
        assert!(pager.current_page().is_empty());
        assert!(!pager.next());
        assert!(!pager.previous());
        assert_eq!(pager.page_index(), 0);
    }

    #[test]
    fn test_reachable_pages_match_ceiling() {
        for total in 0..25 {
            for size in 1..7 {
                let mut pager = GalleryPager::new(make_items(total), size);
                let mut reached = 1;
                while pager.next() {
                    reached += 1;
                    assert!(pager.page_index() < pager.page_count());
                }
                assert_eq!(reached, total.div_ceil(size).max(1), "total={total} size={size}");
                while pager.previous() {
                    assert!(pager.page_index() < pager.page_count());
                }
                assert_eq!(pager.page_index(), 0);
            }
        }
    }

    #[test]
    fn test_page_size_change_clamps() {
        let mut pager = GalleryPager::new(make_items(20), 3);
        for _ in 0..6 {
            pager.next();
        }
        assert_eq!(pager.page_index(), 6);

        // 20 items in pages of 9 -> 3 pages, so index 6 clamps to 2.
        assert!(pager.set_page_size(9));
        assert_eq!(pager.page_index(), 2);
        assert_eq!(pager.current_page().len(), 2);

        // Shrinking keeps the index when it is still in range.
        assert!(pager.set_page_size(3));
        assert_eq!(pager.page_index(), 2);
        assert!(!pager.set_page_size(3));
    }

    #[test]
    fn test_zero_page_size_is_one() {
        let mut pager = GalleryPager::new(make_items(2), 0);
        assert_eq!(pager.page_size(), 1);
        assert!(!pager.set_page_size(0));
        assert_eq!(pager.page_count(), 2);
    }

    #[test]
    fn test_shrinking_list_clamps() {
        let mut pager = GalleryPager::new(make_items(10), 3);
        pager.next();
        pager.next();
        pager.set_items(make_items(4));
        assert_eq!(pager.page_index(), 1);
        pager.set_items(make_items(0));
        assert_eq!(pager.page_index(), 0);
        assert!(pager.current_page().is_empty());
    }

    #[test]
    fn test_items_are_shared_not_copied() {
        let items = make_items(4);
        let pager = GalleryPager::new(Arc::clone(&items), 2);
        assert!(Arc::ptr_eq(pager.items(), &items));
    }
}
