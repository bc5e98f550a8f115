//! Staggered, row-by-row reveal of the visible page.
//!
//! Reveal state is cosmetic. It never gates which items are on the page,
//! only whether the renderer has animated them in yet.

use std::collections::HashSet;
use std::time::Duration;

use crate::layout::GridLayout;
use crate::models::{MediaItem, RevealRow};

/// Plans reveal rows for a page: row `r` appears after `r * row_delay`.
#[derive(Debug, Clone, Copy)]
pub struct IncrementalRevealer {
    row_delay: Duration,
}

impl IncrementalRevealer {
    pub fn new(row_delay: Duration) -> Self {
        Self { row_delay }
    }

    pub fn plan(&self, page: &[MediaItem], columns: usize) -> Vec<RevealRow> {
        GridLayout::new(columns)
            .compute_breaks(page.len())
            .into_iter()
            .map(|brk| {
                let ids = page[brk.start_index..brk.end_index]
                    .iter()
                    .map(|item| item.id.clone())
                    .collect();
                RevealRow::new(brk.row_index, self.row_delay * brk.row_index, ids)
            })
            .collect()
    }
}

/// Ids of items currently marked visible.
#[derive(Debug, Clone, Default)]
pub struct RevealState {
    ids: HashSet<String>,
}

impl RevealState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the row's ids visible, skipping any that are not on `page`.
    /// Returns how many ids were newly revealed.
    pub fn reveal(&mut self, row: &RevealRow, page: &[MediaItem]) -> usize {
        row.item_ids
            .iter()
            .filter(|id| page.iter().any(|item| &item.id == *id))
            .filter(|id| self.ids.insert((*id).clone()))
            .count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::pager::tests::make_items;

    #[test]
    fn test_plan_wide_page() {
        let items = make_items(9);
        let rows = IncrementalRevealer::new(Duration::from_millis(300)).plan(&items, 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].delay, Duration::ZERO);
        assert_eq!(rows[2].delay, Duration::from_millis(600));
        assert_eq!(rows[1].item_ids, ["photography-3", "photography-4", "photography-5"]);
    }

    #[test]
    fn test_plan_delays_increase() {
        let items = make_items(5);
        let rows = IncrementalRevealer::new(Duration::from_millis(300)).plan(&items, 1);
        assert_eq!(rows.len(), 5);
        assert!(rows.windows(2).all(|w| w[0].delay < w[1].delay));
    }

    #[test]
    fn test_reveal_ignores_foreign_ids() {
        let items = make_items(6);
        let page = &items[0..3];
        let mut state = RevealState::new();
        let row = RevealRow::new(
            0,
            Duration::ZERO,
            vec!["photography-0".into(), "photography-4".into()],
        );
        assert_eq!(state.reveal(&row, page), 1);
        assert!(state.contains("photography-0"));
        assert!(!state.contains("photography-4"));
        // Revealing twice is a no-op.
        assert_eq!(state.reveal(&row, page), 0);
        assert_eq!(state.len(), 1);
    }
}
