//! Fixed-column grid rows for a page of items.

/// A run of items that share one grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBreak {
    pub row_index: u32,
    /// Start index in the page (inclusive)
    pub start_index: usize,
    /// End index in the page (exclusive)
    pub end_index: usize,
}

/// Items are placed left to right, `columns` per row, in list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    columns: usize,
}

impl GridLayout {
    /// A column count of 0 is treated as 1.
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
        }
    }

    /// Row breaks for `item_count` items. No rows for an empty page.
    pub fn compute_breaks(&self, item_count: usize) -> Vec<RowBreak> {
        (0..item_count)
            .step_by(self.columns)
            .enumerate()
            .map(|(row, start)| RowBreak {
                row_index: row as u32,
                start_index: start,
                end_index: (start + self.columns).min(item_count),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_columns() {
        let breaks = GridLayout::new(3).compute_breaks(7);
        let spans: Vec<_> = breaks.iter().map(|b| (b.start_index, b.end_index)).collect();
        assert_eq!(spans, [(0, 3), (3, 6), (6, 7)]);
        assert_eq!(breaks[2].row_index, 2);
        assert_eq!(breaks[2].end_index - breaks[2].start_index, 1);
    }

    #[test]
    fn test_single_column() {
        let breaks = GridLayout::new(1).compute_breaks(3);
        assert_eq!(breaks.len(), 3);
        assert!(breaks.iter().all(|b| b.end_index - b.start_index == 1));
    }

    #[test]
    fn test_empty_page() {
        assert!(GridLayout::new(3).compute_breaks(0).is_empty());
    }

    #[test]
    fn test_zero_columns_is_one() {
        let breaks = GridLayout::new(0).compute_breaks(2);
        assert_eq!(breaks.len(), 2);
        assert_eq!(breaks[1].row_index, 1);
    }
}
