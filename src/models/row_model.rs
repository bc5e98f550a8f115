use std::time::Duration;

/// One row of the visible page, revealed together after `delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealRow {
    pub row_index: u32,
    pub delay: Duration,
    pub item_ids: Vec<String>,
}

impl RevealRow {
    pub fn new(row_index: u32, delay: Duration, item_ids: Vec<String>) -> Self {
        Self {
            row_index,
            delay,
            item_ids,
        }
    }
}
