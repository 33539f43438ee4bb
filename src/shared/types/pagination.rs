//! Page result and row-range types shared by both paginators

use serde::Serialize;

/// Inclusive row window `[from, to]` requested from a range-queryable store.
///
/// `to` is the index of the last row of the page, so a page of size `n`
/// starting at `from` spans `from..=from + n - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowRange {
    pub from: u64,
    pub to: u64,
}

impl RowRange {
    /// Window for a 0-based page index. Saturates instead of overflowing,
    /// which yields a window past any real row.
    pub fn for_page(page_index: u64, page_size: u64) -> Self {
        let from = page_index.saturating_mul(page_size);
        let to = from.saturating_add(page_size.saturating_sub(1));
        Self { from, to }
    }

    /// Number of rows in the window
    pub fn row_count(&self) -> u64 {
        self.to.saturating_sub(self.from).saturating_add(1)
    }
}

/// One page of records plus the totals that describe the whole match set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_more: bool,
    pub page_index: u64,
    pub page_size: u64,
}

impl<T> PageResult<T> {
    /// Build a page, deriving `total_pages` and `has_more` from the count.
    ///
    /// `page_size` must be non-zero; `QueryDescriptor` guarantees this.
    pub fn new(items: Vec<T>, total_count: u64, page_index: u64, page_size: u64) -> Self {
        let total_pages = total_count.div_ceil(page_size);
        let has_more = page_index
            .checked_add(1)
            .and_then(|next| next.checked_mul(page_size))
            .is_some_and(|seen| seen < total_count);
        Self {
            items,
            total_count,
            total_pages,
            has_more,
            page_index,
            page_size,
        }
    }

    /// Zero-count page, used when a fetch fails
    pub fn empty(page_index: u64, page_size: u64) -> Self {
        Self::new(Vec::new(), 0, page_index, page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Expected number of items on a page: `min(size, max(0, total - index * size))`
pub fn expected_page_len(total_count: u64, page_index: u64, page_size: u64) -> u64 {
    match page_index.checked_mul(page_size) {
        Some(start) => total_count.saturating_sub(start).min(page_size),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_upper_bound_is_last_row_of_page() {
        let r = RowRange::for_page(0, 10);
        assert_eq!((r.from, r.to), (0, 9));
        let r = RowRange::for_page(2, 10);
        assert_eq!((r.from, r.to), (20, 29));
        assert_eq!(r.row_count(), 10);
    }

    #[test]
    fn consecutive_ranges_neither_overlap_nor_leave_gaps() {
        for size in 1..=7u64 {
            for page in 0..5u64 {
                let a = RowRange::for_page(page, size);
                let b = RowRange::for_page(page + 1, size);
                assert_eq!(a.to + 1, b.from);
            }
        }
    }

    #[test]
    fn range_overflow_saturates() {
        let r = RowRange::for_page(u64::MAX, 2);
        assert_eq!((r.from, r.to), (u64::MAX, u64::MAX));
    }

    #[test]
    fn totals_for_23_records() {
        let first: PageResult<u8> = PageResult::new(vec![0; 10], 23, 0, 10);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_more);

        let last: PageResult<u8> = PageResult::new(vec![0; 3], 23, 2, 10);
        assert_eq!(last.total_pages, 3);
        assert!(!last.has_more);
    }

    #[test]
    fn zero_count_means_zero_pages() {
        let page: PageResult<u8> = PageResult::empty(0, 10);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_more);
        assert!(page.is_empty());
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let page: PageResult<u8> = PageResult::new(vec![0; 10], 20, 1, 10);
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_more);
    }

    #[test]
    fn expected_len_matches_formula() {
        assert_eq!(expected_page_len(23, 0, 10), 10);
        assert_eq!(expected_page_len(23, 2, 10), 3);
        assert_eq!(expected_page_len(23, 3, 10), 0);
        assert_eq!(expected_page_len(0, 0, 10), 0);
        assert_eq!(expected_page_len(5, u64::MAX, 10), 0);
    }
}
