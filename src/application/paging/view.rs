//! Pager control strip state
//!
//! Pure projection of a [`PagingSnapshot`]: which buttons are enabled and
//! the "showing X-Y of Z" label. No filtering or sorting happens here.

use std::fmt;

use serde::Serialize;

use super::facade::PagingSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagerView {
    pub page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub page_size: u64,
    pub loading: bool,
}

/// 1-based, inclusive row numbers shown on the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShowingRange {
    pub from: u64,
    pub to: u64,
    pub total: u64,
}

impl fmt::Display for ShowingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {}-{} of {}", self.from, self.to, self.total)
    }
}

impl From<&PagingSnapshot> for PagerView {
    fn from(snapshot: &PagingSnapshot) -> Self {
        Self {
            page: snapshot.page,
            total_pages: snapshot.total_pages,
            total_count: snapshot.total_count,
            page_size: snapshot.page_size,
            loading: snapshot.loading,
        }
    }
}

impl PagerView {
    /// Nothing to render
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    pub fn can_go_first(&self) -> bool {
        self.page > 0
    }

    pub fn can_go_previous(&self) -> bool {
        self.page > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }

    pub fn can_go_last(&self) -> bool {
        self.can_go_next()
    }

    pub fn last_page(&self) -> Option<u64> {
        self.total_pages.checked_sub(1)
    }

    pub fn showing(&self) -> Option<ShowingRange> {
        if self.is_empty() || self.page >= self.total_pages {
            return None;
        }
        let start = self.page.saturating_mul(self.page_size);
        Some(ShowingRange {
            from: start + 1,
            to: start.saturating_add(self.page_size).min(self.total_count),
            total: self.total_count,
        })
    }
}
