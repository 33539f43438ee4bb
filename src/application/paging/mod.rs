//! List paging
//!
//! One [`Paginator`] contract with two execution strategies:
//!
//! - [`RemotePaginator`]: one range fetch per request against a [`RangeStore`]
//! - [`LocalPaginator`]: filter, search, sort and slice an in-memory collection
//!
//! [`PaginationFacade`] drives whichever is active for a single list view.
//!
//! [`RangeStore`]: crate::domain::RangeStore

pub mod facade;
pub mod local;
pub mod remote;
pub mod view;

#[cfg(test)]
mod conformance;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{PagingError, QueryDescriptor};
use crate::shared::PageResult;

pub use facade::{FacadeStatus, PaginationFacade, PagingSnapshot};
pub use local::{LocalPaginator, RecordPredicate};
pub use remote::RemotePaginator;
pub use view::{PagerView, ShowingRange};

/// Where a list view's data comes from. Chosen once per view mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceMode {
    Remote,
    Local,
}

impl std::fmt::Display for DataSourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSourceMode::Remote => write!(f, "remote"),
            DataSourceMode::Local => write!(f, "local"),
        }
    }
}

/// Outcome of one page request.
///
/// A failed fetch still carries a valid, empty page; the failure travels in
/// `error` so callers never have to unwind.
#[derive(Debug)]
pub struct PageFetch {
    pub page: PageResult<Value>,
    pub error: Option<PagingError>,
}

impl PageFetch {
    pub fn ok(page: PageResult<Value>) -> Self {
        Self { page, error: None }
    }

    pub fn failed(query: &QueryDescriptor, error: PagingError) -> Self {
        Self {
            page: PageResult::empty(query.page_index(), query.page_size()),
            error: Some(error),
        }
    }
}

#[async_trait]
pub trait Paginator: Send + Sync {
    fn mode(&self) -> DataSourceMode;

    /// Execute `query` and return its page. Never panics or propagates
    /// store errors.
    async fn fetch(&self, query: &QueryDescriptor) -> PageFetch;
}
