//! Outbound port: a remote store that can fetch a row range with an exact count
//!
//! [`RangeStore`] is what `RemotePaginator` talks to. Field names in a
//! [`RangeRequest`] are passed through verbatim in the store's own
//! (snake_case) convention; wildcard filters have already been removed.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::PagingResult;
use crate::shared::RowRange;

// ── Request ────────────────────────────────────────────────────

/// Case-insensitive substring constraint; `needle` is trimmed and lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringFilter {
    pub field: String,
    pub needle: String,
}

/// One range fetch against one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct RangeRequest {
    pub dataset: String,
    pub order_by: String,
    pub ascending: bool,
    /// Equality constraints, all of which must hold
    pub equals: Vec<(String, Value)>,
    pub contains: Option<SubstringFilter>,
    pub range: RowRange,
}

// ── Response ───────────────────────────────────────────────────

/// Rows inside the requested range plus the exact number of matching rows
/// ignoring the range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeRows {
    pub rows: Vec<Value>,
    pub exact_count: u64,
}

// ── RangeStore ─────────────────────────────────────────────────

#[async_trait]
pub trait RangeStore: Send + Sync {
    /// Fetch the rows of `request.range` and the exact match count in one
    /// logical round trip.
    async fn fetch_range(&self, request: &RangeRequest) -> PagingResult<RangeRows>;
}
