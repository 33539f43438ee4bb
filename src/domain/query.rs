//! Query descriptor: which page of which dataset, filtered and sorted how

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{PagingError, PagingResult};
use crate::shared::RowRange;

pub const DEFAULT_ORDER_BY: &str = "created_at";

/// Case-insensitive substring search on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpec {
    pub field: String,
    pub term: String,
}

impl SearchSpec {
    pub fn new(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            term: term.into(),
        }
    }
}

/// Immutable page request. Field names are in remote (snake_case) style.
///
/// Every change produces a new descriptor; equality is structural, so two
/// descriptors built from the same inputs compare equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    dataset_id: String,
    page_index: u64,
    page_size: u64,
    order_by: String,
    ascending: bool,
    filters: BTreeMap<String, Value>,
    search: Option<SearchSpec>,
}

impl QueryDescriptor {
    /// Page 0 of `dataset_id`, newest `created_at` first, no filters.
    pub fn new(dataset_id: impl Into<String>, page_size: u64) -> PagingResult<Self> {
        if page_size == 0 {
            return Err(PagingError::InvalidPageSize(page_size));
        }
        Ok(Self {
            dataset_id: dataset_id.into(),
            page_index: 0,
            page_size,
            order_by: DEFAULT_ORDER_BY.to_string(),
            ascending: false,
            filters: BTreeMap::new(),
            search: None,
        })
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    pub fn ascending(&self) -> bool {
        self.ascending
    }

    pub fn filters(&self) -> &BTreeMap<String, Value> {
        &self.filters
    }

    pub fn search(&self) -> Option<&SearchSpec> {
        self.search.as_ref()
    }

    /// Rows covered by this page
    pub fn range(&self) -> RowRange {
        RowRange::for_page(self.page_index, self.page_size)
    }

    pub fn with_page(mut self, page_index: u64) -> Self {
        self.page_index = page_index;
        self
    }

    pub fn with_page_size(mut self, page_size: u64) -> PagingResult<Self> {
        if page_size == 0 {
            return Err(PagingError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        Ok(self)
    }

    pub fn with_order(mut self, order_by: impl Into<String>, ascending: bool) -> Self {
        self.order_by = order_by.into();
        self.ascending = ascending;
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn with_filters(mut self, filters: BTreeMap<String, Value>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_search(mut self, search: Option<SearchSpec>) -> Self {
        self.search = search;
        self
    }

    /// Same listing apart from the page index
    pub fn same_criteria(&self, other: &Self) -> bool {
        self.dataset_id == other.dataset_id
            && self.page_size == other.page_size
            && self.order_by == other.order_by
            && self.ascending == other.ascending
            && self.filters == other.filters
            && self.search == other.search
    }
}
