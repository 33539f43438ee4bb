//! Remote paginator: one range fetch with exact count per request

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{DataSourceMode, PageFetch, Paginator};
use crate::domain::filters::{effective_filters, search_needle};
use crate::domain::{
    PagingError, PagingResult, QueryDescriptor, RangeRequest, RangeStore, SubstringFilter,
    WildcardSet,
};
use crate::shared::PageResult;

pub struct RemotePaginator {
    store: Arc<dyn RangeStore>,
    wildcards: WildcardSet,
    timeout: Option<Duration>,
}

impl RemotePaginator {
    pub fn new(store: Arc<dyn RangeStore>) -> Self {
        Self {
            store,
            wildcards: WildcardSet::default(),
            timeout: None,
        }
    }

    pub fn with_wildcards(mut self, wildcards: WildcardSet) -> Self {
        self.wildcards = wildcards;
        self
    }

    /// Bound each round trip; expiry is reported as [`PagingError::Timeout`].
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Translate a descriptor into the store request. Field names pass
    /// through unchanged.
    pub fn build_request(&self, query: &QueryDescriptor) -> RangeRequest {
        let equals = effective_filters(query.filters(), &self.wildcards)
            .into_iter()
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect();

        let contains = query.search().and_then(|search| {
            search_needle(&search.term).map(|needle| SubstringFilter {
                field: search.field.clone(),
                needle,
            })
        });

        RangeRequest {
            dataset: query.dataset_id().to_string(),
            order_by: query.order_by().to_string(),
            ascending: query.ascending(),
            equals,
            contains,
            range: query.range(),
        }
    }

    /// Fetch one page, propagating store failures.
    pub async fn fetch_page(&self, query: &QueryDescriptor) -> PagingResult<PageResult<Value>> {
        let request = self.build_request(query);
        debug!(
            dataset = %request.dataset,
            from = request.range.from,
            to = request.range.to,
            filters = request.equals.len(),
            search = request.contains.is_some(),
            "Remote range fetch"
        );

        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.store.fetch_range(&request))
                .await
                .map_err(|_| PagingError::Timeout(limit))??,
            None => self.store.fetch_range(&request).await?,
        };

        let mut rows = response.rows;
        let limit = usize::try_from(query.page_size()).unwrap_or(usize::MAX);
        if rows.len() > limit {
            warn!(
                dataset = %request.dataset,
                returned = rows.len(),
                page_size = query.page_size(),
                "Store returned more rows than requested, truncating"
            );
            rows.truncate(limit);
        }

        Ok(PageResult::new(
            rows,
            response.exact_count,
            query.page_index(),
            query.page_size(),
        ))
    }
}

#[async_trait]
impl Paginator for RemotePaginator {
    fn mode(&self) -> DataSourceMode {
        DataSourceMode::Remote
    }

    async fn fetch(&self, query: &QueryDescriptor) -> PageFetch {
        match self.fetch_page(query).await {
            Ok(page) => {
                debug!(
                    dataset = %query.dataset_id(),
                    page = query.page_index(),
                    items = page.items.len(),
                    total = page.total_count,
                    "Remote page ready"
                );
                PageFetch::ok(page)
            }
            Err(err) => {
                warn!(
                    dataset = %query.dataset_id(),
                    page = query.page_index(),
                    transient = err.is_transient(),
                    error = %err,
                    "Remote page fetch failed"
                );
                PageFetch::failed(query, err)
            }
        }
    }
}
