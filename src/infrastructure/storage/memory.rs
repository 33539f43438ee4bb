//! In-memory range store implementation

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::domain::filters::{compare_sort_keys, contains_folded, values_equal};
use crate::domain::{PagingError, PagingResult, RangeRequest, RangeRows, RangeStore};

/// In-memory datasets served through the remote range contract, for
/// development and testing. Field names are used exactly as given.
pub struct InMemoryRangeStore {
    datasets: DashMap<String, Vec<Value>>,
    fetch_counter: AtomicUsize,
}

impl InMemoryRangeStore {
    pub fn new() -> Self {
        Self {
            datasets: DashMap::new(),
            fetch_counter: AtomicUsize::new(0),
        }
    }

    /// Insert or replace a dataset
    pub fn insert_dataset(&self, name: impl Into<String>, rows: Vec<Value>) {
        self.datasets.insert(name.into(), rows);
    }

    pub fn remove_dataset(&self, name: &str) -> Option<Vec<Value>> {
        self.datasets.remove(name).map(|(_, rows)| rows)
    }

    /// Number of range fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetch_counter.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryRangeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RangeStore for InMemoryRangeStore {
    async fn fetch_range(&self, request: &RangeRequest) -> PagingResult<RangeRows> {
        self.fetch_counter.fetch_add(1, Ordering::SeqCst);

        let dataset = self
            .datasets
            .get(&request.dataset)
            .ok_or_else(|| PagingError::UnknownDataset(request.dataset.clone()))?;

        let mut matched: Vec<&Value> = dataset
            .iter()
            .filter(|row| {
                request.equals.iter().all(|(field, expected)| {
                    row.get(field.as_str())
                        .is_some_and(|actual| values_equal(actual, expected))
                })
            })
            .filter(|row| match &request.contains {
                Some(search) => contains_folded(row.get(search.field.as_str()), &search.needle),
                None => true,
            })
            .collect();

        matched.sort_by(|a, b| {
            compare_sort_keys(
                a.get(request.order_by.as_str()),
                b.get(request.order_by.as_str()),
                request.ascending,
            )
        });

        let exact_count = matched.len() as u64;
        let skip = usize::try_from(request.range.from).unwrap_or(usize::MAX);
        let take = usize::try_from(request.range.row_count()).unwrap_or(usize::MAX);
        let rows = matched.into_iter().skip(skip).take(take).cloned().collect();

        Ok(RangeRows { rows, exact_count })
    }
}
