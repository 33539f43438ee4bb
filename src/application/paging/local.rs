//! Local paginator: the remote contract over an in-memory collection
//!
//! Descriptors arrive with remote-style (snake_case) field names. Filter
//! keys, `order_by` and the search field are converted to camelCase before
//! they touch the records, so one descriptor literal works for both modes.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{DataSourceMode, PageFetch, Paginator};
use crate::domain::filters::{
    compare_sort_keys, contains_folded, effective_filters, search_needle, values_equal,
};
use crate::domain::{snake_to_camel, PagingError, PagingResult, QueryDescriptor, WildcardSet};
use crate::shared::PageResult;

/// Extra rule applied after filters and search
pub type RecordPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

pub struct LocalPaginator {
    records: RwLock<Arc<Vec<Value>>>,
    wildcards: WildcardSet,
    predicate: Option<RecordPredicate>,
}

impl LocalPaginator {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records: RwLock::new(Arc::new(records)),
            wildcards: WildcardSet::default(),
            predicate: None,
        }
    }

    /// Build from typed records; they must serialize to JSON objects.
    pub fn from_serializable<T: Serialize>(items: &[T]) -> PagingResult<Self> {
        let records = items
            .iter()
            .map(|item| {
                let value = serde_json::to_value(item)
                    .map_err(|e| PagingError::InvalidRecords(e.to_string()))?;
                if value.is_object() {
                    Ok(value)
                } else {
                    Err(PagingError::InvalidRecords(format!(
                        "expected an object, got {value}"
                    )))
                }
            })
            .collect::<PagingResult<Vec<_>>>()?;
        Ok(Self::new(records))
    }

    pub fn with_wildcards(mut self, wildcards: WildcardSet) -> Self {
        self.wildcards = wildcards;
        self
    }

    pub fn with_predicate(mut self, predicate: RecordPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Swap in a new collection after an upstream mutation
    pub fn replace_records(&self, records: Vec<Value>) {
        let mut guard = self.records.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(records);
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Arc<Vec<Value>> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Filter, search, predicate, stable sort, then slice.
    pub fn page(&self, query: &QueryDescriptor) -> PageResult<Value> {
        let records = self.snapshot();

        let filters: Vec<(String, &Value)> = effective_filters(query.filters(), &self.wildcards)
            .into_iter()
            .map(|(field, value)| (snake_to_camel(field), value))
            .collect();

        let search = query.search().and_then(|search| {
            search_needle(&search.term).map(|needle| (snake_to_camel(&search.field), needle))
        });

        let mut matched: Vec<&Value> = records
            .iter()
            .filter(|record| {
                filters.iter().all(|(field, expected)| {
                    record
                        .get(field.as_str())
                        .is_some_and(|actual| values_equal(actual, expected))
                })
            })
            .filter(|record| match &search {
                Some((field, needle)) => contains_folded(record.get(field.as_str()), needle),
                None => true,
            })
            .filter(|record| self.predicate.as_ref().map_or(true, |keep| keep(*record)))
            .collect();

        let sort_key = snake_to_camel(query.order_by());
        matched.sort_by(|a, b| {
            compare_sort_keys(
                a.get(sort_key.as_str()),
                b.get(sort_key.as_str()),
                query.ascending(),
            )
        });

        let total_count = matched.len() as u64;
        let range = query.range();
        let skip = usize::try_from(range.from).unwrap_or(usize::MAX);
        let take = usize::try_from(query.page_size()).unwrap_or(usize::MAX);
        let items: Vec<Value> = matched.into_iter().skip(skip).take(take).cloned().collect();

        debug!(
            dataset = %query.dataset_id(),
            page = query.page_index(),
            matched = total_count,
            items = items.len(),
            "Local page ready"
        );

        PageResult::new(items, total_count, query.page_index(), query.page_size())
    }
}

#[async_trait]
impl Paginator for LocalPaginator {
    fn mode(&self) -> DataSourceMode {
        DataSourceMode::Local
    }

    async fn fetch(&self, query: &QueryDescriptor) -> PageFetch {
        PageFetch::ok(self.page(query))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::SearchSpec;

    fn query() -> QueryDescriptor {
        QueryDescriptor::new("itens_producao", 10).unwrap()
    }

    fn names(page: &PageResult<Value>) -> Vec<&str> {
        page.items
            .iter()
            .map(|r| r["nome"].as_str().unwrap_or_default())
            .collect()
    }

    #[test]
    fn snake_case_filter_matches_camel_case_field() {
        let paginator = LocalPaginator::new(vec![
            json!({ "nome": "Sapata", "dataInicio": "2024-03-01" }),
            json!({ "nome": "Viga", "dataInicio": "2024-04-01" }),
        ]);
        let page = paginator.page(&query().with_filter("data_inicio", "2024-04-01"));
        assert_eq!(names(&page), vec!["Viga"]);
    }

    #[test]
    fn snake_case_order_sorts_camel_case_field() {
        let paginator = LocalPaginator::new(vec![
            json!({ "nome": "B", "dataInicio": "2024-05-01" }),
            json!({ "nome": "A", "dataInicio": "2024-01-01" }),
        ]);
        let page = paginator.page(&query().with_order("data_inicio", true));
        assert_eq!(names(&page), vec!["A", "B"]);
    }

    #[test]
    fn search_scenario_galp() {
        let paginator = LocalPaginator::new(vec![
            json!({ "nome": "Galpão A" }),
            json!({ "nome": "Mezanino B" }),
        ]);
        let q = query().with_search(Some(SearchSpec::new("nome", "galp")));
        let page = paginator.page(&q);
        assert_eq!(names(&page), vec!["Galpão A"]);
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn missing_value_sorts_last_both_directions() {
        let paginator = LocalPaginator::new(vec![
            json!({ "nome": "sem valor" }),
            json!({ "nome": "dez", "valor": 10 }),
            json!({ "nome": "nulo", "valor": null }),
            json!({ "nome": "dois", "valor": 2 }),
        ]);

        let asc = paginator.page(&query().with_order("valor", true));
        assert_eq!(names(&asc), vec!["dois", "dez", "sem valor", "nulo"]);

        let desc = paginator.page(&query().with_order("valor", false));
        assert_eq!(names(&desc), vec!["dez", "dois", "sem valor", "nulo"]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let paginator = LocalPaginator::new(vec![
            json!({ "nome": "primeiro", "status": "ativo" }),
            json!({ "nome": "segundo", "status": "ativo" }),
            json!({ "nome": "terceiro", "status": "ativo" }),
        ]);
        let page = paginator.page(&query().with_order("status", false));
        assert_eq!(names(&page), vec!["primeiro", "segundo", "terceiro"]);
    }

    #[test]
    fn predicate_runs_after_filters() {
        let paginator = LocalPaginator::new(vec![
            json!({ "nome": "a", "status": "ativo", "valor": 5 }),
            json!({ "nome": "b", "status": "ativo", "valor": 50 }),
            json!({ "nome": "c", "status": "pausado", "valor": 500 }),
        ])
        .with_predicate(Arc::new(|r: &Value| r["valor"].as_i64().unwrap_or(0) > 10));

        let page = paginator.page(&query().with_filter("status", "ativo"));
        assert_eq!(names(&page), vec!["b"]);
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn records_with_missing_filter_field_are_dropped() {
        let paginator = LocalPaginator::new(vec![
            json!({ "nome": "a" }),
            json!({ "nome": "b", "status": "ativo" }),
        ]);
        let page = paginator.page(&query().with_filter("status", "ativo"));
        assert_eq!(names(&page), vec!["b"]);
    }

    #[test]
    fn replaced_records_are_paged_on_next_call() {
        let paginator = LocalPaginator::new(vec![json!({ "nome": "a" })]);
        assert_eq!(paginator.page(&query()).total_count, 1);

        paginator.replace_records(vec![json!({ "nome": "a" }), json!({ "nome": "b" })]);
        assert_eq!(paginator.page(&query()).total_count, 2);
        assert_eq!(paginator.len(), 2);
    }

    #[test]
    fn typed_records_are_accepted() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Lancamento {
            descricao: String,
            valor_total: i64,
        }

        let paginator = LocalPaginator::from_serializable(&[
            Lancamento { descricao: "Aço".into(), valor_total: 300 },
            Lancamento { descricao: "Areia".into(), valor_total: 100 },
        ])
        .unwrap();
        let page = paginator.page(&query().with_order("valor_total", true));
        assert_eq!(page.items[0]["descricao"], "Areia");
    }

    #[test]
    fn non_object_records_are_rejected() {
        assert!(matches!(
            LocalPaginator::from_serializable(&[1, 2, 3]),
            Err(PagingError::InvalidRecords(_))
        ));
    }

    #[tokio::test]
    async fn fetch_never_reports_an_error() {
        let paginator = LocalPaginator::new(vec![json!("not an object"), json!({ "nome": "a" })]);
        let fetch = paginator.fetch(&query().with_filter("status", "ativo")).await;
        assert!(fetch.error.is_none());
        assert_eq!(fetch.page.total_count, 0);
    }
}
