//! Contract checks run against every paginator variant.
//!
//! The remote variant reads snake_case rows through `InMemoryRangeStore`;
//! the local variant holds the same rows with camelCase keys. Both receive
//! identical descriptors and must produce identical pages.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use super::{LocalPaginator, Paginator, RemotePaginator};
use crate::domain::{camel_to_snake, QueryDescriptor, SearchSpec};
use crate::infrastructure::storage::InMemoryRangeStore;
use crate::shared::{expected_page_len, PageResult};

const DATASET: &str = "projetos";

/// Rows with camelCase keys. Row 5 has no `valor`.
fn camel_rows(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            let nome = match i {
                0 => "Galpão A".to_string(),
                1 => "Mezanino B".to_string(),
                _ => format!("Obra {i:02}"),
            };
            let status = if i % 3 == 0 { "concluido" } else { "ativo" };
            let mut row = json!({
                "id": i,
                "nome": nome,
                "status": status,
                "dataInicio": format!("2024-{:02}-01", i % 12 + 1),
            });
            if i != 5 {
                row["valor"] = json!(i * 10);
            }
            row
        })
        .collect()
}

fn snake_rows(n: usize) -> Vec<Value> {
    camel_rows(n)
        .into_iter()
        .map(|row| {
            let object = row.as_object().cloned().unwrap_or_default();
            let renamed: Map<String, Value> = object
                .into_iter()
                .map(|(key, value)| (camel_to_snake(&key), value))
                .collect();
            Value::Object(renamed)
        })
        .collect()
}

fn variants(n: usize) -> Vec<(&'static str, Arc<dyn Paginator>)> {
    let store = InMemoryRangeStore::new();
    store.insert_dataset(DATASET, snake_rows(n));
    let remote: Arc<dyn Paginator> = Arc::new(RemotePaginator::new(Arc::new(store)));
    let local: Arc<dyn Paginator> = Arc::new(LocalPaginator::new(camel_rows(n)));
    vec![("remote", remote), ("local", local)]
}

fn query(page_size: u64) -> QueryDescriptor {
    QueryDescriptor::new(DATASET, page_size)
        .unwrap()
        .with_order("id", true)
}

async fn run(paginator: &dyn Paginator, query: &QueryDescriptor) -> PageResult<Value> {
    let fetch = paginator.fetch(query).await;
    assert!(fetch.error.is_none(), "unexpected error: {:?}", fetch.error);
    fetch.page
}

fn ids(page: &PageResult<Value>) -> Vec<i64> {
    page.items.iter().filter_map(|r| r["id"].as_i64()).collect()
}

#[tokio::test]
async fn twenty_three_records_in_pages_of_ten() {
    for (name, paginator) in variants(23) {
        let first = run(paginator.as_ref(), &query(10)).await;
        assert_eq!(first.items.len(), 10, "{name}");
        assert!(first.has_more, "{name}");
        assert_eq!(first.total_pages, 3, "{name}");
        assert_eq!(first.total_count, 23, "{name}");

        let last = run(paginator.as_ref(), &query(10).with_page(2)).await;
        assert_eq!(last.items.len(), 3, "{name}");
        assert!(!last.has_more, "{name}");
        assert_eq!(ids(&last), vec![20, 21, 22], "{name}");
    }
}

#[tokio::test]
async fn page_lengths_follow_bounds_formula() {
    for (name, paginator) in variants(23) {
        for size in [1u64, 3, 7, 10, 23, 30] {
            for page in 0..=(23 / size + 1) {
                let result = run(paginator.as_ref(), &query(size).with_page(page)).await;
                assert_eq!(
                    result.items.len() as u64,
                    expected_page_len(23, page, size),
                    "{name}: size={size} page={page}"
                );
                assert!(result.items.len() as u64 <= size);
            }
        }
    }
}

#[tokio::test]
async fn pages_tile_the_dataset_without_gaps_or_repeats() {
    for (name, paginator) in variants(23) {
        let mut seen = Vec::new();
        for page in 0..4 {
            seen.extend(ids(&run(paginator.as_ref(), &query(7).with_page(page)).await));
        }
        assert_eq!(seen, (0..23).collect::<Vec<i64>>(), "{name}");
    }
}

#[tokio::test]
async fn same_descriptor_gives_same_page() {
    let q = query(5)
        .with_page(1)
        .with_filter("status", "ativo")
        .with_order("valor", false);
    for (name, paginator) in variants(23) {
        let a = run(paginator.as_ref(), &q).await;
        let b = run(paginator.as_ref(), &q).await;
        assert_eq!(a, b, "{name}");
    }
}

#[tokio::test]
async fn wildcard_filters_behave_like_omission() {
    for (name, paginator) in variants(23) {
        let unfiltered = run(paginator.as_ref(), &query(10)).await;
        for wildcard in [json!(""), Value::Null, json!("todos"), json!("todas"), json!("all")] {
            let q = query(10).with_filter("status", wildcard.clone());
            assert_eq!(run(paginator.as_ref(), &q).await, unfiltered, "{name}: {wildcard}");
        }
    }
}

#[tokio::test]
async fn malformed_filter_value_is_no_constraint() {
    for (name, paginator) in variants(23) {
        let unfiltered = run(paginator.as_ref(), &query(10)).await;
        let q = query(10).with_filter("status", json!(["ativo", "concluido"]));
        assert_eq!(run(paginator.as_ref(), &q).await, unfiltered, "{name}");
    }
}

#[tokio::test]
async fn snake_case_names_filter_and_sort() {
    for (name, paginator) in variants(23) {
        let q = query(10).with_filter("data_inicio", "2024-02-01");
        let page = run(paginator.as_ref(), &q).await;
        assert_eq!(ids(&page), vec![1, 13], "{name}");

        let q = query(3).with_order("data_inicio", false);
        let page = run(paginator.as_ref(), &q).await;
        assert_eq!(ids(&page), vec![11, 10, 22], "{name}");
    }
}

#[tokio::test]
async fn case_insensitive_search() {
    for (name, paginator) in variants(23) {
        let q = query(10).with_search(Some(SearchSpec::new("nome", "galp")));
        let page = run(paginator.as_ref(), &q).await;
        assert_eq!(page.total_count, 1, "{name}");
        assert_eq!(page.items[0]["nome"], "Galpão A", "{name}");

        let q = query(10).with_search(Some(SearchSpec::new("nome", "  ")));
        assert_eq!(run(paginator.as_ref(), &q).await.total_count, 23, "{name}");
    }
}

#[tokio::test]
async fn missing_sort_value_is_last_either_way() {
    for (name, paginator) in variants(23) {
        for ascending in [true, false] {
            let q = query(10).with_order("valor", ascending).with_page(2);
            let page = run(paginator.as_ref(), &q).await;
            assert_eq!(ids(&page).last(), Some(&5), "{name}: ascending={ascending}");
        }
    }
}

#[tokio::test]
async fn filter_and_search_combine() {
    for (name, paginator) in variants(23) {
        let q = query(10)
            .with_filter("status", "concluido")
            .with_search(Some(SearchSpec::new("nome", "obra 1")));
        let page = run(paginator.as_ref(), &q).await;
        assert_eq!(ids(&page), vec![12, 15, 18], "{name}");
        assert_eq!(page.total_pages, 1, "{name}");
    }
}

#[tokio::test]
async fn empty_dataset() {
    for (name, paginator) in variants(0) {
        let page = run(paginator.as_ref(), &query(10)).await;
        assert_eq!(page.total_count, 0, "{name}");
        assert_eq!(page.total_pages, 0, "{name}");
        assert!(page.items.is_empty(), "{name}");
        assert!(!page.has_more, "{name}");
    }
}

#[tokio::test]
async fn variants_agree_on_every_page() {
    let queries = [
        query(4).with_order("nome", true),
        query(6).with_order("valor", true).with_filter("status", "ativo"),
        query(5).with_order("data_inicio", true),
    ];
    let [(_, remote), (_, local)]: [(&str, Arc<dyn Paginator>); 2] =
        variants(23).try_into().ok().unwrap();
    for q in queries {
        for page in 0..6 {
            let q = q.clone().with_page(page);
            let r = run(remote.as_ref(), &q).await;
            let l = run(local.as_ref(), &q).await;
            assert_eq!(ids(&r), ids(&l), "{q:?}");
            assert_eq!(r.total_count, l.total_count);
        }
    }
}
