//! Pagination facade: one navigation interface per list view
//!
//! The facade owns the current [`QueryDescriptor`] and forwards every
//! request to the active [`Paginator`]. Each issued request takes a
//! generation number; a response is applied only while its generation is
//! still the latest, so a slow earlier response can never overwrite a
//! later one.
//!
//! Views observe state through [`PaginationFacade::subscribe`].

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{DataSourceMode, PageFetch, Paginator};
use crate::domain::{QueryDescriptor, SearchSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FacadeStatus {
    Idle,
    /// Remote mode only
    Loading,
    Ready,
    /// Remote mode only
    Error,
}

/// Everything a list view renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingSnapshot {
    pub status: FacadeStatus,
    pub data: Vec<Value>,
    pub loading: bool,
    pub error: Option<String>,
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_more: bool,
}

impl PagingSnapshot {
    fn idle(query: &QueryDescriptor) -> Self {
        Self {
            status: FacadeStatus::Idle,
            data: Vec::new(),
            loading: false,
            error: None,
            page: query.page_index(),
            page_size: query.page_size(),
            total_count: 0,
            total_pages: 0,
            has_more: false,
        }
    }
}

struct FacadeState {
    paginator: Arc<dyn Paginator>,
    query: QueryDescriptor,
    generation: u64,
    /// Page count confirmed for the current criteria; `None` until the
    /// first response under them arrives.
    known_pages: Option<u64>,
}

/// An issued request waiting for its paginator
struct Ticket {
    generation: u64,
    query: QueryDescriptor,
    paginator: Arc<dyn Paginator>,
}

pub struct PaginationFacade {
    view_id: Uuid,
    state: Mutex<FacadeState>,
    snapshot: watch::Sender<PagingSnapshot>,
}

impl PaginationFacade {
    /// Bind a list view to `paginator`. Nothing is fetched until [`load`].
    ///
    /// [`load`]: PaginationFacade::load
    pub fn new(paginator: Arc<dyn Paginator>, query: QueryDescriptor) -> Self {
        let view_id = Uuid::new_v4();
        let query = query.with_page(0);
        info!(
            view = %view_id,
            mode = %paginator.mode(),
            dataset = %query.dataset_id(),
            page_size = query.page_size(),
            "Pagination facade created"
        );
        let (snapshot, _) = watch::channel(PagingSnapshot::idle(&query));
        Self {
            view_id,
            state: Mutex::new(FacadeState {
                paginator,
                query,
                generation: 0,
                known_pages: None,
            }),
            snapshot,
        }
    }

    fn state(&self) -> MutexGuard<'_, FacadeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view_id(&self) -> Uuid {
        self.view_id
    }

    pub fn mode(&self) -> DataSourceMode {
        self.state().paginator.mode()
    }

    /// The descriptor of the most recently issued request
    pub fn query(&self) -> QueryDescriptor {
        self.state().query.clone()
    }

    pub fn snapshot(&self) -> PagingSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PagingSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn data(&self) -> Vec<Value> {
        self.snapshot.borrow().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.snapshot.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.snapshot.borrow().error.clone()
    }

    pub fn page(&self) -> u64 {
        self.snapshot.borrow().page
    }

    pub fn page_size(&self) -> u64 {
        self.snapshot.borrow().page_size
    }

    pub fn total_count(&self) -> u64 {
        self.snapshot.borrow().total_count
    }

    pub fn total_pages(&self) -> u64 {
        self.snapshot.borrow().total_pages
    }

    pub fn has_more(&self) -> bool {
        self.snapshot.borrow().has_more
    }

    // ── Request lifecycle ──────────────────────────────────────

    fn begin(&self, state: &mut FacadeState, query: QueryDescriptor) -> Ticket {
        state.generation += 1;
        state.query = query.clone();

        // `page` and `data` move together in `complete`
        if state.paginator.mode() == DataSourceMode::Remote {
            self.snapshot.send_modify(|s| {
                s.status = FacadeStatus::Loading;
                s.loading = true;
            });
        }

        let page = query.page_index();

        debug!(
            view = %self.view_id,
            generation = state.generation,
            page,
            "Issuing page request"
        );

        Ticket {
            generation: state.generation,
            query,
            paginator: state.paginator.clone(),
        }
    }

    async fn run(&self, ticket: Ticket) -> bool {
        let fetch = ticket.paginator.fetch(&ticket.query).await;
        self.complete(ticket.generation, fetch)
    }

    /// Apply a response if it still belongs to the latest request
    fn complete(&self, generation: u64, fetch: PageFetch) -> bool {
        let mut state = self.state();
        if generation != state.generation {
            debug!(
                view = %self.view_id,
                generation,
                current = state.generation,
                "Discarding stale page response"
            );
            return false;
        }

        let PageFetch { page, error } = fetch;
        if let Some(err) = &error {
            warn!(view = %self.view_id, error = %err, "Page request failed");
        }
        state.known_pages = Some(if error.is_some() { 0 } else { page.total_pages });

        self.snapshot.send_modify(|s| {
            s.page = page.page_index;
            s.page_size = page.page_size;
            s.loading = false;
            match error {
                Some(err) => {
                    s.status = FacadeStatus::Error;
                    s.error = Some(err.to_string());
                    s.data = Vec::new();
                    s.total_count = 0;
                    s.total_pages = 0;
                    s.has_more = false;
                }
                None => {
                    s.status = FacadeStatus::Ready;
                    s.error = None;
                    s.total_count = page.total_count;
                    s.total_pages = page.total_pages;
                    s.has_more = page.has_more;
                    s.data = page.items;
                }
            }
        });
        true
    }

    /// Re-issue with a new descriptor derived from the current one, from
    /// page 0. Returns `false` when the criteria did not change.
    async fn change_criteria(
        &self,
        update: impl FnOnce(QueryDescriptor) -> Option<QueryDescriptor>,
    ) -> bool {
        let ticket = {
            let mut state = self.state();
            let Some(next) = update(state.query.clone()) else {
                return false;
            };
            if next.same_criteria(&state.query) {
                return false;
            }
            state.known_pages = None;
            self.begin(&mut state, next.with_page(0))
        };
        self.run(ticket).await
    }

    // ── Public operations ──────────────────────────────────────

    /// Initial fetch of the current descriptor
    pub async fn load(&self) -> bool {
        let ticket = {
            let mut state = self.state();
            let query = state.query.clone();
            self.begin(&mut state, query)
        };
        self.run(ticket).await
    }

    /// Same descriptor, same page; used after the dataset was written to
    pub async fn refresh(&self) -> bool {
        self.load().await
    }

    pub async fn set_filters(&self, filters: BTreeMap<String, Value>) -> bool {
        self.change_criteria(|q| Some(q.with_filters(filters))).await
    }

    pub async fn set_filter(&self, field: impl Into<String>, value: impl Into<Value>) -> bool {
        let (field, value) = (field.into(), value.into());
        self.change_criteria(|q| Some(q.with_filter(field, value))).await
    }

    pub async fn set_search(&self, search: Option<SearchSpec>) -> bool {
        self.change_criteria(|q| Some(q.with_search(search))).await
    }

    pub async fn set_order(&self, order_by: impl Into<String>, ascending: bool) -> bool {
        let order_by = order_by.into();
        self.change_criteria(|q| Some(q.with_order(order_by, ascending))).await
    }

    /// A zero page size is ignored
    pub async fn set_page_size(&self, page_size: u64) -> bool {
        self.change_criteria(|q| q.with_page_size(page_size).ok()).await
    }

    /// Jump to `page`; a no-op outside `[0, total_pages)` and while a
    /// criteria change is still waiting for its first response.
    pub async fn go_to_page(&self, page: i64) -> bool {
        let Ok(page) = u64::try_from(page) else {
            return false;
        };
        let ticket = {
            let mut state = self.state();
            if state.known_pages.map_or(true, |pages| page >= pages) {
                return false;
            }
            let next = state.query.clone().with_page(page);
            self.begin(&mut state, next)
        };
        self.run(ticket).await
    }

    pub async fn next_page(&self) -> bool {
        let current = self.state().query.page_index();
        match i64::try_from(current.saturating_add(1)) {
            Ok(next) => self.go_to_page(next).await,
            Err(_) => false,
        }
    }

    pub async fn prev_page(&self) -> bool {
        let current = self.state().query.page_index();
        if current == 0 {
            return false;
        }
        match i64::try_from(current - 1) {
            Ok(prev) => self.go_to_page(prev).await,
            Err(_) => false,
        }
    }

    pub async fn first_page(&self) -> bool {
        self.go_to_page(0).await
    }

    pub async fn last_page(&self) -> bool {
        let Some(last) = self.state().known_pages.and_then(|pages| pages.checked_sub(1)) else {
            return false;
        };
        match i64::try_from(last) {
            Ok(last) => self.go_to_page(last).await,
            Err(_) => false,
        }
    }

    /// Switch to a different data source. In-flight responses from the
    /// previous source are discarded and paging restarts at page 0.
    pub async fn reinitialize(&self, paginator: Arc<dyn Paginator>) -> bool {
        let ticket = {
            let mut state = self.state();
            info!(
                view = %self.view_id,
                from = %state.paginator.mode(),
                to = %paginator.mode(),
                "Reinitializing pagination source"
            );
            state.paginator = paginator;
            state.known_pages = None;
            let query = state.query.clone().with_page(0);
            self.snapshot.send_replace(PagingSnapshot::idle(&query));
            self.begin(&mut state, query)
        };
        self.run(ticket).await
    }
}
