//! # ERP list paging
//!
//! One paging interface for every list view of the ERP front end, whether
//! the rows are fetched page by page from the relational backend or are
//! already loaded in memory.
//!
//! ## Architecture
//!
//! - **shared**: `PageResult` and `RowRange`
//! - **domain**: query descriptor, naming conversion, filter rules, the
//!   `RangeStore` port and errors
//! - **application**: remote and local paginators, the pagination facade
//!   and the pager view state
//! - **infrastructure**: SeaORM and in-memory range stores
//! - **config** / **logging**: TOML configuration and tracing setup

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

pub use application::{
    DataSourceMode, LocalPaginator, PagerView, PaginationFacade, Paginator, PagingSnapshot,
    RemotePaginator,
};
pub use domain::{PagingError, PagingResult, QueryDescriptor, SearchSpec, WildcardSet};
pub use infrastructure::{init_database, DatabaseConfig, InMemoryRangeStore, SeaOrmRangeStore};
pub use shared::PageResult;
