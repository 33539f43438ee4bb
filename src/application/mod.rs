pub mod paging;

pub use paging::{
    DataSourceMode, FacadeStatus, LocalPaginator, PageFetch, PagerView, PaginationFacade,
    Paginator, PagingSnapshot, RecordPredicate, RemotePaginator, ShowingRange,
};
