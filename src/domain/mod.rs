pub mod error;
pub mod filters;
pub mod naming;
pub mod ports;
pub mod query;

pub use error::{PagingError, PagingResult};
pub use filters::{WildcardSet, DEFAULT_WILDCARDS};
pub use naming::{camel_to_snake, snake_to_camel};
pub use ports::{RangeRequest, RangeRows, RangeStore, SubstringFilter};
pub use query::{QueryDescriptor, SearchSpec};
