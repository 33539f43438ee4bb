//! Domain ports
//!
//! Trait contracts between the paging core and the stores it reads from.

pub mod outbound;

pub use outbound::{RangeRequest, RangeRows, RangeStore, SubstringFilter};
