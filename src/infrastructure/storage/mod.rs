//! In-process range store

mod memory;

pub use memory::InMemoryRangeStore;
