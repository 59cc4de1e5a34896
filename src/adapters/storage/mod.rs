//! Local Store Adapters
//!
//! - `FileLocalStore` - One JSON file per key under a data directory
//! - `InMemoryLocalStore` - HashMap behind an async `RwLock`

mod file_local_store;
mod in_memory_local_store;

pub use file_local_store::FileLocalStore;
pub use in_memory_local_store::InMemoryLocalStore;
