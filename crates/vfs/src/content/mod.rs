//! Host-facing storage contract for node backing memory.

mod store;

pub use store::{ContentStore, MemoryStore, DEFAULT_BLOCK_SIZE};
