//! Storage contract and the in-memory reference store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::VfsError;
use crate::inode::NodeId;

/// Storage granularity reported by [`MemoryStore`] (4KiB pages).
pub const DEFAULT_BLOCK_SIZE: u64 = 4096;

/// Backing storage contract the host must provide, one instance per mount.
///
/// The core accounts for backing memory through this trait and nothing
/// else; byte content read/write and memory mapping stay on the host side.
/// Reservation failures surface as [`VfsError::NoSpace`] and the core
/// guarantees the node involved never becomes reachable.
pub trait ContentStore: Send + Sync {
    /// Reserve backing for a new node's metadata.
    ///
    /// # Arguments
    /// * `id` - Node the reservation belongs to
    fn reserve_node(&self, id: NodeId) -> Result<(), VfsError>;

    /// Reserve `len` additional bytes of content backing for `id`.
    ///
    /// # Arguments
    /// * `id` - Node the bytes belong to
    /// * `len` - Number of bytes to reserve
    fn reserve_bytes(&self, id: NodeId, len: u64) -> Result<(), VfsError>;

    /// Release everything held for `id`.
    fn release(&self, id: NodeId);

    /// Discard all backing for this mount.
    fn clear(&self);

    /// Storage granularity in bytes; reported as the mount's block size.
    fn block_size(&self) -> u64;

    /// Largest file size the store supports; reported as the mount's
    /// maximum file size.
    fn max_file_size(&self) -> u64;
}

/// Accounting state of a [`MemoryStore`].
#[derive(Debug, Default)]
struct MemoryStoreState {
    /// Reserved bytes per node.
    reserved: HashMap<NodeId, u64>,
    /// Total bytes currently reserved.
    used: u64,
}

/// In-memory accounting store with an optional byte budget.
///
/// Node metadata is registered but not charged; only content bytes (symlink
/// targets, file data reserved by the host) count against the budget.
///
/// # Lock Safety
///
/// State is guarded by a `Mutex`; lock operations use `unwrap()` because
/// poisoning indicates unrecoverable internal state corruption.
pub struct MemoryStore {
    /// Accounting state.
    state: Mutex<MemoryStoreState>,
    /// Maximum total bytes; None means unbounded.
    capacity: Option<u64>,
}

impl MemoryStore {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryStoreState::default()),
            capacity: None,
        }
    }

    /// Create a store with a byte budget.
    ///
    /// # Arguments
    /// * `capacity` - Maximum total content bytes the store will reserve
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            state: Mutex::new(MemoryStoreState::default()),
            capacity: Some(capacity),
        }
    }

    /// Total content bytes currently reserved.
    pub fn used(&self) -> u64 {
        self.state.lock().unwrap().used
    }

    /// Number of nodes with a registration or reservation.
    pub fn node_count(&self) -> usize {
        self.state.lock().unwrap().reserved.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for MemoryStore {
    fn reserve_node(&self, id: NodeId) -> Result<(), VfsError> {
        let mut state = self.state.lock().unwrap();
        state.reserved.entry(id).or_insert(0);
        Ok(())
    }

    fn reserve_bytes(&self, id: NodeId, len: u64) -> Result<(), VfsError> {
        let mut state = self.state.lock().unwrap();
        if let Some(capacity) = self.capacity {
            if state.used.saturating_add(len) > capacity {
                return Err(VfsError::NoSpace);
            }
        }
        state.used += len;
        *state.reserved.entry(id).or_insert(0) += len;
        Ok(())
    }

    fn release(&self, id: NodeId) {
        let mut state = self.state.lock().unwrap();
        if let Some(bytes) = state.reserved.remove(&id) {
            state.used -= bytes;
        }
    }

    fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.reserved.clear();
        state.used = 0;
    }

    fn block_size(&self) -> u64 {
        DEFAULT_BLOCK_SIZE
    }

    fn max_file_size(&self) -> u64 {
        u64::MAX
    }
}
