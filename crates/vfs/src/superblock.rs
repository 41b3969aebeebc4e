//! Superblock lifecycle: mount-time wiring and unmount teardown.

use std::sync::Arc;

use rusty_ramfs_model::{FileMode, MountConfig};

use crate::content::ContentStore;
use crate::error::VfsError;
use crate::inode::{Credentials, NodeId, NodeManager};

/// Filesystem magic number reported to the host.
pub const RAMFS_MAGIC: u32 = 0xBAAD_BABE;

/// Per-mount record: configuration, node arena, and the root node.
///
/// Every mount owns its own configuration and arena; concurrent mounts are
/// fully independent. Dropping a superblock runs the same teardown as
/// [`Superblock::kill`].
pub struct Superblock {
    /// Parsed mount configuration. Taken exactly once at teardown.
    config: Option<MountConfig>,
    /// Node arena for this mount.
    nodes: Arc<NodeManager>,
    /// Root directory node.
    root: NodeId,
    /// Storage granularity in bytes.
    block_size: u64,
    /// Largest file size the host store supports.
    max_file_size: u64,
}

impl Superblock {
    /// Mount: parse options, build the configuration, and allocate the root
    /// directory.
    ///
    /// Option parsing happens before anything is allocated, so a malformed
    /// option string fails with `InvalidArgument` and no further effect. A
    /// root allocation failure fails with `NoSpace`; the configuration and
    /// any partial store reservations are released before returning.
    ///
    /// # Arguments
    /// * `store` - Host backing storage for this mount
    /// * `options` - Raw mount option string, if the mount passed one
    /// * `creds` - Credentials of the mounting context
    ///
    /// # Returns
    /// A live superblock whose root carries the configured mode.
    pub fn fill(
        store: Arc<dyn ContentStore>,
        options: Option<&str>,
        creds: Credentials,
    ) -> Result<Self, VfsError> {
        let config: MountConfig = MountConfig::parse(options)?;

        let block_size: u64 = store.block_size();
        let max_file_size: u64 = store.max_file_size();

        let nodes = Arc::new(NodeManager::new(store));
        let root_mode: FileMode = config.root_mode().with_file_type(FileMode::S_IFDIR);
        let root: NodeId = match nodes.allocate(None, &creds, root_mode, 0) {
            Ok(id) => id,
            Err(e) => {
                nodes.clear();
                return Err(e);
            }
        };

        tracing::debug!(
            "mounted: root={} mode={:o}",
            root,
            config.root_mode().bits()
        );

        Ok(Self {
            config: Some(config),
            nodes,
            root,
            block_size,
            max_file_size,
        })
    }

    /// Unmount teardown: release the configuration and discard all nodes.
    ///
    /// Infallible and idempotent; safe on a superblock that is already torn
    /// down. Clearing the arena tells the host store to drop every
    /// remaining reservation.
    pub fn kill(&mut self) {
        if self.config.take().is_some() {
            tracing::debug!("unmounted: root={}", self.root);
        }
        self.nodes.clear();
    }

    /// Root directory node ID.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node arena backing this mount.
    pub fn nodes(&self) -> &Arc<NodeManager> {
        &self.nodes
    }

    /// Parsed mount configuration; None once the superblock is torn down.
    pub fn config(&self) -> Option<&MountConfig> {
        self.config.as_ref()
    }

    /// Storage granularity in bytes.
    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Largest file size the host store supports.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Filesystem magic number.
    pub fn magic(&self) -> u32 {
        RAMFS_MAGIC
    }
}

impl Drop for Superblock {
    fn drop(&mut self) {
        self.kill();
    }
}
