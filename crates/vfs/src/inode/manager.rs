//! Node arena: allocation, linking, and release.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use rusty_ramfs_model::FileMode;

use crate::content::ContentStore;
use crate::error::VfsError;

use super::dir::DirEntries;
use super::node::{Node, NodeContent};
use super::types::{Credentials, NodeAttr, NodeId, ROOT_NODE};

/// Allocates, tracks, and releases the nodes of one mount.
///
/// Nodes live in an arena keyed by node ID; directory entries reference
/// children by ID only. A node leaves the arena when its last namespace
/// reference is dropped, at which point its backing storage is released.
///
/// A node becomes reachable only through [`NodeManager::link`], and only
/// after it has been fully populated, so a concurrent metadata read never
/// observes a half-built node.
///
/// # Lock Safety
///
/// The arena map is guarded by an `RwLock`. Lock operations use `unwrap()`
/// because lock poisoning indicates unrecoverable internal state corruption.
/// Serializing concurrent mutations against the same parent directory is
/// the host's job; the lock here protects map integrity only.
pub struct NodeManager {
    /// Next node ID to allocate. IDs are never reused within a mount.
    next_id: AtomicU64,
    /// All live nodes by ID.
    nodes: RwLock<HashMap<NodeId, Node>>,
    /// Host-provided backing storage.
    store: Arc<dyn ContentStore>,
}

impl NodeManager {
    /// Create an empty arena backed by the given host store.
    ///
    /// # Arguments
    /// * `store` - Host storage the arena charges node backing against
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            next_id: AtomicU64::new(ROOT_NODE),
            nodes: RwLock::new(HashMap::new()),
            store,
        }
    }

    /// Draw the next node ID.
    fn allocate_id(&self) -> NodeId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Allocate a typed node with default attributes.
    ///
    /// The node's type follows the mode's type bits: regular, directory, and
    /// symlink bits select those types; anything else produces a special
    /// node carrying `dev`. Ownership comes from `creds`, except that a
    /// setgid parent propagates its group (and, to child directories, the
    /// setgid bit). All three timestamps are set to the current time.
    ///
    /// The returned node sits in the arena fully populated but unreachable;
    /// nothing in the namespace refers to it until [`NodeManager::link`].
    ///
    /// # Arguments
    /// * `parent` - Directory the node will be linked under; None only for
    ///   the root
    /// * `creds` - Credentials of the creating context
    /// * `mode` - Type and permission bits
    /// * `dev` - Device number for special nodes (ignored otherwise)
    ///
    /// # Returns
    /// The new node's ID. Fails with [`VfsError::NoSpace`] when the host
    /// store cannot reserve backing; nothing is inserted in that case.
    pub fn allocate(
        &self,
        parent: Option<NodeId>,
        creds: &Credentials,
        mode: FileMode,
        dev: u64,
    ) -> Result<NodeId, VfsError> {
        let mut mode: FileMode = mode;
        let uid: u32 = creds.uid;
        let mut gid: u32 = creds.gid;

        if let Some(parent_id) = parent {
            let nodes = self.nodes.read().unwrap();
            let parent_node: &Node = nodes
                .get(&parent_id)
                .ok_or(VfsError::NodeNotFound(parent_id))?;
            if parent_node.mode.contains(FileMode::S_ISGID) {
                gid = parent_node.gid;
                if mode.is_directory() {
                    mode |= FileMode::S_ISGID;
                }
            }
        }

        let id: NodeId = self.allocate_id();
        self.store.reserve_node(id)?;

        let (content, nlink) = if mode.is_regular() {
            (NodeContent::Regular, 1)
        } else if mode.is_directory() {
            (NodeContent::Directory(DirEntries::new()), 2)
        } else if mode.is_symlink() {
            (NodeContent::Symlink(String::new()), 1)
        } else {
            (NodeContent::Special(dev), 1)
        };

        let now: SystemTime = SystemTime::now();
        let node = Node {
            id,
            mode,
            uid,
            gid,
            nlink,
            atime: now,
            mtime: now,
            ctime: now,
            content,
        };

        self.nodes.write().unwrap().insert(id, node);
        Ok(id)
    }

    /// Populate a symlink node's target.
    ///
    /// Reserves target-length bytes from the host store before touching the
    /// node; on failure the node is left unpopulated and the caller is
    /// expected to release it.
    ///
    /// # Arguments
    /// * `id` - Symlink node to populate
    /// * `target` - Target path to copy into the node
    pub fn set_symlink_target(&self, id: NodeId, target: &str) -> Result<(), VfsError> {
        self.store.reserve_bytes(id, target.len() as u64)?;

        let mut nodes = self.nodes.write().unwrap();
        let node: &mut Node = nodes.get_mut(&id).ok_or(VfsError::NodeNotFound(id))?;
        match &mut node.content {
            NodeContent::Symlink(slot) => {
                *slot = target.to_string();
                Ok(())
            }
            _ => Err(VfsError::InvalidArgument(format!(
                "node {} is not a symlink",
                id
            ))),
        }
    }

    /// Link `child` into `parent` under `name`, publishing it.
    ///
    /// Updates the parent's mtime/ctime and, for directory children, bumps
    /// the parent's link count to account for the child's `..`
    /// back-reference.
    ///
    /// The host's lookup layer has already verified that `name` is absent in
    /// `parent`; that precondition is not re-checked here.
    ///
    /// # Arguments
    /// * `parent` - Directory receiving the entry
    /// * `name` - Entry name
    /// * `child` - Node the entry binds to
    pub fn link(&self, parent: NodeId, name: &str, child: NodeId) -> Result<(), VfsError> {
        let mut nodes = self.nodes.write().unwrap();

        let child_is_dir: bool = nodes
            .get(&child)
            .ok_or(VfsError::NodeNotFound(child))?
            .is_directory();

        let parent_node: &mut Node = nodes
            .get_mut(&parent)
            .ok_or(VfsError::NodeNotFound(parent))?;
        let entries: &mut DirEntries = parent_node
            .entries_mut()
            .ok_or(VfsError::NotADirectory(parent))?;

        debug_assert!(
            entries.get(name).is_none(),
            "lookup layer let a colliding name through"
        );
        entries.insert(name.to_string(), child);

        if child_is_dir {
            parent_node.nlink += 1;
        }
        parent_node.touch_modified(SystemTime::now());
        Ok(())
    }

    /// Remove the entry `name` from `parent`.
    ///
    /// Updates the parent's mtime/ctime; for directory children the parent's
    /// link count drops by one (the mirror of [`NodeManager::link`]). The
    /// unlinked child's own link count is untouched; callers decide between
    /// [`NodeManager::drop_nlink`] and [`NodeManager::release`].
    ///
    /// # Arguments
    /// * `parent` - Directory losing the entry
    /// * `name` - Entry name
    ///
    /// # Returns
    /// The node ID the entry was bound to.
    pub fn remove_entry(&self, parent: NodeId, name: &str) -> Result<NodeId, VfsError> {
        let mut nodes = self.nodes.write().unwrap();

        let child: NodeId = nodes
            .get(&parent)
            .ok_or(VfsError::NodeNotFound(parent))?
            .entries()
            .ok_or(VfsError::NotADirectory(parent))?
            .get(name)
            .ok_or_else(|| VfsError::NotFound(name.to_string()))?;
        let child_is_dir: bool = nodes.get(&child).map(Node::is_directory).unwrap_or(false);

        let parent_node: &mut Node = nodes
            .get_mut(&parent)
            .ok_or(VfsError::NodeNotFound(parent))?;
        parent_node
            .entries_mut()
            .ok_or(VfsError::NotADirectory(parent))?
            .remove(name);

        if child_is_dir {
            parent_node.nlink = parent_node.nlink.saturating_sub(1);
        }
        parent_node.touch_modified(SystemTime::now());
        Ok(child)
    }

    /// Drop one namespace reference from a node.
    ///
    /// # Returns
    /// The remaining link count; at zero the caller releases the node.
    pub fn drop_nlink(&self, id: NodeId) -> Result<u32, VfsError> {
        let mut nodes = self.nodes.write().unwrap();
        let node: &mut Node = nodes.get_mut(&id).ok_or(VfsError::NodeNotFound(id))?;
        node.nlink = node.nlink.saturating_sub(1);
        node.ctime = SystemTime::now();
        Ok(node.nlink)
    }

    /// Remove a node from the arena and release its backing storage.
    ///
    /// Safe to call on an ID that is already gone.
    pub fn release(&self, id: NodeId) {
        self.nodes.write().unwrap().remove(&id);
        self.store.release(id);
    }

    /// Look up a child ID by name.
    ///
    /// # Arguments
    /// * `parent` - Directory to search
    /// * `name` - Entry name
    ///
    /// # Returns
    /// The child's node ID, or None when the parent or entry is absent.
    pub fn lookup(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let nodes = self.nodes.read().unwrap();
        nodes.get(&parent)?.entries()?.get(name)
    }

    /// Attribute snapshot of a node.
    pub fn attr(&self, id: NodeId) -> Result<NodeAttr, VfsError> {
        let nodes = self.nodes.read().unwrap();
        nodes
            .get(&id)
            .map(Node::attr)
            .ok_or(VfsError::NodeNotFound(id))
    }

    /// Target path of a symlink node.
    pub fn symlink_target(&self, id: NodeId) -> Result<String, VfsError> {
        let nodes = self.nodes.read().unwrap();
        let node: &Node = nodes.get(&id).ok_or(VfsError::NodeNotFound(id))?;
        match &node.content {
            NodeContent::Symlink(target) => Ok(target.clone()),
            _ => Err(VfsError::InvalidArgument(format!(
                "node {} is not a symlink",
                id
            ))),
        }
    }

    /// Entries of a directory as (name, node ID) pairs.
    pub fn entries(&self, id: NodeId) -> Result<Vec<(String, NodeId)>, VfsError> {
        let nodes = self.nodes.read().unwrap();
        let node: &Node = nodes.get(&id).ok_or(VfsError::NodeNotFound(id))?;
        node.entries()
            .map(DirEntries::to_vec)
            .ok_or(VfsError::NotADirectory(id))
    }

    /// Number of entries in a directory.
    pub fn child_count(&self, id: NodeId) -> Result<usize, VfsError> {
        let nodes = self.nodes.read().unwrap();
        let node: &Node = nodes.get(&id).ok_or(VfsError::NodeNotFound(id))?;
        node.entries()
            .map(DirEntries::len)
            .ok_or(VfsError::NotADirectory(id))
    }

    /// Total number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.read().unwrap().len()
    }

    /// Drop every node and all backing storage. Used at unmount; idempotent.
    pub fn clear(&self) {
        self.nodes.write().unwrap().clear();
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MemoryStore;
    use crate::inode::NodeKind;

    fn test_manager() -> NodeManager {
        NodeManager::new(Arc::new(MemoryStore::new()))
    }

    fn dir_mode(bits: u32) -> FileMode {
        FileMode::from_raw(bits).with_file_type(FileMode::S_IFDIR)
    }

    #[test]
    fn test_allocate_regular_defaults() {
        let manager: NodeManager = test_manager();
        let creds = Credentials::new(1000, 1000);

        let id: NodeId = manager
            .allocate(None, &creds, FileMode::from_raw(0o100644), 0)
            .unwrap();
        let attr: NodeAttr = manager.attr(id).unwrap();

        assert_eq!(attr.kind, NodeKind::Regular);
        assert_eq!(attr.nlink, 1);
        assert_eq!(attr.uid, 1000);
        assert_eq!(attr.gid, 1000);
        assert_eq!(attr.mode.permissions(), FileMode::from_raw(0o644));
        assert_eq!(attr.atime, attr.mtime);
        assert_eq!(attr.mtime, attr.ctime);
    }

    #[test]
    fn test_allocate_directory_starts_with_two_links() {
        let manager: NodeManager = test_manager();
        let id: NodeId = manager
            .allocate(None, &Credentials::root(), dir_mode(0o755), 0)
            .unwrap();
        assert_eq!(manager.attr(id).unwrap().nlink, 2);
    }

    #[test]
    fn test_allocate_special_keeps_device_number() {
        let manager: NodeManager = test_manager();
        let mode: FileMode = FileMode::from_raw(0o600).with_file_type(FileMode::S_IFCHR);
        let id: NodeId = manager
            .allocate(None, &Credentials::root(), mode, 0x0501)
            .unwrap();

        let attr: NodeAttr = manager.attr(id).unwrap();
        assert_eq!(attr.kind, NodeKind::Special);
        assert_eq!(attr.rdev, 0x0501);
        assert_eq!(attr.nlink, 1);
    }

    #[test]
    fn test_allocate_ids_monotonic() {
        let manager: NodeManager = test_manager();
        let creds = Credentials::root();

        let first: NodeId = manager
            .allocate(None, &creds, FileMode::from_raw(0o100644), 0)
            .unwrap();
        let second: NodeId = manager
            .allocate(None, &creds, FileMode::from_raw(0o100644), 0)
            .unwrap();
        assert_eq!(first, ROOT_NODE);
        assert!(second > first);

        // Released IDs are never handed out again.
        manager.release(second);
        let third: NodeId = manager
            .allocate(None, &creds, FileMode::from_raw(0o100644), 0)
            .unwrap();
        assert!(third > second);
    }

    #[test]
    fn test_setgid_parent_propagates_group() {
        let manager: NodeManager = test_manager();
        let parent: NodeId = manager
            .allocate(None, &Credentials::new(0, 500), dir_mode(0o2775), 0)
            .unwrap();

        let creds = Credentials::new(1000, 1000);
        let file: NodeId = manager
            .allocate(Some(parent), &creds, FileMode::from_raw(0o100644), 0)
            .unwrap();
        let file_attr: NodeAttr = manager.attr(file).unwrap();
        assert_eq!(file_attr.gid, 500);
        assert_eq!(file_attr.uid, 1000);
        assert!(!file_attr.mode.contains(FileMode::S_ISGID));

        // Child directories also inherit the setgid bit itself.
        let subdir: NodeId = manager
            .allocate(Some(parent), &creds, dir_mode(0o755), 0)
            .unwrap();
        let subdir_attr: NodeAttr = manager.attr(subdir).unwrap();
        assert_eq!(subdir_attr.gid, 500);
        assert!(subdir_attr.mode.contains(FileMode::S_ISGID));
    }

    #[test]
    fn test_link_updates_parent_accounting() {
        let manager: NodeManager = test_manager();
        let creds = Credentials::root();
        let parent: NodeId = manager.allocate(None, &creds, dir_mode(0o755), 0).unwrap();

        let file: NodeId = manager
            .allocate(Some(parent), &creds, FileMode::from_raw(0o100644), 0)
            .unwrap();
        manager.link(parent, "file.txt", file).unwrap();
        assert_eq!(manager.attr(parent).unwrap().nlink, 2);
        assert_eq!(manager.lookup(parent, "file.txt"), Some(file));

        let subdir: NodeId = manager
            .allocate(Some(parent), &creds, dir_mode(0o755), 0)
            .unwrap();
        manager.link(parent, "subdir", subdir).unwrap();
        assert_eq!(manager.attr(parent).unwrap().nlink, 3);
    }

    #[test]
    fn test_remove_entry_mirrors_link() {
        let manager: NodeManager = test_manager();
        let creds = Credentials::root();
        let parent: NodeId = manager.allocate(None, &creds, dir_mode(0o755), 0).unwrap();
        let subdir: NodeId = manager
            .allocate(Some(parent), &creds, dir_mode(0o755), 0)
            .unwrap();
        manager.link(parent, "subdir", subdir).unwrap();
        assert_eq!(manager.attr(parent).unwrap().nlink, 3);

        let removed: NodeId = manager.remove_entry(parent, "subdir").unwrap();
        assert_eq!(removed, subdir);
        assert_eq!(manager.attr(parent).unwrap().nlink, 2);
        assert_eq!(manager.lookup(parent, "subdir"), None);
    }

    #[test]
    fn test_link_into_non_directory_fails() {
        let manager: NodeManager = test_manager();
        let creds = Credentials::root();
        let file: NodeId = manager
            .allocate(None, &creds, FileMode::from_raw(0o100644), 0)
            .unwrap();
        let other: NodeId = manager
            .allocate(None, &creds, FileMode::from_raw(0o100644), 0)
            .unwrap();

        let result = manager.link(file, "child", other);
        assert!(matches!(result, Err(VfsError::NotADirectory(_))));
    }

    #[test]
    fn test_clear_empties_arena() {
        let manager: NodeManager = test_manager();
        manager
            .allocate(None, &Credentials::root(), dir_mode(0o755), 0)
            .unwrap();
        assert_eq!(manager.node_count(), 1);

        manager.clear();
        assert_eq!(manager.node_count(), 0);

        // Idempotent.
        manager.clear();
        assert_eq!(manager.node_count(), 0);
    }
}
