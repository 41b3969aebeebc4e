//! Namespace operations: create, mkdir, mknod, symlink, unlink, rmdir.
//!
//! Every operation takes an already-resolved parent directory ID. The
//! host's lookup layer verifies that the target name is absent before
//! calling in; that precondition is not re-checked here.
//!
//! All four creation operations share one shape: allocate the node,
//! populate its content (symlinks only), link it into the parent, and
//! update the parent's timestamps. Any failure at or before the link step
//! releases the node, so nothing half-built is ever reachable.

use rusty_ramfs_model::FileMode;

use crate::error::VfsError;
use crate::inode::{Credentials, NodeId, NodeKind};
use crate::superblock::Superblock;

impl Superblock {
    /// Create a regular file under `parent`.
    ///
    /// # Arguments
    /// * `parent` - Resolved parent directory
    /// * `name` - Entry name, verified absent by the lookup layer
    /// * `mode` - Permission bits; the type bits are forced to regular
    /// * `creds` - Credentials of the creating context
    ///
    /// # Returns
    /// The new node's ID, or `NoSpace` when allocation fails (in which case
    /// no entry is inserted).
    pub fn create(
        &self,
        parent: NodeId,
        name: &str,
        mode: FileMode,
        creds: &Credentials,
    ) -> Result<NodeId, VfsError> {
        self.mknod(parent, name, mode.with_file_type(FileMode::S_IFREG), 0, creds)
    }

    /// Create a directory under `parent`.
    ///
    /// On success the parent's link count grows by one, accounting for the
    /// child's `..` back-reference.
    ///
    /// # Arguments
    /// * `parent` - Resolved parent directory
    /// * `name` - Entry name, verified absent by the lookup layer
    /// * `mode` - Permission bits; the type bits are forced to directory
    /// * `creds` - Credentials of the creating context
    pub fn mkdir(
        &self,
        parent: NodeId,
        name: &str,
        mode: FileMode,
        creds: &Credentials,
    ) -> Result<NodeId, VfsError> {
        self.mknod(parent, name, mode.with_file_type(FileMode::S_IFDIR), 0, creds)
    }

    /// Create a node of any type under `parent`.
    ///
    /// Regular, directory, and symlink type bits select those node types;
    /// any other mode produces a special node carrying `dev`. Directory
    /// modes get the same parent link accounting as [`Superblock::mkdir`].
    ///
    /// # Arguments
    /// * `parent` - Resolved parent directory
    /// * `name` - Entry name, verified absent by the lookup layer
    /// * `mode` - Type and permission bits
    /// * `dev` - Device number for special nodes
    /// * `creds` - Credentials of the creating context
    pub fn mknod(
        &self,
        parent: NodeId,
        name: &str,
        mode: FileMode,
        dev: u64,
        creds: &Credentials,
    ) -> Result<NodeId, VfsError> {
        let id: NodeId = self.nodes().allocate(Some(parent), creds, mode, dev)?;
        if let Err(e) = self.nodes().link(parent, name, id) {
            self.nodes().release(id);
            return Err(e);
        }
        tracing::trace!("mknod: {:?} -> node {}", name, id);
        Ok(id)
    }

    /// Create a symlink to `target` under `parent`.
    ///
    /// The node is allocated unpopulated, the target is copied into it, and
    /// only then is the entry linked. A failed copy releases the node and
    /// fails with `NoSpace`, leaving the parent untouched.
    ///
    /// # Arguments
    /// * `parent` - Resolved parent directory
    /// * `name` - Entry name, verified absent by the lookup layer
    /// * `target` - Target path; length bounded only by available memory
    /// * `creds` - Credentials of the creating context
    pub fn symlink(
        &self,
        parent: NodeId,
        name: &str,
        target: &str,
        creds: &Credentials,
    ) -> Result<NodeId, VfsError> {
        let mode: FileMode = FileMode::from_raw(0o777).with_file_type(FileMode::S_IFLNK);
        let id: NodeId = self.nodes().allocate(Some(parent), creds, mode, 0)?;
        if let Err(e) = self.nodes().set_symlink_target(id, target) {
            self.nodes().release(id);
            return Err(e);
        }
        if let Err(e) = self.nodes().link(parent, name, id) {
            self.nodes().release(id);
            return Err(e);
        }
        tracing::trace!("symlink: {:?} -> {:?}", name, target);
        Ok(id)
    }

    /// Remove a non-directory entry from `parent`.
    ///
    /// The child loses one namespace reference; at zero it is deallocated
    /// and its backing storage released.
    ///
    /// # Arguments
    /// * `parent` - Resolved parent directory
    /// * `name` - Entry name to remove
    pub fn unlink(&self, parent: NodeId, name: &str) -> Result<(), VfsError> {
        let child: NodeId = self
            .nodes()
            .lookup(parent, name)
            .ok_or_else(|| VfsError::NotFound(name.to_string()))?;
        if self.nodes().attr(child)?.kind == NodeKind::Directory {
            return Err(VfsError::IsADirectory(child));
        }

        self.nodes().remove_entry(parent, name)?;
        if self.nodes().drop_nlink(child)? == 0 {
            self.nodes().release(child);
        }
        tracing::trace!("unlink: {:?}", name);
        Ok(())
    }

    /// Remove an empty directory from `parent`.
    ///
    /// The parent's link count drops by one, mirroring
    /// [`Superblock::mkdir`].
    ///
    /// # Arguments
    /// * `parent` - Resolved parent directory
    /// * `name` - Entry name to remove
    pub fn rmdir(&self, parent: NodeId, name: &str) -> Result<(), VfsError> {
        let child: NodeId = self
            .nodes()
            .lookup(parent, name)
            .ok_or_else(|| VfsError::NotFound(name.to_string()))?;
        if self.nodes().attr(child)?.kind != NodeKind::Directory {
            return Err(VfsError::NotADirectory(child));
        }
        if self.nodes().child_count(child)? > 0 {
            return Err(VfsError::DirectoryNotEmpty(name.to_string()));
        }

        self.nodes().remove_entry(parent, name)?;
        self.nodes().release(child);
        tracing::trace!("rmdir: {:?}", name);
        Ok(())
    }
}
