//! Core node types and attribute snapshots.

use std::time::SystemTime;

use rusty_ramfs_model::FileMode;

/// Unique identifier for a node.
///
/// Identifiers increase monotonically and are never reused within a mount's
/// lifetime, even after the node they named is released.
pub type NodeId = u64;

/// Root directory node ID (the first ID drawn at mount time).
pub const ROOT_NODE: NodeId = 1;

/// Type of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Regular file.
    Regular,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Device or other special node.
    Special,
}

/// Ownership of the context performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials {
    /// User ID of the caller.
    pub uid: u32,
    /// Primary group ID of the caller.
    pub gid: u32,
}

impl Credentials {
    /// Create credentials for a uid/gid pair.
    pub fn new(uid: u32, gid: u32) -> Self {
        Self { uid, gid }
    }

    /// Superuser credentials.
    pub fn root() -> Self {
        Self { uid: 0, gid: 0 }
    }
}

/// Point-in-time attribute snapshot of a node.
#[derive(Debug, Clone)]
pub struct NodeAttr {
    /// Node ID.
    pub id: NodeId,
    /// Node type.
    pub kind: NodeKind,
    /// Type and permission bits.
    pub mode: FileMode,
    /// Owner user ID.
    pub uid: u32,
    /// Owner group ID.
    pub gid: u32,
    /// Number of namespace references. Directories count their own `.` and
    /// one `..` per child subdirectory on top of the parent's entry.
    pub nlink: u32,
    /// Size in bytes: the target length for symlinks, 0 for node types whose
    /// content the host store owns.
    pub size: u64,
    /// Device number (special nodes only).
    pub rdev: u64,
    /// Access time.
    pub atime: SystemTime,
    /// Modification time.
    pub mtime: SystemTime,
    /// Change time.
    pub ctime: SystemTime,
}
