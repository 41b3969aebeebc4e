//! In-arena node representation.

use std::time::SystemTime;

use rusty_ramfs_model::FileMode;

use super::dir::DirEntries;
use super::types::{NodeAttr, NodeId, NodeKind};

/// Content of a node, closed over the four supported types.
#[derive(Debug, Clone)]
pub(crate) enum NodeContent {
    /// Regular file; byte content lives in the host store.
    Regular,
    /// Directory and its entry map.
    Directory(DirEntries),
    /// Symbolic link and its target path.
    Symlink(String),
    /// Device or other special node, carrying its device number.
    Special(u64),
}

/// A filesystem node held by the arena.
///
/// Nodes carry no reference to the entries naming them; reachability is
/// recorded solely in the parent's entry map and mirrored by `nlink`.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) id: NodeId,
    pub(crate) mode: FileMode,
    pub(crate) uid: u32,
    pub(crate) gid: u32,
    pub(crate) nlink: u32,
    pub(crate) atime: SystemTime,
    pub(crate) mtime: SystemTime,
    pub(crate) ctime: SystemTime,
    pub(crate) content: NodeContent,
}

impl Node {
    /// Node type, as recorded in the content variant.
    pub(crate) fn kind(&self) -> NodeKind {
        match self.content {
            NodeContent::Regular => NodeKind::Regular,
            NodeContent::Directory(_) => NodeKind::Directory,
            NodeContent::Symlink(_) => NodeKind::Symlink,
            NodeContent::Special(_) => NodeKind::Special,
        }
    }

    /// Check if this node is a directory.
    pub(crate) fn is_directory(&self) -> bool {
        matches!(self.content, NodeContent::Directory(_))
    }

    /// Directory entries, if this node is a directory.
    pub(crate) fn entries(&self) -> Option<&DirEntries> {
        match &self.content {
            NodeContent::Directory(entries) => Some(entries),
            _ => None,
        }
    }

    /// Mutable directory entries, if this node is a directory.
    pub(crate) fn entries_mut(&mut self) -> Option<&mut DirEntries> {
        match &mut self.content {
            NodeContent::Directory(entries) => Some(entries),
            _ => None,
        }
    }

    /// Record a content or namespace mutation: mtime and ctime move to `now`.
    pub(crate) fn touch_modified(&mut self, now: SystemTime) {
        self.mtime = now;
        self.ctime = now;
    }

    /// Attribute snapshot for host-facing metadata queries.
    pub(crate) fn attr(&self) -> NodeAttr {
        let size: u64 = match &self.content {
            NodeContent::Symlink(target) => target.len() as u64,
            _ => 0,
        };
        let rdev: u64 = match self.content {
            NodeContent::Special(dev) => dev,
            _ => 0,
        };
        NodeAttr {
            id: self.id,
            kind: self.kind(),
            mode: self.mode,
            uid: self.uid,
            gid: self.gid,
            nlink: self.nlink,
            size,
            rdev,
            atime: self.atime,
            mtime: self.mtime,
            ctime: self.ctime,
        }
    }
}
