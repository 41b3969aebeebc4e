//! Error types for the VFS crate.

use std::fmt;

use rusty_ramfs_model::OptionsError;

use crate::inode::NodeId;

/// Errors that can occur during filesystem operations.
///
/// Name-collision errors never originate here: the host's lookup layer
/// checks for existing entries before any namespace mutation is invoked.
#[derive(Debug)]
pub enum VfsError {
    /// Malformed mount option string.
    InvalidArgument(String),

    /// Node or content allocation failed for lack of backing memory.
    NoSpace,

    /// Node not found in the arena.
    NodeNotFound(NodeId),

    /// Not a directory.
    NotADirectory(NodeId),

    /// Is a directory.
    IsADirectory(NodeId),

    /// No entry with this name.
    NotFound(String),

    /// Directory still has entries.
    DirectoryNotEmpty(String),
}

impl fmt::Display for VfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfsError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            VfsError::NoSpace => write!(f, "No space left on device"),
            VfsError::NodeNotFound(id) => write!(f, "Node not found: {}", id),
            VfsError::NotADirectory(id) => write!(f, "Not a directory: {}", id),
            VfsError::IsADirectory(id) => write!(f, "Is a directory: {}", id),
            VfsError::NotFound(name) => write!(f, "No such entry: {}", name),
            VfsError::DirectoryNotEmpty(name) => write!(f, "Directory not empty: {}", name),
        }
    }
}

impl std::error::Error for VfsError {}

impl From<OptionsError> for VfsError {
    fn from(e: OptionsError) -> Self {
        VfsError::InvalidArgument(e.to_string())
    }
}
