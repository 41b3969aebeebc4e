//! In-memory filesystem core: node lifecycle and namespace mutation.
//!
//! This crate implements the RAM-backed side of a mount: typed node
//! allocation, directory linking with reference-count and timestamp
//! semantics, mount-option-driven superblock setup, and unmount teardown.
//! Byte content storage, lookup caching, and the mount dispatch ABI belong
//! to the host and are reached through the [`ContentStore`] contract.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: Superblock lifecycle (fill / kill)
//! Layer 2: Namespace operations (create, mkdir, mknod, symlink, unlink, rmdir)
//! Layer 1: Primitives (NodeManager arena, ContentStore)
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use rusty_ramfs_vfs::{Credentials, FileMode, MemoryStore, Superblock};
//!
//! let creds = Credentials::root();
//! let sb = Superblock::fill(Arc::new(MemoryStore::new()), Some("mode=0750"), creds)?;
//!
//! let scratch = sb.mkdir(sb.root(), "scratch", FileMode::from_raw(0o755), &creds)?;
//! let link = sb.symlink(scratch, "latest", "run-0001", &creds)?;
//! assert_eq!(sb.nodes().symlink_target(link)?, "run-0001");
//! # Ok::<(), rusty_ramfs_vfs::VfsError>(())
//! ```

pub mod content;
pub mod error;
pub mod inode;
pub mod superblock;

mod ops;

pub use content::{ContentStore, MemoryStore, DEFAULT_BLOCK_SIZE};
pub use error::VfsError;
pub use inode::{Credentials, NodeAttr, NodeId, NodeKind, NodeManager, ROOT_NODE};
pub use superblock::{Superblock, RAMFS_MAGIC};

// Re-export the configuration model for convenience.
pub use rusty_ramfs_model::{FileMode, MountConfig};
