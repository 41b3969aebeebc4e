//! Mount configuration model for the rusty-ramfs in-memory filesystem.
//!
//! This crate provides the pieces of a mount that exist before any node
//! does: POSIX mode bits, the mount option parser, and the immutable
//! per-mount configuration the parser produces. It holds no filesystem
//! state and performs no allocation beyond the returned configuration
//! value.

pub mod error;
pub mod mode;
pub mod options;

pub use error::OptionsError;
pub use mode::FileMode;
pub use options::{MountConfig, DEFAULT_ROOT_MODE};
