//! POSIX mode bits for filesystem nodes.

use bitflags::bitflags;

bitflags! {
    /// File type and permission bits, in the POSIX `st_mode` layout.
    ///
    /// The type constants overlap bitwise (as they do on every POSIX
    /// system); use [`FileMode::file_type`] to compare types rather than
    /// `contains`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileMode: u32 {
        /// File type mask.
        const S_IFMT = 0o170000;
        /// Regular file.
        const S_IFREG = 0o100000;
        /// Directory.
        const S_IFDIR = 0o040000;
        /// Symbolic link.
        const S_IFLNK = 0o120000;
        /// Character device.
        const S_IFCHR = 0o020000;
        /// Block device.
        const S_IFBLK = 0o060000;
        /// FIFO.
        const S_IFIFO = 0o010000;
        /// Socket.
        const S_IFSOCK = 0o140000;

        /// Set-user-id bit.
        const S_ISUID = 0o4000;
        /// Set-group-id bit.
        const S_ISGID = 0o2000;
        /// Sticky bit.
        const S_ISVTX = 0o1000;

        /// User read.
        const S_IRUSR = 0o400;
        /// User write.
        const S_IWUSR = 0o200;
        /// User execute.
        const S_IXUSR = 0o100;
        /// Group read.
        const S_IRGRP = 0o040;
        /// Group write.
        const S_IWGRP = 0o020;
        /// Group execute.
        const S_IXGRP = 0o010;
        /// Other read.
        const S_IROTH = 0o004;
        /// Other write.
        const S_IWOTH = 0o002;
        /// Other execute.
        const S_IXOTH = 0o001;
    }
}

/// Mask covering the permission and special bits a mount option may set.
pub const PERMISSION_MASK: u32 = 0o7777;

impl FileMode {
    /// Build a mode from raw `st_mode`-style bits.
    pub const fn from_raw(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }

    /// Get the file type bits.
    pub fn file_type(self) -> FileMode {
        FileMode::from_bits_retain(self.bits() & Self::S_IFMT.bits())
    }

    /// Get the permission and special bits.
    pub fn permissions(self) -> FileMode {
        FileMode::from_bits_retain(self.bits() & PERMISSION_MASK)
    }

    /// Replace the type bits, keeping permissions.
    ///
    /// # Arguments
    /// * `file_type` - Type bits to set (e.g. [`FileMode::S_IFDIR`])
    pub fn with_file_type(self, file_type: FileMode) -> FileMode {
        FileMode::from_bits_retain(
            (self.bits() & !Self::S_IFMT.bits()) | file_type.file_type().bits(),
        )
    }

    /// Check if this is a regular file.
    pub fn is_regular(self) -> bool {
        self.file_type() == Self::S_IFREG
    }

    /// Check if this is a directory.
    pub fn is_directory(self) -> bool {
        self.file_type() == Self::S_IFDIR
    }

    /// Check if this is a symbolic link.
    pub fn is_symlink(self) -> bool {
        self.file_type() == Self::S_IFLNK
    }
}
