//! File operations used by file-backed channels.
//!
//! Opening, reading and closing log files goes through [`LogIo`] so tests
//! can inject failures at each step of a checkpoint read.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// How a log file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Create or truncate, used when a channel is created.
    Truncate,
    /// Create or append, used when a channel is reopened after a read.
    Append,
}

/// File operations a [`crate::Logger`] performs on log files.
pub trait LogIo: Send + Sync {
    /// Open `path` for writing.
    fn open(&self, path: &Path, mode: OpenMode) -> io::Result<File>;

    /// Read the whole content of `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Flush `file` to storage and close it.
    fn close(&self, file: File) -> io::Result<()> {
        file.sync_all()
    }
}

/// [`LogIo`] backed by the filesystem. Files are created owner-only.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsIo;

impl LogIo for FsIo {
    fn open(&self, path: &Path, mode: OpenMode) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            OpenMode::Truncate => options.write(true).truncate(true),
            OpenMode::Append => options.append(true),
        };
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        options.open(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}
