//! Filesystem port for corpus and report I/O.

use std::error::Error;
use std::path::{Path, PathBuf};

/// Reads corpora and writes output files.
///
/// Going through a port lets tests run whole resynchronizations against an
/// in-memory tree.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, Box<dyn Error + Send + Sync>>;

    /// Writes the given contents to a file, creating parent directories and
    /// overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Returns `true` if the path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if the path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Lists every regular file below `root`, recursively, in sorted order.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` or one of its subdirectories cannot be read.
    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>, Box<dyn Error + Send + Sync>>;
}
