//! FileSystem port - abstraction over file I/O operations
//!
//! Lets the application layer render and read files without depending on
//! a concrete implementation.

use std::path::Path;

use crate::error::NopeusResult;

/// Abstract file system interface
///
/// Shared by both generation tasks, hence `Send + Sync`.
pub trait FileSystem: Send + Sync {
    /// Read file content as string
    fn read(&self, path: &Path) -> NopeusResult<String>;

    /// Write content to file atomically, creating parent directories
    fn write(&self, path: &Path, content: &str) -> NopeusResult<()>;

    /// Check if file exists
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and parents
    fn create_dir_all(&self, path: &Path) -> NopeusResult<()>;
}
