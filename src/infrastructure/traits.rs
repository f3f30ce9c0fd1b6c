//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations and the rendering backend,
//! allowing services to be tested with mock implementations.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::application::export::ExportKind;
use crate::domain::{OrgNode, ViewState};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read raw file contents.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write content so that readers see either the old file or the complete
    /// new one, never a partial write.
    fn write_atomic(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Rendering backend for picture and document exports.
///
/// Implementations draw `root` as seen through `view`: collapsed nodes hide
/// their children, `show_images` controls image slots and
/// `controls_visible` controls the expand/collapse markers.
pub trait ChartRenderer: Send + Sync {
    /// Single image of the whole chart.
    fn rasterize(&self, root: &OrgNode, view: &ViewState) -> Result<Vec<u8>, String>;

    /// Chart laid out over pages.
    fn paginate(&self, root: &OrgNode, view: &ViewState) -> Result<Vec<u8>, String>;

    /// File extension (without dot) of what this renderer produces for `kind`.
    fn extension(&self, kind: ExportKind) -> &'static str;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_atomic(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        // Temp file in the target directory so the rename stays on one device
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_existing_file_when_writing_atomically_then_content_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chart.json");
        std::fs::write(&path, "old").unwrap();

        RealFileSystem.write_atomic(&path, b"new").unwrap();

        assert_eq!(RealFileSystem.read(&path).unwrap(), b"new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
