//! Filesystem abstraction layer for testability
//!
//! List loading, feed caching, state persistence and output emission all go
//! through the [`FileSystem`] trait so their error paths can be exercised
//! with mockall-generated mocks instead of a real disk.

use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;

#[cfg(test)]
use mockall::automock;

/// Trait abstracting filesystem operations for dependency injection.
///
/// # Example (testing)
/// ```ignore
/// use hostfold::fs_abstraction::MockFileSystem;
///
/// let mut mock_fs = MockFileSystem::new();
/// mock_fs.expect_read_to_string()
///     .returning(|_| Ok("ads.example.com\n".to_string()));
/// ```
#[cfg_attr(test, automock)]
pub trait FileSystem: Send + Sync {
    /// Read file contents as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace a file's contents atomically (temp file + rename).
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Last modification time of a file.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;
}

/// Real filesystem implementation using std::fs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(contents)?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }
}

static REAL_FS: RealFileSystem = RealFileSystem;

/// Get a reference to the global real filesystem instance.
pub fn real_fs() -> &'static RealFileSystem {
    &REAL_FS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_real_fs_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.conf");

        let fs = RealFileSystem;
        fs.write_atomic(&file_path, b"zone \"ads.example.com\"\n").unwrap();
        assert_eq!(
            fs.read_to_string(&file_path).unwrap(),
            "zone \"ads.example.com\"\n"
        );
    }

    #[test]
    fn test_real_fs_write_atomic_replaces() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.conf");

        let fs = RealFileSystem;
        fs.write_atomic(&file_path, b"first").unwrap();
        fs.write_atomic(&file_path, b"second").unwrap();
        assert_eq!(fs.read_to_string(&file_path).unwrap(), "second");
        // Only the target remains, no stray temp files
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_real_fs_write_atomic_missing_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("missing").join("out.conf");
        assert!(RealFileSystem.write_atomic(&file_path, b"x").is_err());
    }

    #[test]
    fn test_real_fs_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let err = RealFileSystem
            .read_to_string(&temp_dir.path().join("nope.txt"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_real_fs_exists_and_modified() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("cache.txt");

        let fs = real_fs();
        assert!(!fs.exists(&file_path));
        assert!(fs.modified(&file_path).is_err());
        fs.write_atomic(&file_path, b"x").unwrap();
        assert!(fs.exists(&file_path));
        assert!(fs.modified(&file_path).unwrap() <= SystemTime::now());
    }

    #[test]
    fn test_real_fs_create_dir_all() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        RealFileSystem.create_dir_all(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_mock_fs_read() {
        let mut mock_fs = MockFileSystem::new();
        mock_fs
            .expect_read_to_string()
            .returning(|_| Ok("ads.example.com".to_string()));
        assert_eq!(
            mock_fs.read_to_string(Path::new("/any")).unwrap(),
            "ads.example.com"
        );
    }
}
