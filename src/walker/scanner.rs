//! Single-directory scanning
//!
//! A scanner reads exactly one directory: its own metadata size, the size of
//! every non-directory entry, and the names of its subdirectories. It never
//! recurses; subdirectories go back to the coordinator as new scan units.

use crate::error::ScanError;
use crate::walker::queue::{ScanResult, ScanUnit};
use std::fs;
use std::io;
use std::path::Path;
use tracing::trace;

/// Reads one directory and reports its size contribution
///
/// Implementations are shared between worker threads and must not rely on
/// any mutable state of their own.
pub trait DirectoryScanner: Send + Sync {
    /// Scan `path`, returning the bytes it contributes and its subdirectories
    fn scan(&self, path: &Path) -> Result<ScanResult, ScanError>;
}

/// Scanner backed by the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsScanner;

impl FsScanner {
    pub fn new() -> Self {
        Self
    }
}

impl DirectoryScanner for FsScanner {
    fn scan(&self, path: &Path) -> Result<ScanResult, ScanError> {
        // Follows symlinks, so a symlinked root is scanned as the directory it
        // points at
        let meta = fs::metadata(path).map_err(|source| ScanError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

        if !meta.is_dir() {
            return Err(ScanError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        let entries = fs::read_dir(path).map_err(|source| ScanError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut result = ScanResult::with_base_size(meta.len());

        for entry in entries {
            let entry = entry.map_err(|source| ScanError::ReadDir {
                path: path.to_path_buf(),
                source,
            })?;

            // file_type() and metadata() do not follow symlinks, so a link to
            // a directory counts as a file-sized entry and is never descended
            let is_dir = match entry_is_dir(entry.file_type(), || entry.metadata()) {
                Ok(is_dir) => is_dir,
                Err(e) => {
                    trace!(path = %entry.path().display(), error = %e, "Skipping entry");
                    continue;
                }
            };

            if is_dir {
                result.discovered.push(ScanUnit::new(entry.path()));
                continue;
            }

            match entry.metadata() {
                Ok(m) => result.size_delta += m.len(),
                Err(e) => {
                    trace!(path = %entry.path().display(), error = %e, "Skipping entry");
                }
            }
        }

        Ok(result)
    }
}

/// Decide whether an entry is a directory, falling back to a full stat when
/// the listing did not carry the type
fn entry_is_dir(
    file_type: io::Result<fs::FileType>,
    metadata: impl FnOnce() -> io::Result<fs::Metadata>,
) -> io::Result<bool> {
    match file_type {
        Ok(t) => Ok(t.is_dir()),
        Err(_) => metadata().map(|m| m.is_dir()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(path: &Path, len: usize) {
        let mut f = File::create(path).unwrap();
        f.write_all(&vec![b'x'; len]).unwrap();
    }

    #[test]
    fn test_scan_counts_files_and_lists_subdirs() {
        let dir = tempdir().unwrap();
        write_file(&dir.path().join("a.txt"), 100);
        write_file(&dir.path().join("b.txt"), 250);
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_file(&dir.path().join("sub").join("nested.txt"), 999);

        let result = FsScanner::new().scan(dir.path()).unwrap();
        let own = fs::metadata(dir.path()).unwrap().len();

        // The nested file is not counted at this level
        assert_eq!(result.size_delta, own + 350);
        assert_eq!(result.discovered, vec![ScanUnit::new(dir.path().join("sub"))]);
    }

    #[test]
    fn test_entry_type_falls_back_to_metadata() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        write_file(&file, 3);
        fn unknown<T>() -> io::Result<T> {
            Err(io::Error::from(io::ErrorKind::Other))
        }

        assert!(entry_is_dir(unknown(), || fs::symlink_metadata(dir.path())).unwrap());
        assert!(!entry_is_dir(unknown(), || fs::symlink_metadata(&file)).unwrap());

        let dir_type = fs::symlink_metadata(dir.path()).unwrap().file_type();
        assert!(entry_is_dir(Ok(dir_type), unknown).unwrap());

        let err = entry_is_dir(unknown(), unknown).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempdir().unwrap();
        let result = FsScanner::new().scan(dir.path()).unwrap();

        assert_eq!(result.size_delta, fs::metadata(dir.path()).unwrap().len());
        assert!(result.discovered.is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");

        let err = FsScanner::new().scan(&missing).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.path(), missing.as_path());
    }

    #[test]
    fn test_scan_regular_file_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        write_file(&file, 10);

        let err = FsScanner::new().scan(&file).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_is_not_descended() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let result = FsScanner::new().scan(dir.path()).unwrap();
        let own = fs::metadata(dir.path()).unwrap().len();
        let link_len = fs::symlink_metadata(&link).unwrap().len();

        assert_eq!(result.discovered, vec![ScanUnit::new(target)]);
        assert_eq!(result.size_delta, own + link_len);
    }
}
