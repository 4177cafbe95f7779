//! Filesystem utilities.
//!
//! Thin wrappers over `std::fs` that report failures as
//! [`CoreError::Filesystem`] together with the offending path.

use crate::error::CoreError;
use std::fs;
use std::path::{Path, PathBuf};

/// Ensures that a directory exists at `path`, creating parents as needed.
///
/// Fails if the path exists but is not a directory.
///
/// ```no_run
/// # use launcher_core::utils::fs::ensure_dir_exists;
/// let dir = tempfile::tempdir().unwrap();
/// let data_dir = dir.path().join("launcher");
/// ensure_dir_exists(&data_dir).unwrap();
/// assert!(data_dir.is_dir());
/// ```
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if !path.is_dir() {
            Err(CoreError::Filesystem {
                message: "Path exists but is not a directory".to_string(),
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "Path exists but is not a directory",
                ),
            })
        } else {
            Ok(())
        }
    } else {
        fs::create_dir_all(path).map_err(|e| CoreError::Filesystem {
            message: "Failed to create directory".to_string(),
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Reads a file, returning `Ok(None)` when it does not exist.
pub fn read_to_string_if_exists(path: &Path) -> Result<Option<String>, CoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CoreError::Filesystem {
            message: "Failed to read file to string".to_string(),
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes a string to a file, creating or truncating it.
fn write_string_to_file(path: &Path, content: &str) -> Result<(), CoreError> {
    fs::write(path, content).map_err(|e| CoreError::Filesystem {
        message: "Failed to write string to file".to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}

/// Writes `content` to a sibling temporary file and renames it over `path`.
///
/// Readers never observe a half-written file.
pub fn write_string_atomically(path: &Path, content: &str) -> Result<(), CoreError> {
    let tmp_path = temp_sibling(path);
    write_string_to_file(&tmp_path, content)?;
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CoreError::Filesystem {
            message: "Failed to replace file".to_string(),
            path: path.to_path_buf(),
            source: e,
        }
    })
}

/// Removes a file. A file that is already gone is not an error.
pub fn remove_file_if_exists(path: &Path) -> Result<(), CoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CoreError::Filesystem {
            message: "Failed to remove file".to_string(),
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_ensure_dir_exists_creates_nested_directories() {
        let temp_root = tempdir().expect("Failed to create temp root dir for test");
        let nested_dir_path = temp_root.path().join("parent_dir/child_dir");

        assert!(!nested_dir_path.exists());
        ensure_dir_exists(&nested_dir_path).unwrap();
        assert!(nested_dir_path.is_dir());
        // Second call is a no-op.
        ensure_dir_exists(&nested_dir_path).unwrap();
    }

    #[test]
    fn test_ensure_dir_exists_errors_if_path_is_file() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file for test");
        writeln!(temp_file, "This is a file, not a directory.").unwrap();
        let file_path = temp_file.path().to_path_buf();

        match ensure_dir_exists(&file_path).err().unwrap() {
            CoreError::Filesystem { message, path, .. } => {
                assert_eq!(message, "Path exists but is not a directory");
                assert_eq!(path, file_path);
            }
            other_error => panic!("Unexpected error type: {:?}", other_error),
        }
    }

    #[test]
    fn test_read_to_string_if_exists_missing_file() {
        let temp_root = tempdir().unwrap();
        let missing = temp_root.path().join("does_not_exist.txt");
        assert_eq!(read_to_string_if_exists(&missing).unwrap(), None);
    }

    #[test]
    fn test_read_to_string_if_exists_on_directory_fails() {
        let temp_root = tempdir().unwrap();
        assert!(read_to_string_if_exists(temp_root.path()).is_err());
    }

    #[test]
    fn test_write_string_to_file_overwrites_existing_content() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Initial content.").unwrap();
        let file_path = temp_file.path();

        write_string_to_file(file_path, "Overwritten content.").unwrap();
        assert_eq!(fs::read_to_string(file_path).unwrap(), "Overwritten content.");
    }

    #[test]
    fn test_write_string_atomically_leaves_no_temp_file() {
        let temp_root = tempdir().unwrap();
        let path = temp_root.path().join("favorites_list");

        write_string_atomically(&path, "[]").unwrap();
        write_string_atomically(&path, "[1]").unwrap();

        assert_eq!(read_to_string_if_exists(&path).unwrap().as_deref(), Some("[1]"));
        assert!(!temp_root.path().join("favorites_list.tmp").exists());
    }

    #[test]
    fn test_write_string_atomically_into_missing_dir_fails() {
        let temp_root = tempdir().unwrap();
        let path = temp_root.path().join("missing").join("favorites_list");
        match write_string_atomically(&path, "[]") {
            Err(CoreError::Filesystem { message, .. }) => {
                assert_eq!(message, "Failed to write string to file")
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_remove_file_if_exists() {
        let temp_root = tempdir().unwrap();
        let path = temp_root.path().join("usage_data");
        write_string_to_file(&path, "{}").unwrap();

        remove_file_if_exists(&path).unwrap();
        assert!(!path.exists());
        remove_file_if_exists(&path).unwrap();
    }
}
