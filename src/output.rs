// 💾 Output Writer - Generated SQL to disk + content fingerprint

use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// A script that has been written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub bytes: usize,

    /// SHA-256 of the file content (hex); equal input gives an equal digest
    pub sha256: String,
}

/// SHA-256 hex digest of generated SQL
pub fn fingerprint(sql: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sql.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Write a script, creating missing parent directories
pub fn write_sql(path: &Path, sql: &str) -> Result<WrittenFile> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }
    }

    fs::write(path, sql).with_context(|| format!("Failed to write SQL file: {:?}", path))?;

    Ok(WrittenFile {
        path: path.to_path_buf(),
        bytes: sql.len(),
        sha256: fingerprint(sql),
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint("SELECT 1;"), fingerprint("SELECT 1;"));
        assert_ne!(fingerprint("SELECT 1;"), fingerprint("SELECT 2;"));
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db").join("migrations").join("seed.sql");

        let written = write_sql(&path, "SELECT 1;\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "SELECT 1;\n");
        assert_eq!(written.bytes, 10);
        assert_eq!(written.sha256, fingerprint("SELECT 1;\n"));
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.sql");

        write_sql(&path, "old contents that are longer").unwrap();
        write_sql(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // The directory itself is not a writable file path
        assert!(write_sql(dir.path(), "SELECT 1;").is_err());
    }
}
