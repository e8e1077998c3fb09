//! File identity: content hash plus filesystem metadata.
//!
//! The content hash is a change-detection token for the plot cache, not a
//! security primitive. It is the lowercase hex SHA-256 of the full file.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use sha2::{Digest, Sha256};

use crate::error::SweepError;

const HASH_CHUNK_SIZE: usize = 8192;

/// Filesystem metadata captured alongside the content hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStat {
    /// File size in bytes.
    pub size: u64,
    /// Last modification time, when the platform reports one.
    pub modified: Option<SystemTime>,
    /// Last access time, when the platform reports one.
    pub accessed: Option<SystemTime>,
    /// Creation time, when the platform reports one.
    pub created: Option<SystemTime>,
}

/// Identity of a sweep file at the moment it was read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileIdentity {
    pub path: PathBuf,
    /// Lowercase hex SHA-256 digest of the file bytes.
    pub content_hash: String,
    pub stat: FileStat,
}

impl FileIdentity {
    /// The final path component, or the whole path if it has none.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Hashes and stats the file at `path`.
///
/// # Errors
/// Returns [`SweepError::NotFound`] if `path` is not a regular file, or
/// [`SweepError::Io`] if reading fails part way.
pub fn compute_identity(path: &Path) -> Result<FileIdentity, SweepError> {
    let meta = std::fs::metadata(path).map_err(|_| SweepError::NotFound {
        path: path.to_path_buf(),
    })?;
    if !meta.is_file() {
        return Err(SweepError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content_hash = hash_file(path)?;

    Ok(FileIdentity {
        path: path.to_path_buf(),
        content_hash,
        stat: FileStat {
            size: meta.len(),
            modified: meta.modified().ok(),
            accessed: meta.accessed().ok(),
            created: meta.created().ok(),
        },
    })
}

/// Streams `path` through SHA-256 and returns the hex digest.
pub fn hash_file(path: &Path) -> Result<String, SweepError> {
    let file = File::open(path).map_err(SweepError::Io)?;
    hash_reader(BufReader::new(file))
}

/// Streams any reader through SHA-256 in fixed-size chunks.
pub fn hash_reader<R: Read>(mut reader: R) -> Result<String, SweepError> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; HASH_CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
