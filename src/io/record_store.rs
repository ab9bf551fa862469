use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::{atomic_write, log_write_failure};
use crate::parse::{Record, SkippedRow, parse_records, serialize_header, serialize_records};

/// Error type for record file I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse tasklist.toml: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Entities read from one file, plus the rows that had to be dropped
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRow>,
}

/// Reads and rewrites record files. Holds no entity data between calls;
/// `data_dir` is only where diagnostics go.
#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        RecordStore {
            data_dir: data_dir.into(),
        }
    }

    /// Create `path` holding only `header` if it does not exist yet.
    /// An existing file is never touched. Returns whether the file was created.
    pub fn ensure_initialized(&self, path: &Path, header: &[&str]) -> Result<bool, StoreError> {
        if path.exists() {
            return Ok(false);
        }
        fs::write(path, serialize_header(header)).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(true)
    }

    /// Read every row after the header. Malformed rows are skipped and reported
    /// in the result; they never fail the load. Nothing is written.
    pub fn load<T: Record>(&self, path: &Path) -> Result<Loaded<T>, StoreError> {
        let source = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let (records, skipped) = parse_records::<T>(&source);
        Ok(Loaded { records, skipped })
    }

    /// Replace the whole file with a header plus one row per record.
    pub fn save<T: Record>(&self, path: &Path, records: &[T]) -> Result<(), StoreError> {
        let content = serialize_records(records);
        if let Err(source) = atomic_write(path, content.as_bytes()) {
            log_write_failure(&self.data_dir, path, &source, &content);
            return Err(StoreError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
        Ok(())
    }
}
