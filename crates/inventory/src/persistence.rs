//! JSON file persistence for the stock mapping.
//!
//! The file is a single JSON object mapping item names to integer quantities,
//! written with 2-space indentation. Writes go to a sibling `.tmp` file that is
//! renamed over the target, so a failed save leaves the previous file intact.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default data file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "inventory.json";

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("File {} not found, starting with empty inventory", .path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize inventory: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistenceError {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

/// Read and parse a stock file.
pub fn read_stock(path: &Path) -> PersistenceResult<BTreeMap<String, i64>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PersistenceError::Missing {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(PersistenceError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&content).map_err(|source| PersistenceError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `stock` and atomically replace the file at `path`.
pub fn write_stock(path: &Path, stock: &BTreeMap<String, i64>) -> PersistenceResult<()> {
    let content = serde_json::to_string_pretty(stock).map_err(PersistenceError::Serialize)?;

    let temp = temp_path(path);
    let write_err = |source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Err(source) = fs::write(&temp, &content) {
        let _ = fs::remove_file(&temp);
        return Err(write_err(source));
    }
    if let Err(source) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(write_err(source));
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(DEFAULT_DATA_FILE));
    name.push(".tmp");
    path.with_file_name(name)
}
