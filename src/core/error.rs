//! Error types for operations that can genuinely fail
//!
//! Resolution misses are not errors; they are reported as `Resolution::NotFound`
//! and rendered as `NOT_FOUND` result items. This enum covers configuration
//! loading and the filing operations that touch the disk.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdlinkError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no store directory configured (set store_dirs in the config or pass --store-dir)")]
    NoStoreDir,

    #[error("not a valid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("path has no file name: {0}")]
    NoFileName(PathBuf),

    #[error("target already exists: {0}")]
    TargetExists(PathBuf),

    #[error("copying directories is not supported: {0}")]
    CopyDirectory(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IdlinkError {
    /// Stable machine-readable code used in result items
    pub fn code(&self) -> &'static str {
        match self {
            IdlinkError::ConfigRead { .. } => "CONFIG_READ",
            IdlinkError::ConfigParse { .. } => "CONFIG_PARSE",
            IdlinkError::NoStoreDir => "NO_STORE_DIR",
            IdlinkError::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            IdlinkError::NoFileName(_) => "NO_FILE_NAME",
            IdlinkError::TargetExists(_) => "TARGET_EXISTS",
            IdlinkError::CopyDirectory(_) => "COPY_DIRECTORY",
            IdlinkError::Io(_) => "IO_ERROR",
        }
    }
}
