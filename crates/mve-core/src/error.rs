//! Error types for mve-rs.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The main error type for mve-rs operations.
#[derive(Error, Debug)]
pub enum MveError {
    /// A file or directory does not exist.
    #[error("'{}' not found", .0.display())]
    NotFound(PathBuf),

    /// A path exists but is not a directory.
    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// A required subdirectory is absent or the layout is malformed.
    #[error("invalid structure at '{}': {reason}", path.display())]
    StructureInvalid { path: PathBuf, reason: String },

    /// A bundle or view payload could not be parsed.
    #[error("parse error in '{}' (line {line}): {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A read, write, create, or delete failed at the filesystem boundary.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A view was saved before being bound to a directory.
    #[error("view {0} has no directory; use save_view_as")]
    ViewUnbound(u32),

    /// An embedding name contains characters that cannot be used in a file name.
    #[error("invalid embedding name '{0}'")]
    InvalidName(String),

    /// An index into a bundle list is out of range.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Coarse classification of [`MveError`] for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Path or file missing.
    NotFound,
    /// Expected directory layout absent or malformed.
    Structure,
    /// Stored content unreadable.
    Parse,
    /// Filesystem operation failed.
    Io,
    /// The call itself was invalid for the current state.
    Usage,
}

impl MveError {
    /// Wraps an I/O error with the path it happened on.
    ///
    /// `NotFound` I/O errors are reported as [`MveError::NotFound`].
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }

    /// Wraps an I/O error from creating, writing, or deleting `path`.
    ///
    /// Unlike [`MveError::io`], `NotFound` is not mapped to
    /// [`MveError::NotFound`].
    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse(path: impl AsRef<Path>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            line,
            message: message.into(),
        }
    }

    /// Creates a structure error.
    pub fn structure(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::StructureInvalid {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NotADirectory(_) | Self::StructureInvalid { .. } => ErrorKind::Structure,
            Self::Parse { .. } | Self::Json(_) => ErrorKind::Parse,
            Self::Io { .. } => ErrorKind::Io,
            Self::ViewUnbound(_) | Self::InvalidName(_) | Self::IndexOutOfRange { .. } => {
                ErrorKind::Usage
            }
        }
    }
}

/// A specialized Result type for mve-rs operations.
pub type Result<T> = std::result::Result<T, MveError>;
