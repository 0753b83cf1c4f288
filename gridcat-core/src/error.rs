// ABOUTME: Error types for discovery, encoding, and rendering of image grids
// ABOUTME: Separates fatal directory/output failures from per-file encoding failures

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("Please specify a directory")]
    MissingDirectory,

    #[error("Error discovering images in {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode {}: {reason}", path.display())]
    Encoding { path: PathBuf, reason: String },

    #[error("Terminal output error: {0}")]
    Io(#[from] io::Error),
}

impl GridError {
    pub fn directory(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GridError::Directory {
            path: path.into(),
            source,
        }
    }

    pub fn encoding(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        GridError::Encoding {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            GridError::MissingDirectory => Some("Usage: gridcat [OPTIONS] <DIRECTORY>"),
            GridError::Directory { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => Some("Check that the directory exists"),
                io::ErrorKind::PermissionDenied => {
                    Some("Check that the directory is readable and traversable")
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Per-file encoding failures are skipped; everything else aborts the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GridError::Encoding { .. })
    }
}
