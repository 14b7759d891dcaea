//! Error types for dataset balancing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while scanning, planning or balancing a dataset
#[derive(Error, Debug)]
pub enum BalanceError {
    /// The parent dataset folder does not exist
    #[error("Dataset folder not found: {0}")]
    ParentNotFound(PathBuf),

    /// The parent dataset path exists but is not a folder
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Filesystem failure on a specific path
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source image could not be decoded
    #[error("Failed to decode image '{path}': {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// An augmented image could not be encoded or written
    #[error("Failed to write image '{path}': {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Oversampling needs at least one source image to draw from
    #[error("Class '{class}' has no images to oversample from ({deficit} needed)")]
    EmptyClass { class: String, deficit: usize },

    /// Target counts must be positive
    #[error("Invalid target count: {0} (must be at least 1)")]
    InvalidTarget(usize),
}

impl BalanceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BalanceError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for balancing operations
pub type Result<T> = std::result::Result<T, BalanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_class_message_names_class() {
        let err = BalanceError::EmptyClass {
            class: "cat".to_string(),
            deficit: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("cat"));
        assert!(msg.contains('5'));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = BalanceError::io(
            "/data/dog/1.png",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/data/dog/1.png"));
    }
}
