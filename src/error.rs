//! Error types for the batch converter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the batch converter
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Source document vanished before it could be converted
    #[error("The file {} does not exist.", .0.display())]
    MissingSource(PathBuf),

    /// The conversion engine failed on a document
    #[error("Failed to convert {}: {reason}", .path.display())]
    Conversion { path: PathBuf, reason: String },

    /// Source removal failed after a successful conversion
    #[error("Failed to delete {}: {source}", .path.display())]
    Deletion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The merge engine failed for one folder
    #[error("Failed to write combined PDF {}: {reason}", .output.display())]
    Merge { output: PathBuf, reason: String },

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// Invalid document glob pattern
    #[error("Invalid document pattern: {0}")]
    InvalidPattern(String),

    /// Input root is missing or not a directory
    #[error("Input folder is not a directory: {}", .0.display())]
    InvalidInputRoot(PathBuf),

    /// Operator cancelled the input folder prompt
    #[error("No input folder selected.")]
    NoInputSelected,

    /// Operator cancelled the output folder prompt
    #[error("No output folder selected.")]
    NoOutputSelected,

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Whether this error ends the run before any filesystem work
    pub fn is_selection_error(&self) -> bool {
        matches!(
            self,
            Error::NoInputSelected | Error::NoOutputSelected | Error::InvalidInputRoot(_)
        )
    }
}
